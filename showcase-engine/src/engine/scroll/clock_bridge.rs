use super::smooth_scroll::{ClockSource, ListenerId, ScrollUpdate, SmoothScroll};
use super::trigger::{ScrollLayout, ScrollTriggerEngine};
use bevy::prelude::*;
use std::sync::{Arc, Mutex};

/// Couples the smooth-scroll emulator and the trigger engine to the frame
/// clock. While attached, the emulator's own loop is idle and every frame
/// runs: advance emulator, emulator notifies, triggers recalculate, triggers
/// tick. Anything scheduled after the bridge reads settled scroll state.
#[derive(Resource)]
pub struct ClockBridge {
    listener: ListenerId,
    pending: Arc<Mutex<Vec<ScrollUpdate>>>,
    last_time: Option<f64>,
}

impl ClockBridge {
    pub fn attach(smooth: &mut SmoothScroll) -> Self {
        let pending: Arc<Mutex<Vec<ScrollUpdate>>> = Arc::default();
        let sink = pending.clone();
        let listener = smooth.add_listener(move |update| {
            if let Ok(mut queue) = sink.lock() {
                queue.push(*update);
            }
        });
        smooth.set_clock(ClockSource::External);

        info!("Clock bridge attached (listener {})", listener);
        Self {
            listener,
            pending,
            last_time: None,
        }
    }

    /// Undo everything `attach` did to the emulator.
    pub fn detach(self, smooth: &mut SmoothScroll) {
        if !smooth.remove_listener(self.listener) {
            error!("Clock bridge listener {} was already gone", self.listener);
        }
        smooth.set_clock(ClockSource::Internal);
        info!("Clock bridge detached");
    }

    /// One frame at `time` seconds. Returns the number of scroll updates
    /// forwarded to the trigger engine.
    pub fn tick(
        &mut self,
        time: f64,
        smooth: &mut SmoothScroll,
        triggers: &mut ScrollTriggerEngine,
    ) -> usize {
        smooth.raf(time);

        let updates = match self.pending.lock() {
            Ok(mut queue) => std::mem::take(&mut *queue),
            Err(_) => Vec::new(),
        };
        for update in &updates {
            triggers.update(update);
        }

        let dt = self
            .last_time
            .map(|last| (time - last).max(0.0) as f32)
            .unwrap_or(0.0);
        self.last_time = Some(time);

        for request in triggers.tick(dt) {
            smooth.scroll_to(request.offset, request.duration, request.ease);
        }

        updates.len()
    }
}

/// Attach as soon as the emulator exists; a no-op until then.
pub fn attach_clock_bridge(
    mut commands: Commands,
    smooth: Option<ResMut<SmoothScroll>>,
    bridge: Option<Res<ClockBridge>>,
) {
    if bridge.is_some() {
        return;
    }
    let Some(mut smooth) = smooth else {
        return;
    };
    commands.insert_resource(ClockBridge::attach(&mut smooth));
}

pub fn drive_scroll_clock(
    time: Res<Time>,
    mut bridge: ResMut<ClockBridge>,
    smooth: Option<ResMut<SmoothScroll>>,
    triggers: Option<ResMut<ScrollTriggerEngine>>,
) {
    let (Some(mut smooth), Some(mut triggers)) = (smooth, triggers) else {
        return;
    };
    bridge.tick(time.elapsed_secs_f64(), &mut smooth, &mut triggers);
}

/// Push a changed page layout into the emulator limit and trigger regions.
pub fn refresh_scroll_layout(
    layout: Res<ScrollLayout>,
    smooth: Option<ResMut<SmoothScroll>>,
    triggers: Option<ResMut<ScrollTriggerEngine>>,
) {
    if !layout.is_changed() {
        return;
    }
    if let Some(mut smooth) = smooth {
        smooth.set_limit(layout.scroll_limit());
    }
    if let Some(mut triggers) = triggers {
        triggers.refresh(*layout);
    }
}

/// Remove the bridge and hand the emulator its own clock back.
pub fn teardown_clock_bridge(world: &mut World) {
    let Some(bridge) = world.remove_resource::<ClockBridge>() else {
        return;
    };
    match world.get_resource_mut::<SmoothScroll>() {
        Some(mut smooth) => bridge.detach(&mut smooth),
        None => warn!("Clock bridge torn down without a smooth scroll emulator"),
    }
}
