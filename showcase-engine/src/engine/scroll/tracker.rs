use super::signal::{ScrollSignal, ScrollSignalPublisher};
use super::smooth_scroll::SmoothScroll;
use bevy::prelude::*;

/// Finite-difference velocity over the smoothed offset. Keeps nothing but
/// the previous offset.
#[derive(Resource, Debug, Default)]
pub struct ScrollTracker {
    previous_offset: Option<f32>,
    latest: ScrollSignal,
}

impl ScrollTracker {
    pub fn sample(&mut self, offset: f32, timestamp: f64) -> ScrollSignal {
        let offset = if offset.is_finite() { offset.max(0.0) } else { 0.0 };
        let velocity = self
            .previous_offset
            .map(|previous| offset - previous)
            .unwrap_or(0.0);
        self.previous_offset = Some(offset);
        self.latest = ScrollSignal {
            scroll_offset: offset,
            velocity,
            timestamp,
        };
        self.latest
    }

    pub fn latest(&self) -> ScrollSignal {
        self.latest
    }
}

/// Sample the emulator once per frame and publish to the shared slot.
pub fn track_scroll_signal(
    time: Res<Time>,
    smooth: Option<Res<SmoothScroll>>,
    publisher: Res<ScrollSignalPublisher>,
    mut tracker: ResMut<ScrollTracker>,
) {
    let Some(smooth) = smooth else {
        return;
    };
    let signal = tracker.sample(smooth.scroll(), time.elapsed_secs_f64());
    publisher.0.publish(signal);
}
