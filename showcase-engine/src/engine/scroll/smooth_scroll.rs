use super::ease::Ease;
use bevy::input::mouse::{MouseScrollUnit, MouseWheel};
use bevy::prelude::*;
use constants::scroll::{
    SCROLL_SETTLE_EPSILON, SMOOTH_SCROLL_DURATION, SMOOTH_SCROLL_LERP, WHEEL_LINE_HEIGHT,
    WHEEL_MULTIPLIER,
};
use serde::{Deserialize, Serialize};

/// Emitted to listeners every tick the smoothed offset is in motion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollUpdate {
    pub scroll: f32,
    /// Change in offset since the previous tick, in pixels.
    pub velocity: f32,
    pub progress: f32,
    pub limit: f32,
}

pub type ListenerId = u64;
type ScrollListener = Box<dyn FnMut(&ScrollUpdate) + Send + Sync>;

/// Who advances the emulator's time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ClockSource {
    /// The emulator's own frame loop, driven from real time.
    #[default]
    Internal,
    /// Something else calls [`SmoothScroll::raf`] once per frame.
    External,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmoothScrollOptions {
    /// Damping intensity. When absent, wheel input tweens over `duration`.
    pub lerp: Option<f32>,
    pub duration: f32,
    pub wheel_multiplier: f32,
    pub line_height: f32,
}

impl Default for SmoothScrollOptions {
    fn default() -> Self {
        Self {
            lerp: Some(SMOOTH_SCROLL_LERP),
            duration: SMOOTH_SCROLL_DURATION,
            wheel_multiplier: WHEEL_MULTIPLIER,
            line_height: WHEEL_LINE_HEIGHT,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Motion {
    Idle,
    Damped,
    Tween {
        from: f32,
        to: f32,
        elapsed: f32,
        duration: f32,
        ease: Ease,
    },
}

/// Wheel-smoothing scroll emulator. Owns the document offset the rest of
/// the page is laid out against.
#[derive(Resource)]
pub struct SmoothScroll {
    options: SmoothScrollOptions,
    animated: f32,
    target: f32,
    limit: f32,
    velocity: f32,
    motion: Motion,
    clock: ClockSource,
    last_time: Option<f64>,
    listeners: Vec<(ListenerId, ScrollListener)>,
    next_listener: ListenerId,
}

impl Default for SmoothScroll {
    fn default() -> Self {
        Self::new(SmoothScrollOptions::default())
    }
}

impl SmoothScroll {
    pub fn new(options: SmoothScrollOptions) -> Self {
        Self {
            options,
            animated: 0.0,
            target: 0.0,
            limit: 0.0,
            velocity: 0.0,
            motion: Motion::Idle,
            clock: ClockSource::Internal,
            last_time: None,
            listeners: Vec::new(),
            next_listener: 0,
        }
    }

    pub fn scroll(&self) -> f32 {
        self.animated
    }

    pub fn target(&self) -> f32 {
        self.target
    }

    pub fn limit(&self) -> f32 {
        self.limit
    }

    pub fn velocity(&self) -> f32 {
        self.velocity
    }

    pub fn progress(&self) -> f32 {
        if self.limit > 0.0 {
            (self.animated / self.limit).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    pub fn is_scrolling(&self) -> bool {
        self.motion != Motion::Idle
    }

    pub fn clock(&self) -> ClockSource {
        self.clock
    }

    pub fn set_clock(&mut self, clock: ClockSource) {
        if self.clock != clock {
            self.clock = clock;
            // Timestamps from different clocks are not comparable.
            self.last_time = None;
        }
    }

    pub fn options(&self) -> &SmoothScrollOptions {
        &self.options
    }

    pub fn set_options(&mut self, options: SmoothScrollOptions) {
        self.options = options;
    }

    /// Maximum scroll offset. Current and target offsets are clamped to it.
    pub fn set_limit(&mut self, limit: f32) {
        self.limit = if limit.is_finite() { limit.max(0.0) } else { 0.0 };
        self.target = self.target.clamp(0.0, self.limit);
        if self.animated > self.limit {
            self.animated = self.limit;
        }
    }

    /// Wheel input of `delta_px` pixels (positive scrolls down the page).
    /// Cancels any programmatic scroll in flight.
    pub fn on_wheel(&mut self, delta_px: f32) {
        if !delta_px.is_finite() || delta_px == 0.0 {
            return;
        }
        self.target = (self.target + delta_px * self.options.wheel_multiplier).clamp(0.0, self.limit);
        self.motion = match self.options.lerp {
            Some(_) => Motion::Damped,
            None => Motion::Tween {
                from: self.animated,
                to: self.target,
                elapsed: 0.0,
                duration: self.options.duration,
                ease: Ease::ExpoOut,
            },
        };
    }

    /// Programmatic scroll to `offset` over `duration` seconds.
    /// A non-positive duration jumps immediately.
    pub fn scroll_to(&mut self, offset: f32, duration: f32, ease: Ease) {
        if !offset.is_finite() {
            return;
        }
        self.target = offset.clamp(0.0, self.limit);
        if duration <= 0.0 {
            let previous = self.animated;
            self.animated = self.target;
            self.motion = Motion::Idle;
            self.velocity = self.animated - previous;
            self.emit();
            return;
        }
        self.motion = Motion::Tween {
            from: self.animated,
            to: self.target,
            elapsed: 0.0,
            duration,
            ease,
        };
    }

    /// Advance to `time` (seconds on the current clock) and notify listeners
    /// synchronously if the offset moved.
    pub fn raf(&mut self, time: f64) {
        let dt = match self.last_time {
            Some(last) => (time - last).max(0.0) as f32,
            None => 0.0,
        };
        self.last_time = Some(time);

        if self.motion == Motion::Idle {
            self.velocity = 0.0;
            return;
        }

        let previous = self.animated;
        self.advance(dt);
        self.velocity = self.animated - previous;
        self.emit();
    }

    fn advance(&mut self, dt: f32) {
        match self.motion {
            Motion::Idle => {}
            Motion::Damped => {
                let lerp = self.options.lerp.unwrap_or(SMOOTH_SCROLL_LERP);
                let factor = 1.0 - (-lerp * 60.0 * dt).exp();
                self.animated += (self.target - self.animated) * factor;
                if (self.target - self.animated).abs() < SCROLL_SETTLE_EPSILON {
                    self.animated = self.target;
                    self.motion = Motion::Idle;
                }
            }
            Motion::Tween {
                from,
                to,
                elapsed,
                duration,
                ease,
            } => {
                let elapsed = elapsed + dt;
                let t = if duration > 0.0 { elapsed / duration } else { 1.0 };
                if t >= 1.0 {
                    self.animated = to;
                    self.motion = Motion::Idle;
                } else {
                    self.animated = from + (to - from) * ease.apply(t);
                    self.motion = Motion::Tween {
                        from,
                        to,
                        elapsed,
                        duration,
                        ease,
                    };
                }
            }
        }
    }

    fn emit(&mut self) {
        let update = ScrollUpdate {
            scroll: self.animated,
            velocity: self.velocity,
            progress: self.progress(),
            limit: self.limit,
        };
        for (_, listener) in self.listeners.iter_mut() {
            listener(&update);
        }
    }

    pub fn add_listener(
        &mut self,
        listener: impl FnMut(&ScrollUpdate) + Send + Sync + 'static,
    ) -> ListenerId {
        let id = self.next_listener;
        self.next_listener += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
        self.listeners.len() != before
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

/// Feed mouse wheel and touchpad events into the emulator.
pub fn apply_wheel_input(
    mut wheel_events: EventReader<MouseWheel>,
    smooth: Option<ResMut<SmoothScroll>>,
) {
    let Some(mut smooth) = smooth else {
        wheel_events.clear();
        return;
    };

    let line_height = smooth.options().line_height;
    for event in wheel_events.read() {
        // Wheel y is positive when scrolling up; document offsets grow downwards.
        let delta = match event.unit {
            MouseScrollUnit::Line => -event.y * line_height,
            MouseScrollUnit::Pixel => -event.y,
        };
        smooth.on_wheel(delta);
    }
}

/// The emulator's own frame loop. Idle once an external clock takes over.
pub fn advance_internal_clock(time: Res<Time<Real>>, smooth: Option<ResMut<SmoothScroll>>) {
    let Some(mut smooth) = smooth else {
        return;
    };
    if smooth.clock() == ClockSource::Internal {
        smooth.raf(time.elapsed_secs_f64());
    }
}
