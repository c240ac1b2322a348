/// Smooth-scroll damping intensity (fraction of the gap closed per 60 Hz frame).
pub const SMOOTH_SCROLL_LERP: f32 = 0.07;

/// Smooth-scroll animation length when no lerp is configured (seconds).
pub const SMOOTH_SCROLL_DURATION: f32 = 1.2;

/// Wheel delta multiplier.
pub const WHEEL_MULTIPLIER: f32 = 1.0;

/// Pixels per wheel "line" for line-based scroll devices.
pub const WHEEL_LINE_HEIGHT: f32 = 100.0;

/// Distance (px) under which the damped scroll snaps onto its target.
pub const SCROLL_SETTLE_EPSILON: f32 = 0.5;

/// Camera timeline scrub lag (seconds to catch up).
pub const CAMERA_SCRUB_SECONDS: f32 = 1.5;

/// Section copy scrub lag (seconds to catch up).
pub const SECTION_SCRUB_SECONDS: f32 = 0.8;

/// Shortest snap animation (seconds).
pub const SNAP_DURATION_MIN: f32 = 0.3;

/// Longest snap animation (seconds).
pub const SNAP_DURATION_MAX: f32 = 0.8;

/// Idle time after the last scroll movement before a snap starts (seconds).
pub const SNAP_DELAY: f32 = 0.1;

/// Speed (px per frame) under which scrolling counts as at rest for snapping.
pub const SNAP_REST_VELOCITY: f32 = 0.5;
