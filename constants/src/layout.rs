/// Allowed excess of document width over viewport width (px).
pub const OVERFLOW_TOLERANCE_PX: f32 = 2.0;

/// Highest opacity the transition overlay may show while scrolling.
pub const MAX_TRANSITION_OVERLAY_OPACITY: f32 = 0.2;

/// Opacity below which text is not considered visible.
pub const VISIBLE_TEXT_MIN_OPACITY: f32 = 0.01;

/// Wheel steps of the default audit scenario.
pub const AUDIT_WHEEL_STEPS: usize = 7;

/// Wheel delta per audit step (px).
pub const AUDIT_WHEEL_STEP_PX: f32 = 680.0;

/// Settle time after each audit wheel step (milliseconds).
pub const AUDIT_SETTLE_MS: u64 = 520;

/// Viewports exercised by the default audit scenario (width, height).
pub const AUDIT_VIEWPORTS: &[(f32, f32)] = &[
    (1366.0, 768.0),
    (1920.0, 1080.0),
    (1280.0, 800.0),
    (820.0, 1180.0),
    (390.0, 844.0),
];

/// Fade-out of the loading mask once content is ready (seconds).
pub const TRANSITION_FADE_SECONDS: f32 = 0.7;

/// Delay from ready until the loading mask is removed (seconds).
pub const TRANSITION_REMOVE_SECONDS: f32 = 0.8;

/// Loading time after which the mask fades regardless of readiness (seconds).
pub const TRANSITION_TIMEOUT_SECONDS: f32 = 6.0;

/// Warnings and errors kept for the layout audit; later entries are dropped.
pub const AUDIT_CONSOLE_CAPACITY: usize = 256;
