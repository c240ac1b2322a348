//! Shared tuning constants for the showcase engine and the layout guard.

/// Viewport and GPU classification thresholds.
pub mod device;

/// Layout stability bounds and the default scroll audit scenario.
pub mod layout;

/// HUD counter reveal timings and scramble alphabets.
pub mod hud;

/// Particle budgets and velocity gates for the quality profile.
pub mod quality;

/// Colours and camera framing for the scene.
pub mod render_settings;

/// Smooth-scroll, scrub and snap timings.
pub mod scroll;
