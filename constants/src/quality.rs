/// Particle ceiling for the low tier, spent on a flat sparkle since
/// volumetrics are off.
pub const LOW_PARTICLE_BUDGET: u32 = 64;

/// Reduced particle budget for the medium tier.
pub const MEDIUM_PARTICLE_BUDGET: u32 = 600;

/// Full particle budget for the high tier.
pub const HIGH_PARTICLE_BUDGET: u32 = 2400;

/// Absolute scroll velocity (px per frame) above which chromatic aberration
/// is dropped for the frame.
pub const FAST_SCROLL_VELOCITY: f32 = 40.0;

/// Chromatic aberration intensity at rest.
pub const CHROMATIC_ABERRATION_BASE: f32 = 0.015;

/// Additional aberration per px/frame of velocity, below the fast-scroll gate.
pub const CHROMATIC_ABERRATION_PER_VELOCITY: f32 = 0.0008;

/// Radius of the spherical shell the particle field is scattered across.
pub const PARTICLE_SHELL_RADIUS: f32 = 3.2;
