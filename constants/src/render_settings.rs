use bevy::color::Color;

/// Scene clear colour, also the loading mask colour.
pub const BACKGROUND_COLOUR: Color = Color::srgb(0.0196, 0.0196, 0.0627);

/// Default accent used when a section does not configure one.
pub const DEFAULT_ACCENT_COLOUR: Color = Color::srgb(0.831, 0.659, 0.325);

/// Camera vertical field of view (degrees).
pub const CAMERA_FOV_DEGREES: f32 = 35.0;

/// Orbit radius used by sections that do not configure one.
pub const DEFAULT_ORBIT_RADIUS: f32 = 5.0;

/// Product bob amplitude (world units) and angular speed (rad/s).
pub const PRODUCT_BOB_AMPLITUDE: f32 = 0.03;
pub const PRODUCT_BOB_SPEED: f32 = 0.5;
