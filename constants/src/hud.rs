/// Fraction of an entry's box that must be on screen to start its reveal.
pub const HUD_VISIBILITY_THRESHOLD: f32 = 0.5;

/// Scramble length of a HUD reveal (seconds).
pub const HUD_REVEAL_SECONDS: f32 = 1.2;

/// Minimum interval between scramble re-rolls (seconds).
pub const HUD_SCRAMBLE_INTERVAL: f32 = 0.045;

pub const SCRAMBLE_DIGITS: &[u8] = b"0123456789";
pub const SCRAMBLE_LETTERS: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";
