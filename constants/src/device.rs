/// Viewports narrower than this are always classified as the low tier.
pub const MOBILE_MAX_WIDTH: f32 = 768.0;

/// Compact desktop width; narrower viewports cap at the medium tier.
pub const COMPACT_DESKTOP_WIDTH: f32 = 1280.0;

/// Compact desktop height; shorter viewports cap at the medium tier.
pub const COMPACT_DESKTOP_HEIGHT: f32 = 720.0;

/// Renderer substrings of mobile and software GPUs (lowercase).
///
/// Safari reports "Apple GPU" on phones and M-series Macs alike, so it is
/// not listed; the width rule already catches phones.
pub const DEFAULT_WEAK_GPU_PATTERNS: &[&str] = &[
    "mali",
    "adreno",
    "powervr",
    "videocore",
    "swiftshader",
    "llvmpipe",
    "softpipe",
    "microsoft basic render",
    "intel(r) hd graphics",
];

/// Renderer substrings of mid-tier integrated GPUs (lowercase).
pub const DEFAULT_MID_GPU_PATTERNS: &[&str] = &[
    "intel",
    "iris",
    "uhd graphics",
    "radeon(tm) graphics",
    "radeon graphics",
    "apple m1",
];
