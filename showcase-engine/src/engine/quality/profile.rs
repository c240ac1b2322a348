use crate::engine::device::tier::DeviceTier;
use bevy::prelude::*;
use constants::quality::{
    FAST_SCROLL_VELOCITY, HIGH_PARTICLE_BUDGET, LOW_PARTICLE_BUDGET, MEDIUM_PARTICLE_BUDGET,
};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BloomLevel {
    Off,
    /// Fewer mips, lower intensity.
    Standard,
    /// Full mip chain bloom, the most expensive configuration.
    Full,
}

/// Render passes and budgets for the current frame.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QualityProfile {
    pub enable_bloom: bool,
    pub bloom_level: BloomLevel,
    pub enable_volumetrics: bool,
    pub particle_budget: u32,
    pub enable_post_aa: bool,
    /// Screen-space ambient occlusion. Replaces MSAA with FXAA on the camera.
    pub enable_ambient_occlusion: bool,
    pub enable_chromatic_aberration: bool,
}

impl Default for QualityProfile {
    fn default() -> Self {
        derive_profile(DeviceTier::default(), None)
    }
}

fn tier_profile(tier: DeviceTier) -> QualityProfile {
    match tier {
        DeviceTier::Low => QualityProfile {
            enable_bloom: false,
            bloom_level: BloomLevel::Off,
            enable_volumetrics: false,
            particle_budget: LOW_PARTICLE_BUDGET,
            enable_post_aa: false,
            enable_ambient_occlusion: false,
            enable_chromatic_aberration: false,
        },
        DeviceTier::Medium => QualityProfile {
            enable_bloom: true,
            bloom_level: BloomLevel::Standard,
            enable_volumetrics: true,
            particle_budget: MEDIUM_PARTICLE_BUDGET,
            enable_post_aa: true,
            enable_ambient_occlusion: false,
            enable_chromatic_aberration: true,
        },
        DeviceTier::High => QualityProfile {
            enable_bloom: true,
            bloom_level: BloomLevel::Full,
            enable_volumetrics: true,
            particle_budget: HIGH_PARTICLE_BUDGET,
            enable_post_aa: true,
            enable_ambient_occlusion: true,
            enable_chromatic_aberration: true,
        },
    }
}

/// Profile for a tier, with chromatic aberration dropped for any frame
/// scrolling faster than `FAST_SCROLL_VELOCITY`. Holds no state, so the
/// next slow frame gets the full profile back.
pub fn derive_profile(tier: DeviceTier, velocity: Option<f32>) -> QualityProfile {
    let mut profile = tier_profile(tier);
    if velocity.is_some_and(|v| v.abs() > FAST_SCROLL_VELOCITY) {
        profile.enable_chromatic_aberration = false;
    }
    profile
}
