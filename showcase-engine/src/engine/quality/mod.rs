//! Render cost adaptation.
//!
//! The profile is a pure function of device tier and the current scroll
//! velocity. Systems here re-derive it each frame, push changes into the
//! camera's post-processing and size the particle field to its budget.

/// `QualityProfile` and `derive_profile`.
pub mod profile;

/// Profile updates and camera post-processing.
pub mod systems;

/// Volumetric particle field sized by the particle budget.
pub mod particles;

use crate::engine::core::app_state::FrameSet;
use bevy::prelude::*;
use particles::{ParticleField, drift_particles, sync_particle_field};
use profile::QualityProfile;
use systems::{apply_quality_to_camera, modulate_chromatic_aberration, update_quality_profile};

pub struct QualityPlugin;

impl Plugin for QualityPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<QualityProfile>()
            .init_resource::<ParticleField>()
            .add_systems(
                Update,
                (update_quality_profile, apply_quality_to_camera)
                    .chain()
                    .in_set(FrameSet::QualityGate),
            )
            .add_systems(
                Update,
                (sync_particle_field, drift_particles, modulate_chromatic_aberration)
                    .in_set(FrameSet::Render),
            );
    }
}
