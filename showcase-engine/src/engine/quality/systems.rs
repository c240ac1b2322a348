use super::profile::{BloomLevel, QualityProfile, derive_profile};
use crate::engine::camera::camera_rig::OrbitCamera;
use crate::engine::device::systems::DeviceClassification;
use crate::engine::scroll::signal::ScrollSignalPublisher;
use bevy::core_pipeline::fxaa::Fxaa;
use bevy::core_pipeline::bloom::Bloom;
use bevy::core_pipeline::post_process::ChromaticAberration;
use bevy::core_pipeline::prepass::{DepthPrepass, NormalPrepass};
use bevy::pbr::{ScreenSpaceAmbientOcclusion, ScreenSpaceAmbientOcclusionQualityLevel};
use bevy::prelude::*;
use constants::quality::{
    CHROMATIC_ABERRATION_BASE, CHROMATIC_ABERRATION_PER_VELOCITY, FAST_SCROLL_VELOCITY,
};

/// Re-derive the profile from the current tier and this frame's velocity.
/// Only a changed profile marks the resource as changed.
pub fn update_quality_profile(
    classification: Res<DeviceClassification>,
    publisher: Res<ScrollSignalPublisher>,
    mut profile: ResMut<QualityProfile>,
) {
    let velocity = publisher.latest().velocity;
    let next = derive_profile(classification.tier, Some(velocity));
    let previous = *profile;
    if !profile.set_if_neq(next) {
        return;
    }

    if previous.enable_chromatic_aberration != next.enable_chromatic_aberration
        && previous.particle_budget == next.particle_budget
    {
        debug!(
            "Chromatic aberration {} at {:.1}px/frame",
            if next.enable_chromatic_aberration { "restored" } else { "suppressed" },
            velocity
        );
    } else {
        info!(
            "Quality profile for {} tier: bloom {:?}, volumetrics {}, particles {}, AA {}, AO {}",
            classification.tier.as_str(),
            next.bloom_level,
            next.enable_volumetrics,
            next.particle_budget,
            next.enable_post_aa,
            next.enable_ambient_occlusion
        );
    }
}

fn bloom_for(level: BloomLevel) -> Option<Bloom> {
    match level {
        BloomLevel::Off => None,
        BloomLevel::Standard => Some(Bloom {
            intensity: 0.12,
            max_mip_dimension: 256,
            ..Bloom::NATURAL
        }),
        BloomLevel::Full => Some(Bloom::NATURAL),
    }
}

/// Add or remove the camera's post-processing when the profile changes.
pub fn apply_quality_to_camera(
    mut commands: Commands,
    profile: Res<QualityProfile>,
    cameras: Query<Entity, With<OrbitCamera>>,
    added: Query<(), Added<OrbitCamera>>,
) {
    if !profile.is_changed() && added.is_empty() {
        return;
    }

    for entity in &cameras {
        let mut camera = commands.entity(entity);

        match bloom_for(profile.bloom_level).filter(|_| profile.enable_bloom) {
            Some(bloom) => camera.insert(bloom),
            None => camera.remove::<Bloom>(),
        };

        // SSAO cannot run on a multisampled target, so it brings its own
        // prepasses and swaps MSAA for FXAA.
        if profile.enable_ambient_occlusion {
            camera.insert((
                ScreenSpaceAmbientOcclusion {
                    quality_level: ScreenSpaceAmbientOcclusionQualityLevel::High,
                    ..default()
                },
                DepthPrepass,
                NormalPrepass,
                Msaa::Off,
            ));
            if profile.enable_post_aa {
                camera.insert(Fxaa::default());
            } else {
                camera.remove::<Fxaa>();
            }
        } else {
            camera.remove::<(ScreenSpaceAmbientOcclusion, DepthPrepass, NormalPrepass, Fxaa)>();
            camera.insert(if profile.enable_post_aa {
                Msaa::Sample4
            } else {
                Msaa::Off
            });
        }

        if profile.enable_chromatic_aberration {
            camera.insert(ChromaticAberration {
                intensity: CHROMATIC_ABERRATION_BASE,
                ..default()
            });
        } else {
            camera.remove::<ChromaticAberration>();
        }
    }
}

/// Aberration intensity as a function of scroll speed below the gate.
pub fn aberration_intensity(velocity: f32) -> f32 {
    let speed = if velocity.is_finite() {
        velocity.abs().min(FAST_SCROLL_VELOCITY)
    } else {
        0.0
    };
    CHROMATIC_ABERRATION_BASE + speed * CHROMATIC_ABERRATION_PER_VELOCITY
}

pub fn modulate_chromatic_aberration(
    publisher: Res<ScrollSignalPublisher>,
    mut cameras: Query<&mut ChromaticAberration, With<OrbitCamera>>,
) {
    let intensity = aberration_intensity(publisher.latest().velocity);
    for mut aberration in &mut cameras {
        if aberration.intensity != intensity {
            aberration.intensity = intensity;
        }
    }
}
