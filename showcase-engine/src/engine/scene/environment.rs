use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Image-based lighting stand-ins selectable from the showcase config.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnvironmentPreset {
    /// Overhead softbox with two tall strips either side, as in a product
    /// photography studio.
    #[default]
    Studio,
    /// Only the base rig.
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvironmentOptions {
    pub preset: EnvironmentPreset,
    /// Scales every light the preset adds.
    pub intensity: f32,
}

impl Default for EnvironmentOptions {
    fn default() -> Self {
        Self {
            preset: EnvironmentPreset::Studio,
            intensity: 1.0,
        }
    }
}

/// Light added by the environment preset.
#[derive(Component)]
pub struct EnvironmentLight;

/// Large soft emitter: position, source radius (soft highlight size) and
/// lumens at intensity 1.
#[derive(Debug, Clone, Copy)]
pub struct Softbox {
    pub position: Vec3,
    pub radius: f32,
    pub lumens: f32,
    pub colour: Color,
}

const STUDIO_SOFTBOXES: [Softbox; 3] = [
    Softbox {
        position: Vec3::new(0.0, 6.0, 0.5),
        radius: 1.5,
        lumens: 300_000.0,
        colour: Color::WHITE,
    },
    Softbox {
        position: Vec3::new(-5.0, 2.5, 1.0),
        radius: 0.6,
        lumens: 120_000.0,
        colour: Color::srgb(0.95, 0.97, 1.0),
    },
    Softbox {
        position: Vec3::new(5.0, 2.5, -1.0),
        radius: 0.6,
        lumens: 120_000.0,
        colour: Color::srgb(1.0, 0.97, 0.93),
    },
];

/// Ambient brightness the studio adds on top of the base rig.
const STUDIO_AMBIENT: f32 = 250.0;

pub fn softboxes(preset: EnvironmentPreset) -> &'static [Softbox] {
    match preset {
        EnvironmentPreset::Studio => &STUDIO_SOFTBOXES,
        EnvironmentPreset::None => &[],
    }
}

/// Replace any previous preset lights with those of `options`.
pub fn apply_environment(
    commands: &mut Commands,
    options: &EnvironmentOptions,
    existing: impl IntoIterator<Item = Entity>,
    ambient: &mut AmbientLight,
    base_ambient: f32,
) {
    for entity in existing {
        commands.entity(entity).despawn();
    }

    let intensity = if options.intensity.is_finite() {
        options.intensity.max(0.0)
    } else {
        1.0
    };
    let boxes = softboxes(options.preset);
    for softbox in boxes {
        commands.spawn((
            PointLight {
                intensity: softbox.lumens * intensity,
                radius: softbox.radius,
                color: softbox.colour,
                shadows_enabled: false,
                ..default()
            },
            Transform::from_translation(softbox.position),
            EnvironmentLight,
        ));
    }

    ambient.brightness = base_ambient
        + if boxes.is_empty() {
            0.0
        } else {
            STUDIO_AMBIENT * intensity
        };
}
