//! The 3D stage around the product.
//!
//! A placeholder product model with an accent-tinted edge, a ground plane
//! and a three-light base rig. The configured environment preset adds its
//! softbox lights once the config is in. Real product meshes replace
//! [`product::spawn_product`] without touching anything else.

/// Environment lighting presets.
pub mod environment;

/// Product placeholder, its idle bob and accent tint.
pub mod product;

/// Ground plane and lighting rig.
pub mod stage;

use crate::engine::assets::showcase_config::ShowcaseConfig;
use crate::engine::camera::camera_rig::spawn_orbit_camera;
use crate::engine::camera::orbit_director::OrbitTarget;
use crate::engine::core::app_state::{AppState, FrameSet};
use bevy::prelude::*;
use constants::render_settings::BACKGROUND_COLOUR;
use environment::{EnvironmentLight, apply_environment};
use product::{bob_product, spawn_product, tint_accent_edge};
use stage::{BASE_AMBIENT_BRIGHTNESS, spawn_ground, spawn_lights};

pub struct ScenePlugin;

impl Plugin for ScenePlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(ClearColor(BACKGROUND_COLOUR))
            .add_systems(Startup, setup_scene)
            .add_systems(OnEnter(AppState::Running), light_environment)
            .add_systems(
                Update,
                (bob_product, tint_accent_edge).in_set(FrameSet::Render),
            );
    }
}

fn setup_scene(
    mut commands: Commands,
    target: Res<OrbitTarget>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    spawn_orbit_camera(&mut commands, &target);
    spawn_product(&mut commands, &mut meshes, &mut materials);
    spawn_ground(&mut commands, &mut meshes, &mut materials);
    spawn_lights(&mut commands);
}

fn light_environment(
    mut commands: Commands,
    config: Res<ShowcaseConfig>,
    existing: Query<Entity, With<EnvironmentLight>>,
    mut ambient: ResMut<AmbientLight>,
) {
    let options = config.environment;
    apply_environment(
        &mut commands,
        &options,
        &existing,
        &mut ambient,
        BASE_AMBIENT_BRIGHTNESS,
    );
    info!(
        "Environment preset {:?} at intensity {}",
        options.preset, options.intensity
    );
}
