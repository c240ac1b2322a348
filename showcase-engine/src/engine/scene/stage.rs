use bevy::prelude::*;
use constants::render_settings::BACKGROUND_COLOUR;

const GROUND_SIZE: f32 = 50.0;

/// Ambient brightness of the base rig, before any environment preset.
pub const BASE_AMBIENT_BRIGHTNESS: f32 = 150.0;

#[derive(Component)]
pub struct Ground;

/// Dark, faintly reflective floor under the product.
pub fn spawn_ground(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
) -> Entity {
    let material = materials.add(StandardMaterial {
        base_color: BACKGROUND_COLOUR,
        metallic: 0.5,
        perceptual_roughness: 0.35,
        reflectance: 0.6,
        ..default()
    });
    commands
        .spawn((
            Mesh3d(meshes.add(Plane3d::default().mesh().size(GROUND_SIZE, GROUND_SIZE))),
            MeshMaterial3d(material),
            Transform::from_xyz(0.0, -0.01, 0.0),
            Ground,
        ))
        .id()
}

/// Studio rig: low ambient, a shadow-casting key light and a warm rim spot.
pub fn spawn_lights(commands: &mut Commands) {
    commands.insert_resource(AmbientLight {
        color: Color::WHITE,
        brightness: BASE_AMBIENT_BRIGHTNESS,
        ..default()
    });
    commands.spawn((
        DirectionalLight {
            illuminance: 4_000.0,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(5.0, 8.0, 3.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));
    commands.spawn((
        PointLight {
            intensity: 200_000.0,
            color: Color::srgb(0.85, 0.88, 1.0),
            ..default()
        },
        Transform::from_xyz(3.0, 2.0, 4.0),
    ));
    commands.spawn((
        SpotLight {
            intensity: 600_000.0,
            color: Color::srgb_u8(0xff, 0xd4, 0xa0),
            outer_angle: 0.4,
            inner_angle: 0.4 * 0.2,
            ..default()
        },
        Transform::from_xyz(-3.0, 5.0, -3.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));
}
