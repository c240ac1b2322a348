use crate::engine::assets::showcase_config::ShowcaseConfig;
use crate::engine::camera::orbit_director::ActiveSection;
use bevy::prelude::*;
use constants::render_settings::{
    DEFAULT_ACCENT_COLOUR, PRODUCT_BOB_AMPLITUDE, PRODUCT_BOB_SPEED,
};

/// Resting height of the product above the ground plane.
const PRODUCT_BASE_HEIGHT: f32 = 0.5;
const ACCENT_EMISSIVE_STRENGTH: f32 = 2.0;

#[derive(Component)]
pub struct ProductModel;

/// Glowing edge strip tinted with the active section's accent.
#[derive(Component)]
pub struct AccentEdge;

pub fn bob_offset(elapsed_secs: f32) -> f32 {
    (elapsed_secs * PRODUCT_BOB_SPEED).sin() * PRODUCT_BOB_AMPLITUDE
}

pub fn accent_emissive(accent: Color) -> LinearRgba {
    accent.to_linear() * ACCENT_EMISSIVE_STRENGTH
}

/// Placeholder device: a dark metallic body, a glass top and an emissive edge.
pub fn spawn_product(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
) -> Entity {
    let body = materials.add(StandardMaterial {
        base_color: Color::srgb_u8(0x1a, 0x1a, 0x2e),
        metallic: 0.9,
        perceptual_roughness: 0.15,
        ..default()
    });
    let glass = materials.add(StandardMaterial {
        base_color: Color::srgba_u8(0x0a, 0x0a, 0x1a, 178),
        metallic: 0.5,
        perceptual_roughness: 0.05,
        alpha_mode: AlphaMode::Blend,
        ..default()
    });
    let edge = materials.add(StandardMaterial {
        base_color: DEFAULT_ACCENT_COLOUR,
        emissive: accent_emissive(DEFAULT_ACCENT_COLOUR),
        unlit: true,
        ..default()
    });

    commands
        .spawn((
            Transform::from_xyz(0.0, PRODUCT_BASE_HEIGHT, 0.0),
            Visibility::default(),
            ProductModel,
        ))
        .with_children(|product| {
            product.spawn((
                Mesh3d(meshes.add(Cuboid::new(2.4, 0.6, 1.6))),
                MeshMaterial3d(body),
            ));
            product.spawn((
                Mesh3d(meshes.add(Cuboid::new(2.3, 0.02, 1.5))),
                MeshMaterial3d(glass),
                Transform::from_xyz(0.0, 0.31, 0.0),
            ));
            product.spawn((
                Mesh3d(meshes.add(Cuboid::new(2.42, 0.01, 1.62))),
                MeshMaterial3d(edge),
                Transform::from_xyz(0.0, 0.3, 0.0),
                AccentEdge,
            ));
        })
        .id()
}

pub fn bob_product(time: Res<Time>, mut products: Query<&mut Transform, With<ProductModel>>) {
    let y = PRODUCT_BASE_HEIGHT + bob_offset(time.elapsed_secs());
    for mut transform in &mut products {
        transform.translation.y = y;
    }
}

pub fn tint_accent_edge(
    config: Option<Res<ShowcaseConfig>>,
    active: Res<ActiveSection>,
    edges: Query<&MeshMaterial3d<StandardMaterial>, With<AccentEdge>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let Some(config) = config else {
        return;
    };
    if !active.is_changed() && !config.is_changed() {
        return;
    }
    let accent = config
        .sections
        .get(active.0)
        .map(|section| section.accent())
        .unwrap_or(DEFAULT_ACCENT_COLOUR);

    for handle in &edges {
        if let Some(material) = materials.get_mut(&handle.0) {
            material.base_color = accent;
            material.emissive = accent_emissive(accent);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn bob_stays_within_its_amplitude() {
        assert_eq!(bob_offset(0.0), 0.0);
        for step in 0..200 {
            assert!(bob_offset(step as f32 * 0.1).abs() <= PRODUCT_BOB_AMPLITUDE);
        }
        let peak = std::f32::consts::FRAC_PI_2 / PRODUCT_BOB_SPEED;
        assert_relative_eq!(bob_offset(peak), PRODUCT_BOB_AMPLITUDE, epsilon = 1e-6);
    }

    #[test]
    fn accent_edge_follows_the_active_section() {
        let mut app = App::new();
        app.init_resource::<Assets<Mesh>>()
            .init_resource::<Assets<StandardMaterial>>()
            .init_resource::<ActiveSection>()
            .insert_resource(ShowcaseConfig::default())
            .add_systems(
                Startup,
                |mut commands: Commands,
                 mut meshes: ResMut<Assets<Mesh>>,
                 mut materials: ResMut<Assets<StandardMaterial>>| {
                    spawn_product(&mut commands, &mut meshes, &mut materials);
                },
            )
            .add_systems(Update, tint_accent_edge);

        app.update();
        app.world_mut().resource_mut::<ActiveSection>().0 = 2;
        app.update();

        let world = app.world_mut();
        let handle = world
            .query_filtered::<&MeshMaterial3d<StandardMaterial>, With<AccentEdge>>()
            .single(world)
            .unwrap()
            .0
            .clone();
        let material = app.world().resource::<Assets<StandardMaterial>>().get(&handle).unwrap();
        let expected: Color = Srgba::hex("#6fc3df").unwrap().into();
        assert_eq!(material.base_color, expected);
    }
}
