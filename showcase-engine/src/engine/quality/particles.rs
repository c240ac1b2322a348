use super::profile::QualityProfile;
use crate::engine::scroll::signal::ScrollSignalPublisher;
use bevy::prelude::*;
use constants::quality::PARTICLE_SHELL_RADIUS;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::f32::consts::TAU;

/// One mote of the field, drifting around its home position.
#[derive(Component, Debug, Clone, Copy)]
pub struct Particle {
    pub home: Vec3,
    pub phase: f32,
    pub speed: f32,
    /// Additive glow when true, otherwise a flat sparkle.
    pub volumetric: bool,
}

/// Shared meshes, materials and scatter state for the particle field.
#[derive(Resource)]
pub struct ParticleField {
    rng: SmallRng,
    mesh: Option<Handle<Mesh>>,
    glow: Option<Handle<StandardMaterial>>,
    sparkle: Option<Handle<StandardMaterial>>,
    volumetric: Option<bool>,
}

impl Default for ParticleField {
    fn default() -> Self {
        Self {
            rng: SmallRng::seed_from_u64(0x5eed),
            mesh: None,
            glow: None,
            sparkle: None,
            volumetric: None,
        }
    }
}

/// Particles the field should hold for a profile. Without volumetrics the
/// budget is spent on the cheap sparkle instead.
pub fn particle_target_count(profile: &QualityProfile) -> usize {
    profile.particle_budget as usize
}

fn glow_material() -> StandardMaterial {
    StandardMaterial {
        base_color: Color::srgba(1.0, 0.95, 0.85, 0.6),
        emissive: LinearRgba::rgb(1.6, 1.4, 1.1),
        alpha_mode: AlphaMode::Add,
        unlit: true,
        ..default()
    }
}

/// Opaque and unlit: no blending and nothing for bloom to pick up.
fn sparkle_material() -> StandardMaterial {
    StandardMaterial {
        base_color: Color::srgb(0.75, 0.72, 0.66),
        unlit: true,
        ..default()
    }
}

/// Uniform point in a shell between 60 % and 100 % of `radius`.
pub fn scatter_on_shell(rng: &mut impl Rng, radius: f32) -> Vec3 {
    let azimuth = rng.gen_range(0.0..TAU);
    let cos_polar: f32 = rng.gen_range(-1.0..1.0);
    let sin_polar = (1.0 - cos_polar * cos_polar).sqrt();
    let distance = radius * rng.gen_range(0.6..1.0);
    Vec3::new(
        distance * sin_polar * azimuth.cos(),
        distance * cos_polar,
        distance * sin_polar * azimuth.sin(),
    )
}

/// Grow or shrink the field to the active budget.
pub fn sync_particle_field(
    mut commands: Commands,
    profile: Res<QualityProfile>,
    particles: Query<Entity, With<Particle>>,
    mut field: ResMut<ParticleField>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    if !profile.is_changed() {
        return;
    }

    let target = particle_target_count(&profile);
    let volumetric = profile.enable_volumetrics;
    let mut current = particles.iter().len();

    // Switching between glow and sparkle rebuilds the whole field.
    if field.volumetric.replace(volumetric) != Some(volumetric) && current > 0 {
        for entity in &particles {
            commands.entity(entity).despawn();
        }
        current = 0;
    }

    if current > target {
        for entity in particles.iter().skip(target) {
            commands.entity(entity).despawn();
        }
        info!("Particle field trimmed {} → {}", current, target);
        return;
    }
    if current == target {
        return;
    }

    let mesh = field
        .mesh
        .get_or_insert_with(|| meshes.add(Sphere::new(0.012).mesh().uv(8, 6)))
        .clone();
    let material = if volumetric {
        field.glow.get_or_insert_with(|| materials.add(glow_material()))
    } else {
        field.sparkle.get_or_insert_with(|| materials.add(sparkle_material()))
    }
    .clone();

    for _ in current..target {
        let home = scatter_on_shell(&mut field.rng, PARTICLE_SHELL_RADIUS);
        let particle = Particle {
            home,
            phase: field.rng.gen_range(0.0..TAU),
            speed: field.rng.gen_range(0.2..0.6),
            volumetric,
        };
        commands.spawn((
            Mesh3d(mesh.clone()),
            MeshMaterial3d(material.clone()),
            Transform::from_translation(home),
            particle,
        ));
    }
    info!(
        "Particle field grown {} → {} ({})",
        current,
        target,
        if volumetric { "volumetric" } else { "sparkle" }
    );
}

/// Drift amplitude multiplier for a scroll velocity in px per frame.
pub fn turbulence(velocity: f32) -> f32 {
    if velocity.is_finite() {
        1.0 + (velocity.abs() * 0.05).min(2.0)
    } else {
        1.0
    }
}

/// Slow orbit and bob around each home position, stirred by scroll speed.
pub fn drift_particles(
    time: Res<Time>,
    publisher: Res<ScrollSignalPublisher>,
    mut particles: Query<(&Particle, &mut Transform)>,
) {
    let elapsed = time.elapsed_secs();
    let stir = turbulence(publisher.latest().velocity);

    for (particle, mut transform) in &mut particles {
        let angle = elapsed * particle.speed * 0.1 + particle.phase;
        let swirl = Quat::from_rotation_y(elapsed * particle.speed * 0.05);
        let wobble = Vec3::new(angle.sin(), (angle * 1.3).cos(), angle.cos()) * 0.04 * stir;
        transform.translation = swirl * particle.home + wobble;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::device::tier::DeviceTier;
    use crate::engine::quality::profile::derive_profile;
    use constants::quality::LOW_PARTICLE_BUDGET;

    fn app() -> App {
        let mut app = App::new();
        app.init_resource::<Assets<Mesh>>()
            .init_resource::<Assets<StandardMaterial>>()
            .init_resource::<ParticleField>()
            .insert_resource(derive_profile(DeviceTier::High, None))
            .add_systems(Update, sync_particle_field);
        app
    }

    fn count(app: &mut App) -> usize {
        app.world_mut()
            .query_filtered::<(), With<Particle>>()
            .iter(app.world())
            .count()
    }

    fn volumetric_count(app: &mut App) -> usize {
        app.world_mut()
            .query::<&Particle>()
            .iter(app.world())
            .filter(|particle| particle.volumetric)
            .count()
    }

    #[test]
    fn field_matches_the_budget_of_each_tier() {
        let mut app = app();
        app.update();
        assert_eq!(count(&mut app), 2400);

        app.insert_resource(derive_profile(DeviceTier::Medium, None));
        app.update();
        assert_eq!(count(&mut app), 600);

        app.insert_resource(derive_profile(DeviceTier::Low, None));
        app.update();
        assert_eq!(count(&mut app), LOW_PARTICLE_BUDGET as usize);
        assert_eq!(volumetric_count(&mut app), 0);
    }

    #[test]
    fn returning_to_volumetrics_replaces_the_sparkle() {
        let mut app = app();
        app.insert_resource(derive_profile(DeviceTier::Low, None));
        app.update();
        assert_eq!(volumetric_count(&mut app), 0);

        app.insert_resource(derive_profile(DeviceTier::Medium, None));
        app.update();
        assert_eq!(count(&mut app), 600);
        assert_eq!(volumetric_count(&mut app), 600);
    }

    #[test]
    fn particles_start_inside_the_shell() {
        let mut rng = SmallRng::seed_from_u64(7);
        for _ in 0..500 {
            let distance = scatter_on_shell(&mut rng, 3.0).length();
            assert!((1.8 - 1e-4..=3.0 + 1e-4).contains(&distance));
        }
    }

    #[test]
    fn turbulence_is_bounded() {
        assert_eq!(turbulence(0.0), 1.0);
        assert_eq!(turbulence(1e6), 3.0);
        assert_eq!(turbulence(f32::NAN), 1.0);
    }
}
