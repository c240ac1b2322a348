use super::orbit_director::OrbitTarget;
use bevy::prelude::*;
use constants::render_settings::{BACKGROUND_COLOUR, CAMERA_FOV_DEGREES};

/// The single scene camera driven by the orbit director.
#[derive(Component)]
pub struct OrbitCamera;

pub fn orbit_transform(target: &OrbitTarget) -> Transform {
    Transform::from_translation(target.camera_position()).looking_at(target.look_at(), Vec3::Y)
}

/// HDR so bloom can be toggled without respawning. Post-processing
/// components are added and removed by the quality gate.
pub fn spawn_orbit_camera(commands: &mut Commands, target: &OrbitTarget) -> Entity {
    commands
        .spawn((
            Camera3d::default(),
            Camera {
                hdr: true,
                clear_color: ClearColorConfig::Custom(BACKGROUND_COLOUR),
                ..default()
            },
            Projection::Perspective(PerspectiveProjection {
                fov: CAMERA_FOV_DEGREES.to_radians(),
                ..default()
            }),
            orbit_transform(target),
            OrbitCamera,
        ))
        .id()
}

/// Read the director's pose into the camera transform. Never writes the pose.
pub fn apply_orbit_target(
    target: Res<OrbitTarget>,
    mut cameras: Query<&mut Transform, With<OrbitCamera>>,
) {
    for mut transform in &mut cameras {
        transform.set_if_neq(orbit_transform(&target));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn camera_faces_the_look_at_point() {
        let target = OrbitTarget {
            azimuth: 1.0,
            polar_angle: 1.2,
            radius: 4.5,
            look_at_y: 0.3,
        };
        let transform = orbit_transform(&target);
        let towards = (target.look_at() - transform.translation).normalize();
        let forward = transform.forward();
        assert_relative_eq!(forward.dot(towards), 1.0, epsilon = 1e-5);
        assert_relative_eq!(transform.translation.length(), 4.5, epsilon = 1e-5);
    }

    #[test]
    fn system_moves_only_orbit_cameras() {
        let mut app = App::new();
        app.insert_resource(OrbitTarget {
            azimuth: 0.0,
            polar_angle: std::f32::consts::FRAC_PI_2,
            radius: 6.0,
            look_at_y: 0.0,
        })
        .add_systems(Update, apply_orbit_target);
        let orbit = app
            .world_mut()
            .spawn((Transform::default(), OrbitCamera))
            .id();
        let other = app.world_mut().spawn(Transform::default()).id();

        app.update();
        let moved = app.world().get::<Transform>(orbit).unwrap().translation;
        assert_relative_eq!(moved.z, 6.0, epsilon = 1e-5);
        assert_eq!(app.world().get::<Transform>(other).unwrap().translation, Vec3::ZERO);
    }
}
