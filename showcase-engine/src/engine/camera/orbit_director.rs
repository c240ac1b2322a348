use crate::engine::assets::showcase_config::{Section, ShowcaseConfig};
use crate::engine::scroll::trigger::{ScrollTriggerEngine, TriggerId};
use bevy::prelude::*;
use constants::render_settings::DEFAULT_ORBIT_RADIUS;
use serde::Serialize;
use std::f32::consts::FRAC_PI_2;

/// Live camera pose in spherical coordinates around the product.
/// Written only by [`direct_orbit`].
#[derive(Resource, Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OrbitTarget {
    pub azimuth: f32,
    pub polar_angle: f32,
    pub radius: f32,
    pub look_at_y: f32,
}

impl Default for OrbitTarget {
    fn default() -> Self {
        Self {
            azimuth: 0.0,
            polar_angle: FRAC_PI_2,
            radius: DEFAULT_ORBIT_RADIUS,
            look_at_y: 0.0,
        }
    }
}

impl OrbitTarget {
    pub fn from_section(section: &Section) -> Self {
        Self {
            azimuth: section.azimuth,
            polar_angle: section.polar_angle,
            radius: section.radius_or_default(),
            look_at_y: section.look_at_y_or_default(),
        }
    }

    pub fn camera_position(&self) -> Vec3 {
        let (sin_polar, cos_polar) = self.polar_angle.sin_cos();
        let (sin_azimuth, cos_azimuth) = self.azimuth.sin_cos();
        Vec3::new(
            self.radius * sin_polar * sin_azimuth,
            self.radius * cos_polar,
            self.radius * sin_polar * cos_azimuth,
        )
    }

    pub fn look_at(&self) -> Vec3 {
        Vec3::new(0.0, self.look_at_y, 0.0)
    }
}

/// The camera timeline's trigger, created once sections are known.
#[derive(Resource, Debug, Clone, Copy)]
pub struct CameraTimeline(pub TriggerId);

/// Section the camera is currently closest to.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActiveSection(pub usize);

pub fn smoothstep(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

fn blend(from: f32, to: f32, eased: f32) -> f32 {
    from + (to - from) * eased
}

/// Clamp progress into `[0, 1]`, mapping NaN to the start.
pub fn clamp_progress(progress: f32) -> f32 {
    if progress.is_nan() {
        0.0
    } else {
        progress.clamp(0.0, 1.0)
    }
}

/// Eased pose between the two sections bracketing `progress`.
///
/// Progress is expected to come out of the camera timeline already scrubbed
/// and snapped; this only interpolates. Boundary progress reproduces the
/// first or last section exactly.
pub fn compute_orbit_target(sections: &[Section], progress: f32) -> OrbitTarget {
    match sections {
        [] => return OrbitTarget::default(),
        [only] => return OrbitTarget::from_section(only),
        _ => {}
    }

    let last = sections.len() - 1;
    let scaled = clamp_progress(progress) * last as f32;
    let lower = (scaled.floor() as usize).min(last);
    let upper = (scaled.ceil() as usize).min(last);
    let eased = smoothstep(scaled - lower as f32);

    let from = OrbitTarget::from_section(&sections[lower]);
    let to = OrbitTarget::from_section(&sections[upper]);
    OrbitTarget {
        azimuth: blend(from.azimuth, to.azimuth, eased),
        polar_angle: blend(from.polar_angle, to.polar_angle, eased),
        radius: blend(from.radius, to.radius, eased),
        look_at_y: blend(from.look_at_y, to.look_at_y, eased),
    }
}

/// Nearest section to `progress`.
pub fn section_at(section_count: usize, progress: f32) -> usize {
    if section_count < 2 {
        return 0;
    }
    let last = section_count - 1;
    ((clamp_progress(progress) * last as f32).round() as usize).min(last)
}

pub fn direct_orbit(
    config: Option<Res<ShowcaseConfig>>,
    timeline: Option<Res<CameraTimeline>>,
    triggers: Option<Res<ScrollTriggerEngine>>,
    mut target: ResMut<OrbitTarget>,
    mut active: ResMut<ActiveSection>,
) {
    let Some(config) = config else {
        return;
    };
    let progress = match (timeline, triggers) {
        (Some(timeline), Some(triggers)) => triggers.progress(timeline.0).unwrap_or(0.0),
        _ => 0.0,
    };

    target.set_if_neq(compute_orbit_target(&config.sections, progress));
    if active.set_if_neq(ActiveSection(section_at(config.section_count(), progress))) {
        debug!("Active section → {}", active.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn poses(poses: &[(f32, f32, Option<f32>)]) -> Vec<Section> {
        let mut config = ShowcaseConfig::default();
        config.sections.truncate(1);
        let template = config.sections.remove(0);
        poses
            .iter()
            .enumerate()
            .map(|(index, &(azimuth, polar_angle, radius))| Section {
                index,
                azimuth,
                polar_angle,
                radius,
                look_at_y: None,
                ..template.clone()
            })
            .collect()
    }

    #[test]
    fn two_sections_reproduce_their_poses_at_the_ends() {
        let sections = poses(&[(0.3, 1.1, Some(4.0)), (2.9, 0.7, Some(6.5))]);
        assert_eq!(
            compute_orbit_target(&sections, 0.0),
            OrbitTarget::from_section(&sections[0])
        );
        assert_eq!(
            compute_orbit_target(&sections, 1.0),
            OrbitTarget::from_section(&sections[1])
        );
    }

    #[test]
    fn out_of_range_progress_clamps_to_the_boundary() {
        let sections = ShowcaseConfig::default().sections;
        let start = compute_orbit_target(&sections, 0.0);
        let end = compute_orbit_target(&sections, 1.0);
        for p in [-0.001, -0.2, -10.0, f32::NEG_INFINITY, f32::NAN] {
            assert_eq!(compute_orbit_target(&sections, p), start, "progress {p}");
        }
        for p in [1.0001, 1.3, 42.0, f32::INFINITY] {
            assert_eq!(compute_orbit_target(&sections, p), end, "progress {p}");
        }
    }

    #[test]
    fn midpoint_between_sections_interpolates_strictly_inside() {
        let sections = ShowcaseConfig::default().sections;
        let (a, b) = (&sections[2], &sections[3]);

        // Progress is scaled by (n - 1), so halfway between 2 and 3 is 2.5 / 4.
        let target = compute_orbit_target(&sections, 2.5 / 4.0);
        for (value, from, to) in [
            (target.azimuth, a.azimuth, b.azimuth),
            (target.polar_angle, a.polar_angle, b.polar_angle),
        ] {
            assert!(value != from && value != to);
            assert!(value > from.min(to) && value < from.max(to));
        }

        // Half of the page lands exactly on section 2.
        assert_eq!(
            compute_orbit_target(&sections, 0.5),
            OrbitTarget::from_section(a)
        );
    }

    #[test]
    fn blending_is_eased_not_linear() {
        let sections = poses(&[(0.0, 1.0, None), (1.0, 1.0, None)]);
        let quarter = compute_orbit_target(&sections, 0.25);
        assert_relative_eq!(quarter.azimuth, smoothstep(0.25));
        assert!(quarter.azimuth < 0.25);
        assert_relative_eq!(quarter.radius, DEFAULT_ORBIT_RADIUS);
    }

    #[test]
    fn single_and_empty_configurations_are_static() {
        let sections = poses(&[(1.2, 0.9, Some(3.0))]);
        for p in [0.0, 0.5, 1.0] {
            assert_eq!(
                compute_orbit_target(&sections, p),
                OrbitTarget::from_section(&sections[0])
            );
        }
        assert_eq!(compute_orbit_target(&[], 0.5), OrbitTarget::default());
    }

    #[test]
    fn camera_position_follows_spherical_coordinates() {
        let front = OrbitTarget {
            azimuth: 0.0,
            polar_angle: FRAC_PI_2,
            radius: 5.0,
            look_at_y: 0.0,
        };
        let position = front.camera_position();
        assert_relative_eq!(position.x, 0.0, epsilon = 1e-6);
        assert_relative_eq!(position.y, 0.0, epsilon = 1e-6);
        assert_relative_eq!(position.z, 5.0, epsilon = 1e-6);

        let side = OrbitTarget {
            azimuth: FRAC_PI_2,
            ..front
        };
        assert_relative_eq!(side.camera_position().x, 5.0, epsilon = 1e-6);
    }

    #[test]
    fn active_section_rounds_to_the_nearest() {
        assert_eq!(section_at(5, 0.0), 0);
        assert_eq!(section_at(5, 0.3), 1);
        assert_eq!(section_at(5, 0.62), 2);
        assert_eq!(section_at(5, 1.0), 4);
        assert_eq!(section_at(1, 0.8), 0);
    }
}
