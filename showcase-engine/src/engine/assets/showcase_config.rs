use crate::engine::device::classifier::GpuPatternTable;
use crate::engine::scene::environment::EnvironmentOptions;
use crate::engine::scroll::smooth_scroll::SmoothScrollOptions;
use crate::engine::scroll::trigger::SnapConfig;
use bevy::prelude::*;
use constants::hud::{HUD_REVEAL_SECONDS, HUD_VISIBILITY_THRESHOLD};
use constants::render_settings::{DEFAULT_ACCENT_COLOUR, DEFAULT_ORBIT_RADIUS};
use serde::{Deserialize, Serialize};
use std::f32::consts::PI;
use thiserror::Error;

/// One figure in a section's HUD readout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HudEntry {
    pub label: String,
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
}

impl HudEntry {
    /// Text shown once the reveal has settled.
    pub fn final_text(&self) -> String {
        match &self.unit {
            Some(unit) => format!("{}{}", self.value, unit),
            None => self.value.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallToAction {
    pub text: String,
    pub href: String,
}

/// A content section and the camera pose it rests on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub index: usize,
    /// Orbit angle around the vertical axis (radians).
    pub azimuth: f32,
    /// Angle down from the vertical axis (radians).
    pub polar_angle: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radius: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub look_at_y: Option<f32>,
    #[serde(default)]
    pub hud_entries: Vec<HudEntry>,
    /// Hex colour such as `#d4a853`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accent_color: Option<String>,
    #[serde(default)]
    pub label: String,
    pub title: String,
    #[serde(default)]
    pub copy: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cta: Option<CallToAction>,
}

impl Section {
    pub fn radius_or_default(&self) -> f32 {
        self.radius.unwrap_or(DEFAULT_ORBIT_RADIUS)
    }

    pub fn look_at_y_or_default(&self) -> f32 {
        self.look_at_y.unwrap_or(0.0)
    }

    pub fn accent(&self) -> Color {
        self.accent_color
            .as_deref()
            .and_then(|hex| Srgba::hex(hex).ok())
            .map(Color::from)
            .unwrap_or(DEFAULT_ACCENT_COLOUR)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HudOptions {
    /// Fraction of an entry's box on screen that starts its reveal.
    pub visibility_threshold: f32,
    pub reveal_seconds: f32,
    /// With observation off, entries show their final value straight away.
    pub observe_visibility: bool,
}

impl Default for HudOptions {
    fn default() -> Self {
        Self {
            visibility_threshold: HUD_VISIBILITY_THRESHOLD,
            reveal_seconds: HUD_REVEAL_SECONDS,
            observe_visibility: true,
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("showcase config has no sections")]
    NoSections,

    #[error("section at position {position} declares index {index}")]
    IndexMismatch { position: usize, index: usize },

    #[error("section {index}: {field} is not finite")]
    NonFinite { index: usize, field: &'static str },

    #[error("section {index}: radius {radius} must be positive")]
    InvalidRadius { index: usize, radius: f32 },

    #[error("section {index}: accent colour {value:?} is not a hex colour")]
    InvalidAccent { index: usize, value: String },

    #[error("hud visibility threshold {0} is outside (0, 1]")]
    InvalidThreshold(f32),

    #[error("smooth_scroll.{field} = {value} is out of range")]
    InvalidSmoothScroll { field: &'static str, value: f32 },

    #[error("snap.{field} = {value} is out of range")]
    InvalidSnap { field: &'static str, value: f32 },

    #[error("snap duration_min {min} exceeds duration_max {max}")]
    SnapDurationOrder { min: f32, max: f32 },

    #[error("environment intensity {0} must be a non-negative number")]
    InvalidEnvironmentIntensity(f32),
}

/// Everything the showcase reads from `showcase/showcase.json`.
#[derive(Asset, TypePath, Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShowcaseConfig {
    pub sections: Vec<Section>,
    #[serde(default)]
    pub gpu_patterns: GpuPatternTable,
    #[serde(default)]
    pub smooth_scroll: SmoothScrollOptions,
    /// Snap timing; rest points are always the section boundaries.
    #[serde(default)]
    pub snap: SnapConfig,
    #[serde(default)]
    pub hud: HudOptions,
    #[serde(default)]
    pub environment: EnvironmentOptions,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub renderer_override: Option<String>,
}

impl ShowcaseConfig {
    /// Reject configurations the director and overlay cannot lay out.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sections.is_empty() {
            return Err(ConfigError::NoSections);
        }

        for (position, section) in self.sections.iter().enumerate() {
            if section.index != position {
                return Err(ConfigError::IndexMismatch {
                    position,
                    index: section.index,
                });
            }
            let index = section.index;
            for (field, value) in [
                ("azimuth", Some(section.azimuth)),
                ("polar_angle", Some(section.polar_angle)),
                ("radius", section.radius),
                ("look_at_y", section.look_at_y),
            ] {
                if value.is_some_and(|v| !v.is_finite()) {
                    return Err(ConfigError::NonFinite { index, field });
                }
            }
            if let Some(radius) = section.radius.filter(|r| *r <= 0.0) {
                return Err(ConfigError::InvalidRadius { index, radius });
            }
            if let Some(hex) = &section.accent_color {
                if Srgba::hex(hex).is_err() {
                    return Err(ConfigError::InvalidAccent {
                        index,
                        value: hex.clone(),
                    });
                }
            }
        }

        let threshold = self.hud.visibility_threshold;
        if !(threshold > 0.0 && threshold <= 1.0) {
            return Err(ConfigError::InvalidThreshold(threshold));
        }

        let intensity = self.environment.intensity;
        if !(intensity >= 0.0 && intensity.is_finite()) {
            return Err(ConfigError::InvalidEnvironmentIntensity(intensity));
        }

        self.validate_smooth_scroll()?;
        self.validate_snap()
    }

    fn validate_smooth_scroll(&self) -> Result<(), ConfigError> {
        let options = &self.smooth_scroll;
        let checks: [(&'static str, Option<f32>, fn(f32) -> bool); 4] = [
            ("lerp", options.lerp, |v| v > 0.0 && v <= 1.0),
            ("duration", Some(options.duration), |v| v > 0.0 && v.is_finite()),
            ("wheel_multiplier", Some(options.wheel_multiplier), |v| v.is_finite()),
            ("line_height", Some(options.line_height), |v| v > 0.0 && v.is_finite()),
        ];
        for (field, value, valid) in checks {
            if let Some(value) = value.filter(|v| !valid(*v)) {
                return Err(ConfigError::InvalidSmoothScroll { field, value });
            }
        }
        Ok(())
    }

    fn validate_snap(&self) -> Result<(), ConfigError> {
        let snap = &self.snap;
        let non_negative = |v: f32| v >= 0.0 && v.is_finite();
        for (field, value) in [
            ("duration_min", snap.duration_min),
            ("duration_max", snap.duration_max),
            ("delay", snap.delay),
            ("rest_velocity", snap.rest_velocity),
        ] {
            if !non_negative(value) {
                return Err(ConfigError::InvalidSnap { field, value });
            }
        }
        if !(snap.capture_window > 0.0) {
            return Err(ConfigError::InvalidSnap {
                field: "capture_window",
                value: snap.capture_window,
            });
        }
        if snap.duration_min > snap.duration_max {
            return Err(ConfigError::SnapDurationOrder {
                min: snap.duration_min,
                max: snap.duration_max,
            });
        }
        Ok(())
    }

    pub fn section_count(&self) -> usize {
        self.sections.len()
    }
}

impl Default for ShowcaseConfig {
    fn default() -> Self {
        Self {
            sections: default_sections(),
            gpu_patterns: GpuPatternTable::default(),
            smooth_scroll: SmoothScrollOptions::default(),
            snap: SnapConfig::default(),
            hud: HudOptions::default(),
            environment: EnvironmentOptions::default(),
            renderer_override: None,
        }
    }
}

fn entry(label: &str, value: &str, unit: Option<&str>) -> HudEntry {
    HudEntry {
        label: label.into(),
        value: value.into(),
        unit: unit.map(Into::into),
    }
}

fn default_sections() -> Vec<Section> {
    let section = |index: usize, azimuth: f32, polar_angle: f32, radius: f32, look_at_y: f32| Section {
        index,
        azimuth,
        polar_angle,
        radius: Some(radius),
        look_at_y: Some(look_at_y),
        hud_entries: Vec::new(),
        accent_color: None,
        label: String::new(),
        title: String::new(),
        copy: String::new(),
        cta: None,
    };

    vec![
        Section {
            label: "Introducing".into(),
            title: "Orbit One".into(),
            copy: "Placeholder description. Replace with your product copy.".into(),
            ..section(0, 0.0, PI / 2.3, 5.5, 0.2)
        },
        Section {
            label: "Feature One".into(),
            title: "Headline for\nfeature one".into(),
            copy: "Describe the first key feature or capability of your product.".into(),
            hud_entries: vec![
                entry("Weight", "1.2", Some("kg")),
                entry("Battery", "48", Some("h")),
            ],
            ..section(1, PI / 2.0, PI / 2.5, 4.5, 0.0)
        },
        Section {
            label: "Feature Two".into(),
            title: "Headline for\nfeature two".into(),
            copy: "Describe the second key feature. Focus on what makes it unique.".into(),
            hud_entries: vec![
                entry("Latency", "12", Some("ms")),
                entry("Range", "300", Some("m")),
            ],
            accent_color: Some("#6fc3df".into()),
            ..section(2, PI, PI / 3.0, 5.0, 0.3)
        },
        Section {
            label: "Feature Three".into(),
            title: "Headline for\nfeature three".into(),
            copy: "Describe the intelligence, technology, or craftsmanship behind the product."
                .into(),
            hud_entries: vec![
                entry("Cores", "8", None),
                entry("Model", "X-42", None),
            ],
            ..section(3, 3.0 * PI / 2.0, PI / 2.2, 4.8, 0.1)
        },
        Section {
            label: "Orbit".into(),
            title: "The future\nstarts here".into(),
            copy: "Closing statement. Tie the product back to the brand vision.".into(),
            cta: Some(CallToAction {
                text: "Learn more".into(),
                href: "#".into(),
            }),
            ..section(4, 2.0 * PI, PI / 2.3, 5.5, 0.2)
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = ShowcaseConfig::default();
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.section_count(), 5);
    }

    #[test]
    fn bundled_config_matches_the_schema() {
        let json = include_str!("../../../assets/showcase/showcase.json");
        let config: ShowcaseConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.section_count(), 5);
        assert_eq!(config.sections[4].cta.as_ref().unwrap().text, "Learn more");
        assert_eq!(config.environment, EnvironmentOptions::default());
    }

    #[test]
    fn missing_optional_fields_take_defaults() {
        let json = r#"{ "sections": [
            { "index": 0, "azimuth": 0.0, "polar_angle": 1.2, "title": "Only" }
        ] }"#;
        let config: ShowcaseConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.validate(), Ok(()));
        let section = &config.sections[0];
        assert_eq!(section.radius_or_default(), DEFAULT_ORBIT_RADIUS);
        assert_eq!(section.look_at_y_or_default(), 0.0);
        assert_eq!(section.accent(), DEFAULT_ACCENT_COLOUR);
        assert!(config.hud.observe_visibility);
        assert_eq!(config.gpu_patterns, GpuPatternTable::default());
    }

    #[test]
    fn validation_rejects_unusable_sections() {
        let mut config = ShowcaseConfig::default();
        config.sections.clear();
        assert_eq!(config.validate(), Err(ConfigError::NoSections));

        let mut config = ShowcaseConfig::default();
        config.sections[2].index = 7;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::IndexMismatch { position: 2, index: 7 })
        ));

        let mut config = ShowcaseConfig::default();
        config.sections[1].radius = Some(-1.0);
        assert!(matches!(config.validate(), Err(ConfigError::InvalidRadius { .. })));

        let mut config = ShowcaseConfig::default();
        config.sections[0].polar_angle = f32::NAN;
        assert!(matches!(config.validate(), Err(ConfigError::NonFinite { .. })));

        let mut config = ShowcaseConfig::default();
        config.sections[3].accent_color = Some("gold-ish".into());
        assert!(matches!(config.validate(), Err(ConfigError::InvalidAccent { .. })));

        let mut config = ShowcaseConfig::default();
        config.hud.visibility_threshold = 0.0;
        assert_eq!(config.validate(), Err(ConfigError::InvalidThreshold(0.0)));
    }

    #[test]
    fn validation_rejects_bad_scroll_timing() {
        let mut config = ShowcaseConfig::default();
        config.smooth_scroll.lerp = Some(0.0);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidSmoothScroll { field: "lerp", .. })
        ));

        let mut config = ShowcaseConfig::default();
        config.smooth_scroll.lerp = None;
        config.smooth_scroll.duration = 0.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidSmoothScroll { field: "duration", .. })
        ));

        let mut config = ShowcaseConfig::default();
        config.snap.delay = -0.1;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidSnap { field: "delay", .. })
        ));

        let mut config = ShowcaseConfig::default();
        config.snap.duration_min = 2.0;
        config.snap.duration_max = 0.5;
        assert_eq!(
            config.validate(),
            Err(ConfigError::SnapDurationOrder { min: 2.0, max: 0.5 })
        );
    }

    #[test]
    fn bad_snap_timing_in_json_is_rejected() {
        let json = r#"{
            "sections": [{ "index": 0, "azimuth": 0.0, "polar_angle": 1.2, "title": "Only" }],
            "snap": { "duration_min": 0.9, "duration_max": 0.3 }
        }"#;
        let config: ShowcaseConfig = serde_json::from_str(json).unwrap();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::SnapDurationOrder { .. })
        ));
    }

    #[test]
    fn final_text_appends_the_unit() {
        assert_eq!(entry("Weight", "1.2", Some("kg")).final_text(), "1.2kg");
        assert_eq!(entry("Cores", "8", None).final_text(), "8");
    }
}
