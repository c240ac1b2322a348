use super::probe::ProbeError;
use super::tier::DeviceTier;
use bevy::prelude::*;
use constants::device::{
    COMPACT_DESKTOP_HEIGHT, COMPACT_DESKTOP_WIDTH, DEFAULT_MID_GPU_PATTERNS,
    DEFAULT_WEAK_GPU_PATTERNS, MOBILE_MAX_WIDTH,
};
use serde::{Deserialize, Serialize};

/// Logical viewport size in pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ViewportSize {
    pub width: f32,
    pub height: f32,
}

impl ViewportSize {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Minimised windows report zero sizes; those are not worth classifying.
    pub fn is_degenerate(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }
}

/// Renderer substrings mapped to the low and medium tiers.
/// Heuristic data that drifts with hardware, so it ships in the showcase
/// config and only falls back to the built-in lists.
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GpuPatternTable {
    pub weak: Vec<String>,
    pub mid: Vec<String>,
}

impl Default for GpuPatternTable {
    fn default() -> Self {
        Self {
            weak: DEFAULT_WEAK_GPU_PATTERNS.iter().map(|p| p.to_string()).collect(),
            mid: DEFAULT_MID_GPU_PATTERNS.iter().map(|p| p.to_string()).collect(),
        }
    }
}

impl GpuPatternTable {
    /// First weak-GPU pattern contained in `renderer`, case-insensitively.
    pub fn match_weak(&self, renderer: &str) -> Option<&str> {
        find_pattern(&self.weak, renderer)
    }

    /// First mid-tier pattern contained in `renderer`, case-insensitively.
    pub fn match_mid(&self, renderer: &str) -> Option<&str> {
        find_pattern(&self.mid, renderer)
    }
}

fn find_pattern<'a>(patterns: &'a [String], renderer: &str) -> Option<&'a str> {
    let renderer = renderer.to_lowercase();
    patterns
        .iter()
        .filter(|p| !p.is_empty())
        .find(|p| renderer.contains(&p.to_lowercase()))
        .map(String::as_str)
}

/// Why a tier was chosen, for logs and the RPC surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum TierReason {
    NarrowViewport,
    WeakGpu { pattern: String },
    ProbeUnavailable,
    CompactViewport,
    MidGpu { pattern: String },
    Capable,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    pub tier: DeviceTier,
    pub reason: TierReason,
}

impl Classification {
    fn new(tier: DeviceTier, reason: TierReason) -> Self {
        Self { tier, reason }
    }
}

/// Classify a device from its viewport and probed renderer string.
///
/// A failed query counts as "no pattern matched" and falls through to the
/// size checks. A probe context that could not be created at all caps the
/// tier at medium, since nothing is known about the hardware.
pub fn classify(
    viewport: ViewportSize,
    renderer: &Result<String, ProbeError>,
    patterns: &GpuPatternTable,
) -> Classification {
    // NaN widths fail this comparison and land on low as well.
    if !(viewport.width >= MOBILE_MAX_WIDTH) {
        return Classification::new(DeviceTier::Low, TierReason::NarrowViewport);
    }

    let renderer = match renderer {
        Ok(renderer) => Some(renderer.as_str()),
        Err(ProbeError::QueryFailed(_)) => None,
        Err(ProbeError::ContextUnavailable) => {
            return Classification::new(DeviceTier::Medium, TierReason::ProbeUnavailable);
        }
    };

    if let Some(pattern) = renderer.and_then(|r| patterns.match_weak(r)) {
        return Classification::new(
            DeviceTier::Low,
            TierReason::WeakGpu {
                pattern: pattern.to_string(),
            },
        );
    }

    if viewport.width < COMPACT_DESKTOP_WIDTH || viewport.height < COMPACT_DESKTOP_HEIGHT {
        return Classification::new(DeviceTier::Medium, TierReason::CompactViewport);
    }

    if let Some(pattern) = renderer.and_then(|r| patterns.match_mid(r)) {
        return Classification::new(
            DeviceTier::Medium,
            TierReason::MidGpu {
                pattern: pattern.to_string(),
            },
        );
    }

    Classification::new(DeviceTier::High, TierReason::Capable)
}
