//! Device capability classification.
//!
//! Assigns a discrete quality tier from the viewport size and a best-effort
//! GPU renderer string. Classification is a pure function of its inputs and is
//! recomputed from scratch on every viewport resize, so a tier never sticks
//! after the window moves to different hardware or changes orientation.
//!
//! ```text
//! width < 768 ──────────────┐
//! weak GPU pattern ─────────┴─> Low
//! probe context missing ────┐
//! compact viewport ─────────┤
//! mid-tier GPU pattern ─────┴─> Medium
//! otherwise ──────────────────> High
//! ```

/// Tier decision from viewport size and renderer string.
pub mod classifier;

/// Throwaway renderer probes (adapter info natively, WebGL on the web).
pub mod probe;

/// Startup and resize-driven classification systems.
pub mod systems;

/// Discrete capability tier.
pub mod tier;

use crate::engine::core::app_state::FrameSet;
use bevy::prelude::*;
use bevy::window::WindowResized;
use classifier::GpuPatternTable;
use systems::{DeviceClassification, RendererOverride, update_device_classification};

pub struct DevicePlugin;

impl Plugin for DevicePlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<WindowResized>()
            .init_resource::<GpuPatternTable>()
            .init_resource::<RendererOverride>()
            .init_resource::<DeviceClassification>()
            .add_systems(
                Update,
                update_device_classification.before(FrameSet::QualityGate),
            );
    }
}
