//! Per-section HUD readouts.
//!
//! Each entry is a `HudCounter` on a UI text node. Visibility is measured
//! after UI layout and reported as events; the counters consume them on the
//! following frame, so layout never mutates state read earlier in a frame.

/// `Idle → Revealing → Settled` state machine and scramble.
pub mod counter;

/// Intersection ratio and the post-layout observation system.
pub mod visibility;

/// Visibility application and per-frame scramble ticking.
pub mod systems;

use crate::engine::core::app_state::FrameSet;
use bevy::prelude::*;
use bevy::ui::UiSystem;
use systems::{HudRng, apply_hud_visibility, tick_hud_counters};
use visibility::{HudVisibility, observe_hud_visibility};

pub struct HudPlugin;

impl Plugin for HudPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<HudVisibility>()
            .init_resource::<HudRng>()
            .add_systems(
                Update,
                (apply_hud_visibility, tick_hud_counters)
                    .chain()
                    .in_set(FrameSet::Render),
            )
            .add_systems(PostUpdate, observe_hud_visibility.after(UiSystem::Layout));
    }
}
