//! HTML-style document layered over the 3D canvas.
//!
//! Sections scroll with the smoothed offset and fade with their own trigger
//! regions. The transition mask covers the canvas with a loading bar until
//! the showcase is running, then fades out and removes itself. A vignette
//! sits between the canvas and the document on every tier.

pub mod sections;
pub mod transition;
pub mod vignette;

use crate::engine::assets::showcase_config::ShowcaseConfig;
use crate::engine::core::app_state::{AppState, FrameSet};
use bevy::prelude::*;
use sections::{SectionTriggers, fade_section_copy, scroll_document_overlay, spawn_document_overlay};
use transition::{
    LoadingBar, fade_transition_overlay, mark_transition_ready, spawn_transition_overlay,
    update_loading_bar,
};
use vignette::spawn_vignette;

pub struct OverlayPlugin;

impl Plugin for OverlayPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SectionTriggers>()
            .add_systems(Startup, (spawn_vignette, spawn_transition_overlay))
            .add_systems(
                OnEnter(AppState::Running),
                (build_document_overlay, mark_transition_ready),
            )
            .add_systems(
                Update,
                (scroll_document_overlay, fade_section_copy)
                    .chain()
                    .in_set(FrameSet::Render),
            )
            .add_systems(
                Update,
                (
                    update_loading_bar.run_if(resource_exists::<LoadingBar>),
                    fade_transition_overlay,
                ),
            );
    }
}

fn build_document_overlay(mut commands: Commands, config: Res<ShowcaseConfig>) {
    spawn_document_overlay(&mut commands, &config);
    info!("Document overlay: {} sections", config.section_count());
}
