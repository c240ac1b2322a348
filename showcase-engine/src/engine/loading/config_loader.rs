use crate::engine::assets::showcase_config::ShowcaseConfig;
use crate::engine::camera::orbit_director::CameraTimeline;
use crate::engine::device::classifier::GpuPatternTable;
use crate::engine::device::systems::RendererOverride;
use crate::engine::loading::progress::LoadingProgress;
use crate::engine::overlay::sections::SectionTriggers;
use crate::engine::scroll::smooth_scroll::SmoothScroll;
use crate::engine::scroll::trigger::{ScrollLayout, ScrollTriggerEngine, SnapConfig, TriggerAnchor};
use bevy::asset::LoadState;
use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use constants::scroll::{CAMERA_SCRUB_SECONDS, SECTION_SCRUB_SECONDS};

pub const CONFIG_PATH: &str = "showcase/showcase.json";

/// Environment variable overriding the renderer string on native builds.
pub const RENDERER_ENV: &str = "SHOWCASE_RENDERER";

#[derive(Resource, Default)]
pub struct ConfigLoader {
    handle: Option<Handle<ShowcaseConfig>>,
}

/// Scroll emulator and trigger timelines derived from a configuration.
pub struct ScrollRuntime {
    pub smooth: SmoothScroll,
    pub triggers: ScrollTriggerEngine,
    pub camera_timeline: CameraTimeline,
    pub section_triggers: SectionTriggers,
}

// Start the loading process
pub fn start_loading(
    mut loader: ResMut<ConfigLoader>,
    mut progress: ResMut<LoadingProgress>,
    asset_server: Res<AssetServer>,
) {
    loader.handle = Some(asset_server.load(CONFIG_PATH));
    progress.config_requested = true;
}

/// Keep a loaded configuration when it validates, otherwise the built-in one.
pub fn accept_config(candidate: Option<ShowcaseConfig>) -> ShowcaseConfig {
    match candidate {
        Some(config) => match config.validate() {
            Ok(()) => config,
            Err(err) => {
                warn!("Invalid showcase config ({err}), using the built-in default");
                ShowcaseConfig::default()
            }
        },
        None => ShowcaseConfig::default(),
    }
}

/// Environment override wins over the configured renderer string.
pub fn resolve_renderer_override(
    configured: Option<&str>,
    environment: Option<String>,
) -> Option<String> {
    environment
        .filter(|renderer| !renderer.trim().is_empty())
        .or_else(|| configured.map(str::to_owned))
}

/// Camera timeline over the whole document, snapping to section boundaries,
/// plus one trigger per section for the overlay copy.
pub fn build_scroll_runtime(config: &ShowcaseConfig, layout: ScrollLayout) -> ScrollRuntime {
    let mut smooth = SmoothScroll::new(config.smooth_scroll);
    smooth.set_limit(layout.scroll_limit());

    let mut triggers = ScrollTriggerEngine::default();
    triggers.refresh(layout);

    let n = config.section_count();
    let camera_timeline = CameraTimeline(triggers.create(
        TriggerAnchor::Document,
        Some(CAMERA_SCRUB_SECONDS),
        Some(SnapConfig::sections(n).with_timing(&config.snap)),
    ));
    let section_triggers = SectionTriggers(
        (0..n)
            .map(|index| {
                triggers.create(
                    TriggerAnchor::Section(index),
                    Some(SECTION_SCRUB_SECONDS),
                    None,
                )
            })
            .collect(),
    );

    ScrollRuntime {
        smooth,
        triggers,
        camera_timeline,
        section_triggers,
    }
}

pub fn load_config_system(
    mut commands: Commands,
    mut progress: ResMut<LoadingProgress>,
    loader: Res<ConfigLoader>,
    asset_server: Res<AssetServer>,
    configs: Res<Assets<ShowcaseConfig>>,
    windows: Query<&Window, With<PrimaryWindow>>,
) {
    if progress.config_loaded {
        return;
    }
    let Some(handle) = &loader.handle else {
        return;
    };

    let candidate = match asset_server.load_state(handle) {
        LoadState::Loaded => configs.get(handle).cloned(),
        LoadState::Failed(err) => {
            warn!("Failed to load {CONFIG_PATH}: {err}");
            None
        }
        _ => return,
    };
    let config = accept_config(candidate);
    info!("✓ Showcase config loaded: {} sections", config.section_count());

    let environment = if cfg!(target_arch = "wasm32") {
        None
    } else {
        std::env::var(RENDERER_ENV).ok()
    };
    let renderer = resolve_renderer_override(config.renderer_override.as_deref(), environment);
    if let Some(renderer) = &renderer {
        info!("Renderer override: {renderer}");
    }

    let viewport_height = windows
        .single()
        .map(|window| window.height())
        .unwrap_or_default();
    let runtime = build_scroll_runtime(&config, ScrollLayout::new(viewport_height, config.section_count()));
    info!(
        "Scroll runtime: {} triggers over {:.0}px",
        runtime.triggers.trigger_count(),
        runtime.smooth.limit()
    );

    commands.insert_resource(RendererOverride(renderer));
    commands.insert_resource(config.gpu_patterns.clone());
    commands.insert_resource(runtime.smooth);
    commands.insert_resource(runtime.triggers);
    commands.insert_resource(runtime.camera_timeline);
    commands.insert_resource(runtime.section_triggers);
    commands.insert_resource(config);

    progress.config_loaded = true;
    progress.scroll_runtime_ready = true;
}
