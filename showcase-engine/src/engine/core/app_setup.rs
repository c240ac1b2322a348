// Standard library and external crates
use bevy::asset::AssetMetaCheck;
use bevy::diagnostic::FrameTimeDiagnosticsPlugin;
use bevy::log::LogPlugin;
use bevy::prelude::*;
use bevy_common_assets::json::JsonAssetPlugin;

// Crate engine modules
use crate::engine::assets::showcase_config::ShowcaseConfig;
use crate::engine::camera::camera_rig::apply_orbit_target;
use crate::engine::camera::orbit_director::{ActiveSection, OrbitTarget, direct_orbit};
use crate::engine::core::app_state::{
    AppState, FpsText, FrameSet, configure_frame_sets, transition_to_running,
};
use crate::engine::core::window_config::create_window_config;
use crate::engine::device::DevicePlugin;
use crate::engine::hud::HudPlugin;
use crate::engine::loading::config_loader::{ConfigLoader, load_config_system, start_loading};
use crate::engine::loading::progress::LoadingProgress;
use crate::engine::overlay::OverlayPlugin;
use crate::engine::quality::QualityPlugin;
use crate::engine::scene::ScenePlugin;
use crate::engine::scroll::ScrollPlugin;
use crate::engine::systems::console_capture::console_capture_layer;
use crate::engine::systems::fps_tracking::{fps_notification_system, fps_text_update_system};
use crate::engine::systems::layout_audit::LayoutAuditPlugin;

// Web RPC
use crate::rpc::web_rpc::WebRpcPlugin;

pub fn create_app() -> App {
    let mut app = App::new();

    app.add_plugins(create_default_plugins())
        .init_state::<AppState>()
        .add_plugins(FrameTimeDiagnosticsPlugin::default())
        // Registers ShowcaseConfig as a loadable asset type from JSON files.
        .add_plugins(JsonAssetPlugin::<ShowcaseConfig>::new(&["json"]));

    configure_frame_sets(&mut app);

    // Initialise resources early
    app.init_resource::<LoadingProgress>()
        .init_resource::<ConfigLoader>()
        .init_resource::<OrbitTarget>()
        .init_resource::<ActiveSection>();

    app.add_plugins((
        DevicePlugin,
        ScrollPlugin,
        QualityPlugin,
        HudPlugin,
        OverlayPlugin,
        ScenePlugin,
        WebRpcPlugin,
        LayoutAuditPlugin,
    ));

    // State-based system scheduling
    app.add_systems(Startup, (setup, start_loading).chain())
        .add_systems(
            Update,
            (load_config_system, transition_to_running)
                .chain()
                .run_if(in_state(AppState::Loading)),
        )
        .add_systems(
            Update,
            direct_orbit
                .in_set(FrameSet::OrbitDirector)
                .run_if(in_state(AppState::Running)),
        )
        .add_systems(Update, apply_orbit_target.in_set(FrameSet::Render))
        .add_systems(
            Update,
            fps_notification_system.run_if(in_state(AppState::Running)),
        );

    // Add fps_text_update_system only for native builds.
    #[cfg(not(target_arch = "wasm32"))]
    {
        app.add_systems(Update, fps_text_update_system);
    }

    app
}

// Startup system that only handles basic initialisation
fn setup(mut commands: Commands) {
    #[cfg(not(target_arch = "wasm32"))]
    {
        create_native_overlays(&mut commands);
    }

    #[cfg(target_arch = "wasm32")]
    let _ = &mut commands;
}

#[cfg(not(target_arch = "wasm32"))]
fn create_native_overlays(commands: &mut Commands) {
    commands.spawn((
        Text::new("FPS: "),
        TextFont {
            font_size: 14.0,
            ..default()
        },
        TextColor(Color::srgba(1.0, 1.0, 1.0, 0.4)),
        Node {
            position_type: PositionType::Absolute,
            bottom: Val::Px(12.0),
            right: Val::Px(12.0),
            ..default()
        },
        GlobalZIndex(i32::MAX - 1),
        FpsText,
    ));
}

fn create_default_plugins() -> impl PluginGroup {
    let window_config = WindowPlugin {
        primary_window: Some(create_window_config()),
        ..default()
    };

    let asset_config = AssetPlugin {
        meta_check: AssetMetaCheck::Never,
        ..default()
    };

    // Warnings and errors are also copied into the layout audit's console log.
    let log_config = LogPlugin {
        custom_layer: console_capture_layer,
        ..default()
    };

    DefaultPlugins
        .set(window_config)
        .set(asset_config)
        .set(log_config)
}
