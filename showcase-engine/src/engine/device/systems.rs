use super::classifier::{GpuPatternTable, TierReason, ViewportSize, classify};
use super::probe::{FixedRendererProbe, ProbeError, read_renderer};
use super::tier::DeviceTier;
use bevy::prelude::*;
use bevy::render::renderer::RenderAdapterInfo;
use bevy::window::{PrimaryWindow, WindowResized};

#[cfg(not(target_arch = "wasm32"))]
use super::probe::AdapterProbe;
#[cfg(target_arch = "wasm32")]
use super::probe::WebGlProbe;

/// Latest classification. Replaced wholesale on every re-evaluation.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct DeviceClassification {
    pub tier: DeviceTier,
    pub reason: TierReason,
    pub viewport: ViewportSize,
    pub renderer: Option<String>,
}

impl Default for DeviceClassification {
    fn default() -> Self {
        Self {
            tier: DeviceTier::Medium,
            reason: TierReason::ProbeUnavailable,
            viewport: ViewportSize::default(),
            renderer: None,
        }
    }
}

/// Renderer string that replaces the probe, from config, environment or RPC.
#[derive(Resource, Debug, Clone, Default, PartialEq)]
pub struct RendererOverride(pub Option<String>);

/// Classify on first run, then again whenever the window is resized or the
/// renderer override changes. Resize events within one frame are coalesced.
pub fn update_device_classification(
    mut resize_events: EventReader<WindowResized>,
    windows: Query<&Window, With<PrimaryWindow>>,
    renderer_override: Res<RendererOverride>,
    patterns: Res<GpuPatternTable>,
    adapter: Option<Res<RenderAdapterInfo>>,
    mut classification: ResMut<DeviceClassification>,
    mut initialised: Local<bool>,
) {
    let resized = resize_events.read().count() > 0;
    let inputs_changed = renderer_override.is_changed() || patterns.is_changed();
    if *initialised && !resized && !inputs_changed {
        return;
    }

    let Ok(window) = windows.single() else {
        return;
    };
    let viewport = ViewportSize::new(window.width(), window.height());
    if viewport.is_degenerate() {
        return;
    }
    *initialised = true;

    let renderer = probe_renderer(&renderer_override, adapter.as_deref());
    let next = reclassify(viewport, renderer, &patterns);

    let previous_tier = classification.tier;
    if classification.set_if_neq(next) {
        info!(
            "Device tier: {} -> {} ({:?}, {}x{})",
            previous_tier.as_str(),
            classification.tier.as_str(),
            classification.reason,
            viewport.width,
            viewport.height
        );
    }
}

/// Fresh classification record; nothing from the previous pass is carried over.
pub fn reclassify(
    viewport: ViewportSize,
    renderer: Result<String, ProbeError>,
    patterns: &GpuPatternTable,
) -> DeviceClassification {
    let result = classify(viewport, &renderer, patterns);
    DeviceClassification {
        tier: result.tier,
        reason: result.reason,
        viewport,
        renderer: renderer.ok(),
    }
}

fn probe_renderer(
    renderer_override: &RendererOverride,
    adapter: Option<&RenderAdapterInfo>,
) -> Result<String, ProbeError> {
    if let Some(renderer) = &renderer_override.0 {
        return read_renderer(&mut FixedRendererProbe::new(renderer.clone()));
    }

    #[cfg(target_arch = "wasm32")]
    {
        let _ = adapter;
        read_renderer(&mut WebGlProbe::default())
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        read_renderer(&mut AdapterProbe::new(adapter))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::window::WindowResolution;

    fn app_with_window(width: f32, height: f32) -> (App, Entity) {
        let mut app = App::new();
        app.add_event::<WindowResized>()
            .init_resource::<RendererOverride>()
            .init_resource::<GpuPatternTable>()
            .init_resource::<DeviceClassification>()
            .add_systems(Update, update_device_classification);
        let window = app
            .world_mut()
            .spawn((
                Window {
                    resolution: WindowResolution::new(width, height),
                    ..default()
                },
                PrimaryWindow,
            ))
            .id();
        (app, window)
    }

    #[test]
    fn mobile_renderer_override_classifies_low() {
        let (mut app, _) = app_with_window(1280.0, 800.0);
        app.insert_resource(RendererOverride(Some("Mali-G78 MP14".into())));
        app.update();

        let classification = app.world().resource::<DeviceClassification>();
        assert_eq!(classification.tier, DeviceTier::Low);
        assert_eq!(classification.renderer.as_deref(), Some("Mali-G78 MP14"));
    }

    #[test]
    fn resize_triggers_a_fresh_classification() {
        let (mut app, window) = app_with_window(1920.0, 1080.0);
        app.insert_resource(RendererOverride(Some("NVIDIA GeForce RTX 3080".into())));
        app.update();
        assert_eq!(
            app.world().resource::<DeviceClassification>().tier,
            DeviceTier::High
        );

        app.world_mut()
            .entity_mut(window)
            .get_mut::<Window>()
            .unwrap()
            .resolution
            .set(600.0, 900.0);
        app.world_mut().send_event(WindowResized {
            window,
            width: 600.0,
            height: 900.0,
        });
        app.update();
        assert_eq!(
            app.world().resource::<DeviceClassification>().tier,
            DeviceTier::Low
        );

        app.world_mut()
            .entity_mut(window)
            .get_mut::<Window>()
            .unwrap()
            .resolution
            .set(1920.0, 1080.0);
        app.world_mut().send_event(WindowResized {
            window,
            width: 1920.0,
            height: 1080.0,
        });
        app.update();
        assert_eq!(
            app.world().resource::<DeviceClassification>().tier,
            DeviceTier::High
        );
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn missing_adapter_defaults_to_medium() {
        let (mut app, _) = app_with_window(2560.0, 1440.0);
        app.update();

        let classification = app.world().resource::<DeviceClassification>();
        assert_eq!(classification.tier, DeviceTier::Medium);
        assert_eq!(classification.reason, TierReason::ProbeUnavailable);
    }
}
