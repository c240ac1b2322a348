use crate::engine::core::app_state::FpsText;
use crate::engine::device::systems::DeviceClassification;
use crate::rpc::web_rpc::WebRpcInterface;
use bevy::diagnostic::{DiagnosticsStore, FrameTimeDiagnosticsPlugin};
use bevy::prelude::*;

const FPS_NOTIFY_INTERVAL: f32 = 0.5;

pub fn smoothed_fps(diagnostics: &DiagnosticsStore) -> Option<f64> {
    diagnostics
        .get(&FrameTimeDiagnosticsPlugin::FPS)
        .and_then(|fps| fps.smoothed())
}

pub fn fps_notification_system(
    mut rpc_interface: ResMut<WebRpcInterface>,
    diagnostics: Res<DiagnosticsStore>,
    classification: Res<DeviceClassification>,
    mut last_send_time: Local<f32>,
    time: Res<Time>,
) {
    let current_time = time.elapsed_secs();
    if current_time - *last_send_time < FPS_NOTIFY_INTERVAL {
        return;
    }
    let Some(fps) = smoothed_fps(&diagnostics) else {
        return;
    };

    // The tier rides along so the host can correlate frame rate with quality.
    rpc_interface.send_notification(
        "fps_update",
        serde_json::json!({
            "fps": fps as f32,
            "tier": classification.tier,
        }),
    );
    *last_send_time = current_time;
}

pub fn fps_text_update_system(
    diagnostics: Res<DiagnosticsStore>,
    classification: Res<DeviceClassification>,
    mut query: Query<&mut Text, With<FpsText>>,
) {
    let Some(fps) = smoothed_fps(&diagnostics) else {
        return;
    };
    for mut text in &mut query {
        text.0 = format!("FPS: {fps:.1} ({})", classification.tier.as_str());
    }
}
