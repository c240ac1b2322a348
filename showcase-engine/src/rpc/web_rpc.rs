use crate::engine::camera::orbit_director::{ActiveSection, OrbitTarget};
use crate::engine::core::app_state::FrameSet;
use crate::engine::device::systems::{DeviceClassification, RendererOverride};
use crate::engine::device::tier::DeviceTier;
use crate::engine::quality::profile::QualityProfile;
use crate::engine::scroll::signal::ScrollSignalPublisher;
use crate::engine::systems::fps_tracking::smoothed_fps;
use crate::engine::systems::layout_audit::StartLayoutAudit;
use bevy::diagnostic::DiagnosticsStore;
use bevy::ecs::system::SystemParam;
use bevy::prelude::*;
use serde::{Deserialize, Serialize};

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::JsValue;

#[cfg(target_arch = "wasm32")]
use web_sys::{MessageEvent, window};

/// JSON-RPC 2.0 request structure.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RpcRequest {
    pub jsonrpc: String,
    pub method: String,
    pub params: serde_json::Value,
    pub id: Option<serde_json::Value>,
}

/// JSON-RPC 2.0 response structure.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RpcResponse {
    pub jsonrpc: String,
    pub result: Option<serde_json::Value>,
    pub error: Option<RpcError>,
    pub id: Option<serde_json::Value>,
}

/// JSON-RPC 2.0 notification structure for one-way communication.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RpcNotification {
    pub jsonrpc: String,
    pub method: String,
    pub params: serde_json::Value,
}

/// JSON-RPC 2.0 error object.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RpcError {
    pub code: i32,
    pub message: String,
    pub data: Option<serde_json::Value>,
}

/// Resource managing bidirectional RPC communication with the host page.
/// Handles both request-response patterns and notification broadcasting.
#[derive(Resource, Default)]
pub struct WebRpcInterface {
    outgoing_notifications: Vec<RpcNotification>,
    outgoing_responses: Vec<RpcResponse>,
}

impl WebRpcInterface {
    /// Send notification to the host page without expecting a response.
    pub fn send_notification(&mut self, method: &str, params: serde_json::Value) {
        self.outgoing_notifications.push(RpcNotification {
            jsonrpc: "2.0".to_string(),
            method: method.to_string(),
            params,
        });
    }

    /// Queue response for transmission to the host page.
    fn queue_response(&mut self, response: RpcResponse) {
        self.outgoing_responses.push(response);
    }
}

/// Plugin establishing WebRPC communication layer for iframe-based deployment.
pub struct WebRpcPlugin;

impl Plugin for WebRpcPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<WebRpcInterface>()
            .add_event::<IncomingRpcMessage>()
            .add_systems(
                Update,
                (
                    process_incoming_messages,
                    handle_rpc_messages,
                    notify_showcase_changes,
                    send_outgoing_messages,
                )
                    .chain()
                    .after(FrameSet::Render),
            );

        #[cfg(target_arch = "wasm32")]
        app.add_systems(Startup, setup_message_listener);
    }
}

#[cfg(target_arch = "wasm32")]
fn setup_message_listener(mut commands: Commands) {
    use std::sync::Arc;
    use std::sync::Mutex;

    // Thread-safe message queue for cross-thread communication.
    let message_queue: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
    let queue_clone = message_queue.clone();

    let closure = Closure::wrap(Box::new(move |event: MessageEvent| {
        // Filter messages to ensure they contain string data.
        if let Ok(data) = event.data().dyn_into::<js_sys::JsString>() {
            let message_str: String = data.into();

            // Attempt JSON parsing to validate RPC format before queuing.
            if message_str.contains("jsonrpc") {
                if let Ok(mut queue) = queue_clone.lock() {
                    queue.push(message_str);
                }
            }
        }
    }) as Box<dyn FnMut(MessageEvent)>);

    match window() {
        Some(window) => {
            if let Err(e) = window
                .add_event_listener_with_callback("message", closure.as_ref().unchecked_ref())
            {
                error!("Failed to register message listener: {:?}", e);
            }
        }
        None => warn!("No window available, RPC messages will not be received"),
    }

    // Prevent closure from being dropped by transferring ownership to JS.
    closure.forget();
    commands.insert_resource(MessageQueue(message_queue));
}

/// Resource wrapping thread-safe message queue for WASM event handling.
#[derive(Resource)]
struct MessageQueue(std::sync::Arc<std::sync::Mutex<Vec<String>>>);

/// Event representing incoming RPC message from the host page.
#[derive(Event)]
struct IncomingRpcMessage {
    content: String,
}

fn process_incoming_messages(
    message_queue: Option<Res<MessageQueue>>,
    mut message_events: EventWriter<IncomingRpcMessage>,
) {
    let Some(queue_res) = message_queue else {
        return;
    };

    let messages = if let Ok(mut queue) = queue_res.0.lock() {
        std::mem::take(&mut *queue)
    } else {
        Vec::new()
    };

    // Write events using the non-deprecated method.
    for message_str in messages {
        message_events.write(IncomingRpcMessage {
            content: message_str,
        });
    }
}

/// Everything the RPC methods read or change.
#[derive(SystemParam)]
pub struct RpcContext<'w> {
    diagnostics: Res<'w, DiagnosticsStore>,
    classification: Res<'w, DeviceClassification>,
    profile: Res<'w, QualityProfile>,
    publisher: Res<'w, ScrollSignalPublisher>,
    orbit: Res<'w, OrbitTarget>,
    renderer_override: ResMut<'w, RendererOverride>,
    audit_requests: EventWriter<'w, StartLayoutAudit>,
}

fn handle_rpc_messages(
    mut events: EventReader<IncomingRpcMessage>,
    mut context: RpcContext,
    mut rpc_interface: ResMut<WebRpcInterface>,
) {
    for event in events.read() {
        match serde_json::from_str::<RpcRequest>(&event.content) {
            Ok(request) => {
                debug!("Processing RPC method: {}", request.method);
                if let Some(response) = handle_rpc_request(&request, &mut context) {
                    rpc_interface.queue_response(response);
                }
            }
            Err(parse_error) => {
                warn!("Discarding malformed RPC message: {parse_error}");
                rpc_interface.send_notification(
                    "debug_message",
                    serde_json::json!({
                        "message": format!("Parse error: {}", parse_error)
                    }),
                );
            }
        }
    }
}

/// Handle individual RPC request and generate response based on method.
fn handle_rpc_request(request: &RpcRequest, context: &mut RpcContext) -> Option<RpcResponse> {
    // Only generate responses for requests with IDs (notifications have no ID).
    let id = request.id.clone()?;

    let result = match request.method.as_str() {
        "get_fps" => handle_get_fps(&context.diagnostics),
        "get_device_tier" => handle_get_device_tier(&context.classification),
        "get_quality_profile" => to_result(&*context.profile),
        "get_scroll_signal" => to_result(&context.publisher.latest()),
        "get_orbit_target" => to_result(&*context.orbit),
        "set_renderer_override" => {
            handle_set_renderer_override(&request.params, &mut context.renderer_override)
        }
        "start_layout_audit" => {
            context.audit_requests.write(StartLayoutAudit);
            Ok(serde_json::json!({ "success": true }))
        }
        _ => {
            warn!("Unknown RPC method: {}", request.method);
            return Some(create_error_response(
                id,
                -32601,
                "Method not found",
                Some(serde_json::json!({"method": request.method})),
            ));
        }
    };

    match result {
        Ok(result_value) => Some(RpcResponse {
            jsonrpc: "2.0".to_string(),
            result: Some(result_value),
            error: None,
            id: Some(id),
        }),
        Err(error) => Some(RpcResponse {
            jsonrpc: "2.0".to_string(),
            result: None,
            error: Some(error),
            id: Some(id),
        }),
    }
}

fn to_result<T: Serialize>(value: &T) -> Result<serde_json::Value, RpcError> {
    serde_json::to_value(value).map_err(|e| RpcError::internal_error(&e.to_string()))
}

/// Handle FPS retrieval with diagnostic system integration.
fn handle_get_fps(diagnostics: &DiagnosticsStore) -> Result<serde_json::Value, RpcError> {
    let fps = smoothed_fps(diagnostics).unwrap_or(0.0) as f32;

    Ok(serde_json::json!({
        "fps": fps
    }))
}

fn handle_get_device_tier(
    classification: &DeviceClassification,
) -> Result<serde_json::Value, RpcError> {
    Ok(serde_json::json!({
        "tier": classification.tier,
        "reason": classification.reason,
        "viewport": classification.viewport,
        "renderer": classification.renderer,
    }))
}

/// Replace the probed renderer string; an absent or null renderer restores probing.
fn handle_set_renderer_override(
    params: &serde_json::Value,
    renderer_override: &mut RendererOverride,
) -> Result<serde_json::Value, RpcError> {
    #[derive(serde::Deserialize)]
    struct RendererParams {
        renderer: Option<String>,
    }

    let parsed = serde_json::from_value::<RendererParams>(params.clone())
        .map_err(|_| RpcError::invalid_params("Expected 'renderer' parameter"))?;
    let renderer = parsed.renderer.filter(|r| !r.trim().is_empty());

    info!("Renderer override via RPC: {:?}", renderer);
    renderer_override.0 = renderer.clone();

    Ok(serde_json::json!({
        "success": true,
        "renderer": renderer
    }))
}

/// Push tier, quality and section changes to the host page.
pub fn notify_showcase_changes(
    mut rpc_interface: ResMut<WebRpcInterface>,
    classification: Res<DeviceClassification>,
    profile: Res<QualityProfile>,
    active: Res<ActiveSection>,
    mut last_tier: Local<Option<DeviceTier>>,
) {
    if *last_tier != Some(classification.tier) {
        *last_tier = Some(classification.tier);
        rpc_interface.send_notification(
            "tier_changed",
            serde_json::json!({
                "tier": classification.tier,
                "reason": classification.reason,
            }),
        );
    }

    if profile.is_changed() {
        if let Ok(value) = serde_json::to_value(*profile) {
            rpc_interface.send_notification("quality_changed", value);
        }
    }

    if active.is_changed() {
        rpc_interface.send_notification("section_changed", serde_json::json!({ "index": active.0 }));
    }
}

/// Create standardized error response with optional data payload.
fn create_error_response(
    id: serde_json::Value,
    code: i32,
    message: &str,
    data: Option<serde_json::Value>,
) -> RpcResponse {
    RpcResponse {
        jsonrpc: "2.0".to_string(),
        result: None,
        error: Some(RpcError {
            code,
            message: message.to_string(),
            data,
        }),
        id: Some(id),
    }
}

/// Send queued notifications and responses to the host page.
fn send_outgoing_messages(mut rpc_interface: ResMut<WebRpcInterface>) {
    // Send notifications first.
    for notification in rpc_interface.outgoing_notifications.drain(..) {
        send_message_to_parent(&notification);
    }

    // Send responses second to maintain order.
    for response in rpc_interface.outgoing_responses.drain(..) {
        send_message_to_parent(&response);
    }
}

/// Send serialized message to the parent window.
fn send_message_to_parent<T: Serialize>(message: &T) {
    #[cfg(target_arch = "wasm32")]
    {
        match serde_json::to_string(message) {
            Ok(json) => {
                if let Some(window) = window() {
                    if let Some(parent) = window.parent().ok().flatten() {
                        if let Err(e) = parent.post_message(&JsValue::from_str(&json), "*") {
                            error!("Failed to send message to parent: {:?}", e);
                        }
                    } else {
                        warn!("No parent window available for message transmission");
                    }
                } else {
                    error!("Window object not available");
                }
            }
            Err(e) => {
                error!("Failed to serialize message: {}", e);
            }
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        // No-op for non-WASM targets.
        let _ = message;
    }
}

/// Standard RPC error codes and constructors.
impl RpcError {
    pub fn invalid_params(message: &str) -> Self {
        Self {
            code: -32602,
            message: message.to_string(),
            data: None,
        }
    }

    pub fn internal_error(message: &str) -> Self {
        Self {
            code: -32603,
            message: message.to_string(),
            data: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::device::tier::DeviceTier;

    fn app() -> App {
        let mut app = App::new();
        app.init_resource::<WebRpcInterface>()
            .init_resource::<DiagnosticsStore>()
            .init_resource::<DeviceClassification>()
            .init_resource::<QualityProfile>()
            .init_resource::<ScrollSignalPublisher>()
            .init_resource::<OrbitTarget>()
            .init_resource::<RendererOverride>()
            .add_event::<StartLayoutAudit>()
            .add_event::<IncomingRpcMessage>()
            .add_systems(Update, handle_rpc_messages);
        app
    }

    fn call(app: &mut App, message: serde_json::Value) -> RpcResponse {
        app.world_mut().send_event(IncomingRpcMessage {
            content: message.to_string(),
        });
        app.update();
        app.world_mut()
            .resource_mut::<WebRpcInterface>()
            .outgoing_responses
            .pop()
            .unwrap()
    }

    #[test]
    fn device_tier_is_reported() {
        let mut app = app();
        let response = call(
            &mut app,
            serde_json::json!({"jsonrpc": "2.0", "method": "get_device_tier", "params": {}, "id": 1}),
        );
        let result = response.result.unwrap();
        assert_eq!(result["tier"], serde_json::json!(DeviceTier::Medium));
        assert_eq!(response.id, Some(serde_json::json!(1)));
    }

    #[test]
    fn renderer_override_is_applied() {
        let mut app = app();
        let response = call(
            &mut app,
            serde_json::json!({
                "jsonrpc": "2.0",
                "method": "set_renderer_override",
                "params": {"renderer": "Mali-G52"},
                "id": 2
            }),
        );
        assert!(response.error.is_none());
        assert_eq!(
            app.world().resource::<RendererOverride>().0.as_deref(),
            Some("Mali-G52")
        );

        let response = call(
            &mut app,
            serde_json::json!({
                "jsonrpc": "2.0",
                "method": "set_renderer_override",
                "params": {"renderer": 42},
                "id": 3
            }),
        );
        assert_eq!(response.error.unwrap().code, -32602);
    }

    #[test]
    fn audit_request_is_forwarded() {
        let mut app = app();
        call(
            &mut app,
            serde_json::json!({"jsonrpc": "2.0", "method": "start_layout_audit", "params": null, "id": 4}),
        );
        let events = app.world().resource::<Events<StartLayoutAudit>>();
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn unknown_methods_are_rejected() {
        let mut app = app();
        let response = call(
            &mut app,
            serde_json::json!({"jsonrpc": "2.0", "method": "teleport", "params": {}, "id": 5}),
        );
        assert_eq!(response.error.unwrap().code, -32601);
    }

    #[test]
    fn malformed_envelopes_get_a_debug_notification() {
        let mut app = app();
        app.world_mut().send_event(IncomingRpcMessage {
            content: "{\"jsonrpc\": \"2.0\", \"method\":".to_string(),
        });
        app.update();

        let rpc = app.world().resource::<WebRpcInterface>();
        assert!(rpc.outgoing_responses.is_empty());
        assert_eq!(rpc.outgoing_notifications.len(), 1);
        assert_eq!(rpc.outgoing_notifications[0].method, "debug_message");
    }
}
