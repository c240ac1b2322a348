//! Runtime diagnostics: frame rate reporting and the in-app layout audit.

/// Tracing layer and panic hook feeding console entries to the layout audit.
pub mod console_capture;

/// FPS tracking and notification systems for performance monitoring.
///
/// Sends frame rate updates to the host page via RPC and updates the native overlay.
pub mod fps_tracking;

/// Replays the wheel scenario against the live overlay and checks every capture.
pub mod layout_audit;
