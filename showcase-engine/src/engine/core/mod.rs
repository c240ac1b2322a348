//! Core application setup and state management.
//!
//! Handles application lifecycle, window configuration, per-frame system
//! ordering and plugin initialisation for both native and WASM targets.

/// Application setup and plugin configuration for the Bevy engine.
///
/// Creates the main app with the showcase plugins, config asset loading
/// and platform-specific configurations.
pub mod app_setup;

/// Application state machine and per-frame system sets.
///
/// Manages states from configuration loading to runtime execution.
pub mod app_state;

/// Platform-specific window configuration for native and WASM builds.
///
/// Configures canvas integration for web targets and vsync settings.
pub mod window_config;
