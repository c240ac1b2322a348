//! Configuration loading and start-up of the scroll runtime.
//!
//! Loads the showcase JSON asset, validates it (falling back to the built-in
//! configuration), and builds the smooth-scroll emulator and trigger
//! timelines before the app enters its running state.

/// Showcase config loading, validation and scroll runtime construction.
pub mod config_loader;

/// Loading progress tracking resource for state transitions.
pub mod progress;
