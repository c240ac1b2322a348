//! Showcase configuration asset.
//!
//! Sections, camera poses, HUD figures and runtime tuning, loaded from
//! `showcase/showcase.json` and validated before use.

/// Showcase configuration with its validation rules and built-in default.
pub mod showcase_config;
