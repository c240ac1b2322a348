//! Scroll input, smoothing and the frame clock that keeps it in step with
//! rendering.
//!
//! The smooth-scroll emulator owns the document offset. The trigger engine
//! turns that offset into per-region progress with scrub lag and snapping.
//! The clock bridge advances both from the frame clock in a fixed order, and
//! the tracker publishes the settled offset and velocity to the global slot.

/// Single-writer scroll signal slot.
pub mod signal;

/// Offset sampling and per-frame publishing.
pub mod tracker;

/// Wheel smoothing emulator with listener registry and clock source switch.
pub mod smooth_scroll;

/// Scroll-linked trigger regions with scrub and snap.
pub mod trigger;

/// Frame-clock coupling of emulator and trigger engine.
pub mod clock_bridge;

pub mod ease;

use crate::engine::core::app_state::{AppState, FrameSet};
use bevy::input::mouse::MouseWheel;
use bevy::prelude::*;
use clock_bridge::{
    ClockBridge, attach_clock_bridge, drive_scroll_clock, refresh_scroll_layout,
    teardown_clock_bridge,
};
use signal::ScrollSignalPublisher;
use smooth_scroll::{advance_internal_clock, apply_wheel_input};
use tracker::{ScrollTracker, track_scroll_signal};
use trigger::{ScrollLayout, sync_scroll_layout};

pub struct ScrollPlugin;

impl Plugin for ScrollPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<MouseWheel>()
            .init_resource::<ScrollSignalPublisher>()
            .init_resource::<ScrollTracker>()
            .init_resource::<ScrollLayout>()
            .add_systems(
                Update,
                (
                    sync_scroll_layout,
                    refresh_scroll_layout,
                    apply_wheel_input,
                    advance_internal_clock,
                    attach_clock_bridge.run_if(in_state(AppState::Running)),
                    drive_scroll_clock.run_if(resource_exists::<ClockBridge>),
                )
                    .chain()
                    .in_set(FrameSet::ClockBridge),
            )
            .add_systems(Update, track_scroll_signal.in_set(FrameSet::ScrollTracker))
            .add_systems(OnExit(AppState::Running), teardown_clock_bridge);
    }
}
