use crate::engine::loading::progress::LoadingProgress;
use bevy::prelude::*;

#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Hash, States)]
pub enum AppState {
    #[default]
    Loading,
    Running,
}

/// Per-frame ordering. Scroll state settles before anything reads it, the
/// camera pose and quality profile are decided before render-facing systems
/// consume them.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum FrameSet {
    ClockBridge,
    ScrollTracker,
    OrbitDirector,
    QualityGate,
    Render,
}

pub fn configure_frame_sets(app: &mut App) {
    app.configure_sets(
        Update,
        (
            FrameSet::ClockBridge,
            FrameSet::ScrollTracker,
            FrameSet::OrbitDirector,
            FrameSet::QualityGate,
            FrameSet::Render,
        )
            .chain(),
    );
}

#[derive(Component)]
pub struct FpsText;

// Final transition to running state
pub fn transition_to_running(
    progress: Res<LoadingProgress>,
    mut next_state: ResMut<NextState<AppState>>,
) {
    if progress.is_ready() {
        info!("→ Showcase ready, transitioning to Running state");
        next_state.set(AppState::Running);
    }
}
