use crate::engine::loading::progress::LoadingProgress;
use bevy::prelude::*;
use constants::layout::{
    TRANSITION_FADE_SECONDS, TRANSITION_REMOVE_SECONDS, TRANSITION_TIMEOUT_SECONDS,
};
use constants::render_settings::{BACKGROUND_COLOUR, DEFAULT_ACCENT_COLOUR};

const LOADING_LABEL: &str = "LOADING EXPERIENCE";
const LOADING_BAR_WIDTH_PX: f32 = 192.0;
/// Time constant of the bar chasing the real progress.
const LOADING_BAR_EASE_SECONDS: f32 = 0.3;

/// Full-screen mask hiding the canvas until the showcase is ready.
#[derive(Component)]
pub struct TransitionOverlay;

/// Anything drawn on the mask; faded with it from its own base alpha.
#[derive(Component, Debug, Clone, Copy)]
pub struct MaskContent {
    pub base_alpha: f32,
}

#[derive(Component)]
pub struct LoadingBarFill;

#[derive(Component)]
pub struct LoadingPercent;

/// Progress currently drawn by the loading bar.
#[derive(Resource, Debug, Default, Clone, Copy, PartialEq)]
pub struct LoadingBar {
    pub shown: f32,
}

/// Timing of the loading mask, in seconds of real time.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq)]
pub struct TransitionMask {
    pub started_at: f64,
    pub ready_at: Option<f64>,
    pub removed: bool,
}

impl TransitionMask {
    pub fn new(now: f64) -> Self {
        Self {
            started_at: now,
            ready_at: None,
            removed: false,
        }
    }

    /// Moment the fade began, forced once the load has timed out.
    pub fn fade_start(&self) -> f64 {
        self.ready_at
            .unwrap_or(self.started_at + TRANSITION_TIMEOUT_SECONDS as f64)
    }

    pub fn timed_out(&self, now: f64) -> bool {
        self.ready_at.is_none() && now - self.started_at >= TRANSITION_TIMEOUT_SECONDS as f64
    }
}

/// Mask opacity `elapsed` seconds after the fade began.
pub fn mask_opacity(elapsed: f64) -> f32 {
    if elapsed <= 0.0 {
        return 1.0;
    }
    (1.0 - elapsed as f32 / TRANSITION_FADE_SECONDS).clamp(0.0, 1.0)
}

pub fn should_remove(elapsed: f64) -> bool {
    elapsed >= TRANSITION_REMOVE_SECONDS as f64
}

/// Move the drawn progress towards `target`, never backwards.
pub fn ease_loading_bar(shown: f32, target: f32, delta_seconds: f32) -> f32 {
    let target = target.clamp(0.0, 1.0);
    if target <= shown || delta_seconds <= 0.0 {
        return shown.max(target);
    }
    let next = shown + (target - shown) * (delta_seconds / LOADING_BAR_EASE_SECONDS).min(1.0);
    if target - next < 0.005 { target } else { next }
}

pub fn percent_label(fraction: f32) -> String {
    format!("{}%", (fraction.clamp(0.0, 1.0) * 100.0).round() as u32)
}

pub fn spawn_transition_overlay(mut commands: Commands, time: Res<Time<Real>>) {
    commands.insert_resource(TransitionMask::new(time.elapsed_secs_f64()));
    commands.init_resource::<LoadingBar>();
    commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                flex_direction: FlexDirection::Column,
                align_items: AlignItems::Center,
                justify_content: JustifyContent::Center,
                ..default()
            },
            BackgroundColor(BACKGROUND_COLOUR),
            GlobalZIndex(i32::MAX),
            TransitionOverlay,
        ))
        .with_children(|mask| {
            mask.spawn((
                Text::new(LOADING_LABEL),
                TextFont::from_font_size(11.0),
                TextColor(Color::srgba(1.0, 1.0, 1.0, 0.3)),
                Node {
                    margin: UiRect::bottom(Val::Px(32.0)),
                    ..default()
                },
                MaskContent { base_alpha: 0.3 },
            ));
            mask.spawn((
                Node {
                    width: Val::Px(LOADING_BAR_WIDTH_PX),
                    height: Val::Px(1.0),
                    overflow: Overflow::clip_x(),
                    ..default()
                },
                BackgroundColor(Color::srgba(1.0, 1.0, 1.0, 0.1)),
                MaskContent { base_alpha: 0.1 },
            ))
            .with_children(|track| {
                track.spawn((
                    Node {
                        width: Val::Percent(0.0),
                        height: Val::Percent(100.0),
                        ..default()
                    },
                    BackgroundColor(DEFAULT_ACCENT_COLOUR),
                    MaskContent { base_alpha: 1.0 },
                    LoadingBarFill,
                ));
            });
            mask.spawn((
                Text::new(percent_label(0.0)),
                TextFont::from_font_size(10.0),
                TextColor(Color::srgba(1.0, 1.0, 1.0, 0.15)),
                Node {
                    margin: UiRect::top(Val::Px(16.0)),
                    ..default()
                },
                MaskContent { base_alpha: 0.15 },
                LoadingPercent,
            ));
        });
}

pub fn update_loading_bar(
    time: Res<Time<Real>>,
    progress: Res<LoadingProgress>,
    mut bar: ResMut<LoadingBar>,
    mut fills: Query<&mut Node, With<LoadingBarFill>>,
    mut labels: Query<&mut Text, With<LoadingPercent>>,
) {
    let shown = ease_loading_bar(bar.shown, progress.fraction(), time.delta_secs());
    if !bar.set_if_neq(LoadingBar { shown }) {
        return;
    }

    let width = Val::Percent(shown * 100.0);
    for mut node in &mut fills {
        node.width = width;
    }
    let label = percent_label(shown);
    for mut text in &mut labels {
        if text.0 != label {
            text.0.clone_from(&label);
        }
    }
}

pub fn mark_transition_ready(time: Res<Time<Real>>, mut mask: ResMut<TransitionMask>) {
    if mask.ready_at.is_none() {
        mask.ready_at = Some(time.elapsed_secs_f64());
        info!("Transition overlay: ready → fading");
    }
}

pub fn fade_transition_overlay(
    mut commands: Commands,
    time: Res<Time<Real>>,
    mut mask: ResMut<TransitionMask>,
    mut overlays: Query<(Entity, &mut BackgroundColor), With<TransitionOverlay>>,
    mut contents: Query<
        (&MaskContent, Option<&mut BackgroundColor>, Option<&mut TextColor>),
        Without<TransitionOverlay>,
    >,
) {
    if mask.removed {
        return;
    }
    let now = time.elapsed_secs_f64();
    if mask.timed_out(now) {
        warn!(
            "Showcase not ready after {TRANSITION_TIMEOUT_SECONDS}s, forcing the transition overlay out"
        );
        mask.ready_at = Some(now);
    }
    let elapsed = now - mask.fade_start();

    if should_remove(elapsed) {
        for (entity, _) in &overlays {
            commands.entity(entity).despawn();
        }
        mask.removed = true;
        return;
    }

    let opacity = mask_opacity(elapsed);
    for (_, mut background) in &mut overlays {
        if background.0.alpha() != opacity {
            background.0.set_alpha(opacity);
        }
    }
    for (content, background, colour) in &mut contents {
        let alpha = content.base_alpha * opacity;
        if let Some(mut background) = background {
            if background.0.alpha() != alpha {
                background.0.set_alpha(alpha);
            }
        }
        if let Some(mut colour) = colour {
            if colour.0.alpha() != alpha {
                colour.0.set_alpha(alpha);
            }
        }
    }
}

/// Current mask opacity, `None` once the mask is gone.
pub fn transition_overlay_opacity(
    overlays: &Query<&BackgroundColor, With<TransitionOverlay>>,
) -> Option<f32> {
    overlays
        .iter()
        .map(|background| background.0.alpha())
        .reduce(f32::max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use bevy::ecs::system::RunSystemOnce;
    use bevy::time::TimeUpdateStrategy;
    use std::time::Duration;

    #[test]
    fn opacity_fades_linearly_to_zero() {
        assert_eq!(mask_opacity(-1.0), 1.0);
        assert_eq!(mask_opacity(0.0), 1.0);
        assert_relative_eq!(mask_opacity(0.35), 0.5, epsilon = 1e-5);
        assert_eq!(mask_opacity(0.7), 0.0);
        assert_eq!(mask_opacity(5.0), 0.0);
        assert!(!should_remove(0.79));
        assert!(should_remove(0.8));
    }

    #[test]
    fn timeout_forces_the_fade() {
        let mask = TransitionMask::new(0.0);
        assert!(!mask.timed_out(5.9));
        assert!(mask.timed_out(6.0));

        let ready = TransitionMask {
            ready_at: Some(1.0),
            ..mask
        };
        assert!(!ready.timed_out(60.0));
        assert_eq!(ready.fade_start(), 1.0);
        assert_eq!(mask.fade_start(), 6.0);
    }

    #[test]
    fn loading_bar_eases_forward_only() {
        assert_eq!(ease_loading_bar(0.0, 1.0, 0.0), 0.0);
        assert_relative_eq!(ease_loading_bar(0.0, 1.0, 0.15), 0.5);
        assert_eq!(ease_loading_bar(0.0, 1.0, 1.0), 1.0);
        assert_eq!(ease_loading_bar(0.998, 1.0, 0.01), 1.0);
        assert_eq!(ease_loading_bar(0.8, 0.3, 0.1), 0.8);
        assert_eq!(ease_loading_bar(0.0, 4.0, 5.0), 1.0);
        assert_eq!(percent_label(0.334), "33%");
        assert_eq!(percent_label(1.0), "100%");
    }

    fn app() -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_millis(100)))
            .init_resource::<LoadingProgress>()
            .add_systems(Startup, spawn_transition_overlay)
            .add_systems(Update, (update_loading_bar, fade_transition_overlay));
        app
    }

    fn overlay_count(app: &mut App) -> usize {
        let world = app.world_mut();
        world
            .query_filtered::<Entity, With<TransitionOverlay>>()
            .iter(world)
            .count()
    }

    fn overlay_opacity(app: &mut App) -> Option<f32> {
        app.world_mut()
            .run_system_once(|overlays: Query<&BackgroundColor, With<TransitionOverlay>>| {
                transition_overlay_opacity(&overlays)
            })
            .unwrap()
    }

    #[test]
    fn overlay_is_removed_after_ready() {
        let mut app = app();
        app.update();
        assert_eq!(overlay_count(&mut app), 1);
        assert_eq!(overlay_opacity(&mut app), Some(1.0));

        let now = app.world().resource::<Time<Real>>().elapsed_secs_f64();
        app.world_mut().resource_mut::<TransitionMask>().ready_at = Some(now);
        for _ in 0..4 {
            app.update();
        }
        let fading = overlay_opacity(&mut app).unwrap();
        assert!(fading > 0.0 && fading < 1.0);

        for _ in 0..8 {
            app.update();
        }
        assert_eq!(overlay_count(&mut app), 0);
        assert_eq!(overlay_opacity(&mut app), None);
        assert!(app.world().resource::<TransitionMask>().removed);
    }

    #[test]
    fn overlay_never_sticks_without_ready() {
        let mut app = app();
        app.update();
        // 6 s timeout plus 0.8 s of fade at 100 ms per frame, with slack.
        for _ in 0..90 {
            app.update();
        }
        assert_eq!(overlay_count(&mut app), 0);
    }

    #[test]
    fn bar_and_label_follow_loading_progress() {
        let mut app = app();
        app.update();
        {
            let mut progress = app.world_mut().resource_mut::<LoadingProgress>();
            progress.config_requested = true;
            progress.config_loaded = true;
            progress.scroll_runtime_ready = true;
        }
        for _ in 0..20 {
            app.update();
        }

        assert_eq!(app.world().resource::<LoadingBar>().shown, 1.0);
        let world = app.world_mut();
        let width = world
            .query_filtered::<&Node, With<LoadingBarFill>>()
            .single(world)
            .unwrap()
            .width;
        assert_eq!(width, Val::Percent(100.0));
        let label = world
            .query_filtered::<&Text, With<LoadingPercent>>()
            .single(world)
            .unwrap()
            .0
            .clone();
        assert_eq!(label, "100%");
    }

    #[test]
    fn mask_content_fades_with_the_mask() {
        let mut app = app();
        app.update();
        let now = app.world().resource::<Time<Real>>().elapsed_secs_f64();
        app.world_mut().resource_mut::<TransitionMask>().ready_at = Some(now);
        for _ in 0..4 {
            app.update();
        }

        let mask_alpha = overlay_opacity(&mut app).unwrap();
        let world = app.world_mut();
        for (content, colour) in world
            .query::<(&MaskContent, &TextColor)>()
            .iter(world)
        {
            assert_relative_eq!(colour.0.alpha(), content.base_alpha * mask_alpha, epsilon = 1e-5);
        }
    }
}
