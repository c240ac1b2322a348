use super::counter::HudCounter;
use super::visibility::HudVisibility;
use crate::engine::assets::showcase_config::ShowcaseConfig;
use bevy::prelude::*;
use constants::hud::HUD_VISIBILITY_THRESHOLD;
use rand::SeedableRng;
use rand::rngs::SmallRng;

#[derive(Resource)]
pub struct HudRng(pub SmallRng);

impl Default for HudRng {
    fn default() -> Self {
        Self(SmallRng::seed_from_u64(0x4855_44))
    }
}

/// Apply the previous frame's visibility reports.
pub fn apply_hud_visibility(
    time: Res<Time>,
    config: Option<Res<ShowcaseConfig>>,
    mut reports: EventReader<HudVisibility>,
    mut counters: Query<&mut HudCounter>,
) {
    let threshold = config
        .as_ref()
        .map(|config| config.hud.visibility_threshold)
        .unwrap_or(HUD_VISIBILITY_THRESHOLD);
    let now = time.elapsed_secs_f64();

    for report in reports.read() {
        let Ok(mut counter) = counters.get_mut(report.entity) else {
            continue;
        };
        if counter.is_settled() {
            continue;
        }
        match report.ratio {
            Some(ratio) => {
                if counter.observe(ratio, threshold, now) {
                    debug!("HUD reveal: {}", counter.final_text());
                }
            }
            None => counter.settle(),
        }
    }
}

pub fn tick_hud_counters(
    time: Res<Time>,
    mut rng: ResMut<HudRng>,
    mut counters: Query<(&mut HudCounter, &mut Text)>,
) {
    let now = time.elapsed_secs_f64();
    for (mut counter, mut text) in &mut counters {
        counter.tick(now, &mut rng.0);
        if text.0 != counter.displayed() {
            text.0 = counter.displayed().to_string();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::hud::counter::HudCounterState;

    fn app() -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .add_event::<HudVisibility>()
            .init_resource::<HudRng>()
            .add_systems(Update, (apply_hud_visibility, tick_hud_counters).chain());
        app
    }

    fn report(app: &mut App, entity: Entity, ratio: Option<f32>) {
        app.world_mut().send_event(HudVisibility { entity, ratio });
        app.update();
    }

    #[test]
    fn unobservable_entries_show_their_value_immediately() {
        let mut app = app();
        let entity = app
            .world_mut()
            .spawn((HudCounter::new("48h", 1.2), Text::new("")))
            .id();

        report(&mut app, entity, None);
        assert_eq!(app.world().get::<Text>(entity).unwrap().0, "48h");
        assert!(app.world().get::<HudCounter>(entity).unwrap().is_settled());
    }

    #[test]
    fn visible_entries_start_revealing() {
        let mut app = app();
        let entity = app
            .world_mut()
            .spawn((HudCounter::new("12ms", 1.2), Text::new("")))
            .id();

        report(&mut app, entity, Some(0.2));
        assert_eq!(
            app.world().get::<HudCounter>(entity).unwrap().state(),
            HudCounterState::Idle
        );
        assert_eq!(app.world().get::<Text>(entity).unwrap().0, "--ms");

        report(&mut app, entity, Some(0.75));
        assert!(matches!(
            app.world().get::<HudCounter>(entity).unwrap().state(),
            HudCounterState::Revealing { .. }
        ));
    }

    #[test]
    fn settled_text_survives_later_reports() {
        let mut app = app();
        let entity = app
            .world_mut()
            .spawn((HudCounter::new("X-42", 1.2), Text::new("")))
            .id();

        report(&mut app, entity, None);
        for ratio in [Some(1.0), Some(0.0), None, Some(0.6)] {
            report(&mut app, entity, ratio);
            assert_eq!(app.world().get::<Text>(entity).unwrap().0, "X-42");
        }
    }
}
