use super::counter::HudCounter;
use crate::engine::assets::showcase_config::ShowcaseConfig;
use bevy::prelude::*;
use bevy::window::PrimaryWindow;

/// Layout-time visibility of one HUD counter, applied on the next frame.
/// `ratio` is `None` when visibility cannot be observed at all.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct HudVisibility {
    pub entity: Entity,
    pub ratio: Option<f32>,
}

/// Fraction of `node` inside `viewport`. `None` for a node with no area,
/// which means layout has not produced a box to observe.
pub fn intersection_ratio(node: Rect, viewport: Rect) -> Option<f32> {
    let area = node.width() * node.height();
    if !(area > 0.0) {
        return None;
    }
    let overlap = node.intersect(viewport);
    if overlap.is_empty() {
        return Some(0.0);
    }
    Some((overlap.width() * overlap.height() / area).clamp(0.0, 1.0))
}

/// Runs after UI layout. Only reports; counters change state next frame.
pub fn observe_hud_visibility(
    windows: Query<&Window, With<PrimaryWindow>>,
    config: Option<Res<ShowcaseConfig>>,
    counters: Query<(Entity, &ComputedNode, &GlobalTransform), With<HudCounter>>,
    mut reports: EventWriter<HudVisibility>,
) {
    let observing = config.is_none_or(|config| config.hud.observe_visibility);
    let viewport = windows
        .single()
        .ok()
        .map(|window| {
            Rect::new(
                0.0,
                0.0,
                window.physical_width() as f32,
                window.physical_height() as f32,
            )
        })
        .filter(|viewport| observing && !viewport.is_empty());

    for (entity, node, transform) in &counters {
        let ratio = viewport.and_then(|viewport| {
            let bounds = Rect::from_center_size(transform.translation().truncate(), node.size());
            intersection_ratio(bounds, viewport)
        });
        reports.write(HudVisibility { entity, ratio });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const VIEWPORT: Rect = Rect {
        min: Vec2::ZERO,
        max: Vec2::new(1366.0, 768.0),
    };

    #[test]
    fn fully_inside_is_one() {
        let node = Rect::new(100.0, 100.0, 300.0, 140.0);
        assert_eq!(intersection_ratio(node, VIEWPORT), Some(1.0));
    }

    #[test]
    fn partial_overlap_is_the_area_fraction() {
        // Bottom half of the box hangs below the viewport.
        let node = Rect::new(100.0, 748.0, 300.0, 788.0);
        assert_relative_eq!(intersection_ratio(node, VIEWPORT).unwrap(), 0.5);
    }

    #[test]
    fn offscreen_is_zero_and_empty_boxes_are_unobservable() {
        let below = Rect::new(100.0, 900.0, 300.0, 940.0);
        assert_eq!(intersection_ratio(below, VIEWPORT), Some(0.0));

        let collapsed = Rect::new(100.0, 100.0, 100.0, 140.0);
        assert_eq!(intersection_ratio(collapsed, VIEWPORT), None);
    }
}
