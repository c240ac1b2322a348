use super::ease::Ease;
use super::smooth_scroll::ScrollUpdate;
use crate::engine::assets::showcase_config::ShowcaseConfig;
use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use constants::scroll::{SNAP_DELAY, SNAP_DURATION_MAX, SNAP_DURATION_MIN, SNAP_REST_VELOCITY};
use serde::{Deserialize, Serialize};

/// Page geometry the trigger regions are measured against. Every section
/// occupies one viewport height of document.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq)]
pub struct ScrollLayout {
    pub viewport_height: f32,
    pub section_count: usize,
}

impl ScrollLayout {
    pub fn new(viewport_height: f32, section_count: usize) -> Self {
        Self {
            viewport_height,
            section_count,
        }
    }

    pub fn document_height(&self) -> f32 {
        self.viewport_height * self.section_count as f32
    }

    /// Largest reachable scroll offset.
    pub fn scroll_limit(&self) -> f32 {
        (self.document_height() - self.viewport_height).max(0.0)
    }

    /// Document offset of a section's top edge.
    pub fn section_top(&self, index: usize) -> f32 {
        self.viewport_height * index as f32
    }
}

/// Where a trigger region starts and ends in the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerAnchor {
    /// Page top at viewport top to page bottom at viewport bottom.
    Document,
    /// Section top entering at the viewport bottom until the section bottom
    /// leaves through the viewport top.
    Section(usize),
}

impl TriggerAnchor {
    fn resolve(self, layout: &ScrollLayout) -> (f32, f32) {
        match self {
            TriggerAnchor::Document => (0.0, layout.scroll_limit()),
            TriggerAnchor::Section(index) => {
                let top = layout.section_top(index);
                (top - layout.viewport_height, top + layout.viewport_height)
            }
        }
    }
}

/// Rest points a trigger's progress settles on once scrolling stops.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapConfig {
    /// Progress values in `[0, 1]`.
    pub points: Vec<f32>,
    pub duration_min: f32,
    pub duration_max: f32,
    /// Seconds at rest before a snap begins.
    pub delay: f32,
    /// Speed (px per frame) under which scrolling counts as at rest.
    pub rest_velocity: f32,
    /// Farthest a rest point may be from the current progress to capture it.
    pub capture_window: f32,
}

impl Default for SnapConfig {
    fn default() -> Self {
        Self {
            points: Vec::new(),
            duration_min: SNAP_DURATION_MIN,
            duration_max: SNAP_DURATION_MAX,
            delay: SNAP_DELAY,
            rest_velocity: SNAP_REST_VELOCITY,
            capture_window: 1.0,
        }
    }
}

impl SnapConfig {
    /// Rest points at every section boundary of an `n` section timeline.
    pub fn sections(n: usize) -> Self {
        let points = match n {
            0 => Vec::new(),
            1 => vec![0.0],
            _ => (0..n).map(|i| i as f32 / (n - 1) as f32).collect(),
        };
        Self {
            points,
            ..Self::default()
        }
    }

    pub fn with_timing(mut self, timing: &SnapConfig) -> Self {
        self.duration_min = timing.duration_min;
        self.duration_max = timing.duration_max;
        self.delay = timing.delay;
        self.rest_velocity = timing.rest_velocity;
        self.capture_window = timing.capture_window;
        self
    }

    pub fn nearest(&self, progress: f32) -> Option<f32> {
        self.points
            .iter()
            .copied()
            .filter(|p| p.is_finite())
            .min_by(|a, b| (a - progress).abs().total_cmp(&(b - progress).abs()))
    }

    /// Snap length grows with the distance to travel, one full gap between
    /// neighbouring rest points taking the longest.
    pub fn duration_for(&self, distance: f32) -> f32 {
        let gap = if self.points.len() > 1 {
            1.0 / (self.points.len() - 1) as f32
        } else {
            1.0
        };
        let t = (distance.abs() / gap).clamp(0.0, 1.0);
        self.duration_min + (self.duration_max - self.duration_min) * t
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TriggerId(usize);

/// Programmatic scroll the trigger engine wants from the emulator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapRequest {
    pub trigger: TriggerId,
    pub offset: f32,
    pub duration: f32,
    pub ease: Ease,
}

#[derive(Debug, Clone)]
struct ScrollTrigger {
    anchor: TriggerAnchor,
    start: f32,
    end: f32,
    /// Seconds to catch up with the scroll position; `None` follows it exactly.
    scrub: Option<f32>,
    snap: Option<SnapConfig>,
    raw_progress: f32,
    progress: f32,
    rest_time: f32,
    snap_requested: bool,
}

impl ScrollTrigger {
    fn progress_at(&self, scroll: f32) -> f32 {
        let span = self.end - self.start;
        if span <= 0.0 {
            return if scroll >= self.start { 1.0 } else { 0.0 };
        }
        ((scroll - self.start) / span).clamp(0.0, 1.0)
    }
}

/// Scroll-linked timelines: each trigger maps the scroll offset inside its
/// region to a scrubbed progress, optionally snapping to rest points.
#[derive(Resource, Debug, Default)]
pub struct ScrollTriggerEngine {
    triggers: Vec<ScrollTrigger>,
    layout: ScrollLayout,
    scroll: f32,
    velocity: f32,
    updated: bool,
}

impl ScrollTriggerEngine {
    pub fn create(
        &mut self,
        anchor: TriggerAnchor,
        scrub: Option<f32>,
        snap: Option<SnapConfig>,
    ) -> TriggerId {
        let (start, end) = anchor.resolve(&self.layout);
        let mut trigger = ScrollTrigger {
            anchor,
            start,
            end,
            scrub: scrub.filter(|s| *s > 0.0),
            snap,
            raw_progress: 0.0,
            progress: 0.0,
            rest_time: 0.0,
            snap_requested: false,
        };
        trigger.raw_progress = trigger.progress_at(self.scroll);
        trigger.progress = trigger.raw_progress;
        self.triggers.push(trigger);
        TriggerId(self.triggers.len() - 1)
    }

    pub fn trigger_count(&self) -> usize {
        self.triggers.len()
    }

    /// Recalculate every region from a new page layout.
    pub fn refresh(&mut self, layout: ScrollLayout) {
        self.layout = layout;
        let scroll = self.scroll;
        for trigger in &mut self.triggers {
            (trigger.start, trigger.end) = trigger.anchor.resolve(&layout);
            trigger.raw_progress = trigger.progress_at(scroll);
        }
    }

    /// Scroll event from the emulator.
    pub fn update(&mut self, update: &ScrollUpdate) {
        self.scroll = update.scroll;
        self.velocity = update.velocity;
        self.updated = true;
        for trigger in &mut self.triggers {
            trigger.raw_progress = trigger.progress_at(update.scroll);
        }
    }

    /// Advance scrubbing and snap timers by `dt` seconds.
    pub fn tick(&mut self, dt: f32) -> Vec<SnapRequest> {
        // No event this tick means the emulator is at rest.
        if !self.updated {
            self.velocity = 0.0;
        }
        self.updated = false;

        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        let at_rest_speed = self.velocity.abs();
        let mut requests = Vec::new();

        for (index, trigger) in self.triggers.iter_mut().enumerate() {
            trigger.progress = match trigger.scrub {
                Some(scrub) => {
                    let factor = 1.0 - (-dt * 4.0 / scrub).exp();
                    let next = trigger.progress + (trigger.raw_progress - trigger.progress) * factor;
                    if (trigger.raw_progress - next).abs() < 1e-4 {
                        trigger.raw_progress
                    } else {
                        next
                    }
                }
                None => trigger.raw_progress,
            };

            let Some(snap) = &trigger.snap else {
                continue;
            };

            if at_rest_speed >= snap.rest_velocity {
                trigger.rest_time = 0.0;
                trigger.snap_requested = false;
                continue;
            }
            trigger.rest_time += dt;
            if trigger.snap_requested || trigger.rest_time < snap.delay {
                continue;
            }

            // Only the region the reader is actually inside may pull the page.
            if self.scroll < trigger.start || self.scroll > trigger.end {
                continue;
            }

            let Some(point) = snap.nearest(trigger.raw_progress) else {
                continue;
            };
            let distance = point - trigger.raw_progress;
            let offset = trigger.start + point * (trigger.end - trigger.start);
            if (offset - self.scroll).abs() < 0.5 || distance.abs() > snap.capture_window {
                continue;
            }

            trigger.snap_requested = true;
            requests.push(SnapRequest {
                trigger: TriggerId(index),
                offset,
                duration: snap.duration_for(distance),
                ease: Ease::Power2InOut,
            });
        }

        requests
    }

    /// Scrubbed (and snapped) progress of a trigger.
    pub fn progress(&self, id: TriggerId) -> Option<f32> {
        self.triggers.get(id.0).map(|t| t.progress)
    }

    /// Progress the trigger would show with no scrub lag.
    pub fn raw_progress(&self, id: TriggerId) -> Option<f32> {
        self.triggers.get(id.0).map(|t| t.raw_progress)
    }

    pub fn region(&self, id: TriggerId) -> Option<(f32, f32)> {
        self.triggers.get(id.0).map(|t| (t.start, t.end))
    }
}

/// Track the primary window height and configured section count.
pub fn sync_scroll_layout(
    windows: Query<&Window, With<PrimaryWindow>>,
    config: Option<Res<ShowcaseConfig>>,
    mut layout: ResMut<ScrollLayout>,
) {
    let (Ok(window), Some(config)) = (windows.single(), config) else {
        return;
    };
    let height = window.height();
    if !(height > 0.0) {
        return;
    }
    layout.set_if_neq(ScrollLayout::new(height, config.section_count()));
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn update(scroll: f32, velocity: f32) -> ScrollUpdate {
        ScrollUpdate {
            scroll,
            velocity,
            progress: 0.0,
            limit: 0.0,
        }
    }

    fn engine(viewport_height: f32, sections: usize) -> ScrollTriggerEngine {
        let mut engine = ScrollTriggerEngine::default();
        engine.refresh(ScrollLayout::new(viewport_height, sections));
        engine
    }

    #[test]
    fn regions_follow_the_layout() {
        let mut engine = engine(768.0, 5);
        let camera = engine.create(TriggerAnchor::Document, None, None);
        let second = engine.create(TriggerAnchor::Section(1), None, None);
        assert_eq!(engine.region(camera), Some((0.0, 3072.0)));
        assert_eq!(engine.region(second), Some((0.0, 1536.0)));

        engine.refresh(ScrollLayout::new(1080.0, 5));
        assert_eq!(engine.region(camera), Some((0.0, 4320.0)));
    }

    #[test]
    fn unscrubbed_progress_tracks_scroll_exactly() {
        let mut engine = engine(768.0, 5);
        let camera = engine.create(TriggerAnchor::Document, None, None);
        engine.update(&update(1536.0, 10.0));
        engine.tick(1.0 / 60.0);
        assert_relative_eq!(engine.progress(camera).unwrap(), 0.5);
    }

    #[test]
    fn scrub_lags_then_catches_up() {
        let mut engine = engine(768.0, 5);
        let camera = engine.create(TriggerAnchor::Document, Some(1.5), None);
        engine.update(&update(3072.0, 30.0));
        engine.tick(1.0 / 60.0);
        let first = engine.progress(camera).unwrap();
        assert!(first > 0.0 && first < 0.1);

        for _ in 0..600 {
            engine.tick(1.0 / 60.0);
        }
        assert_eq!(engine.progress(camera), Some(1.0));
    }

    #[test]
    fn snap_waits_for_rest_then_targets_nearest_point() {
        let mut engine = engine(1000.0, 5);
        let camera = engine.create(TriggerAnchor::Document, None, Some(SnapConfig::sections(5)));

        // 0.3 progress of a 4000 px timeline; nearest rest point is 0.25.
        engine.update(&update(1200.0, 25.0));
        assert!(engine.tick(1.0 / 60.0).is_empty(), "still moving");

        assert!(engine.tick(0.05).is_empty(), "rest delay not yet elapsed");
        let requests = engine.tick(0.06);
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].trigger, camera);
        assert_relative_eq!(requests[0].offset, 1000.0);
        assert!(requests[0].duration >= SNAP_DURATION_MIN && requests[0].duration <= SNAP_DURATION_MAX);

        assert!(engine.tick(0.5).is_empty(), "one request per rest");
    }

    #[test]
    fn no_snap_when_already_on_a_rest_point() {
        let mut engine = engine(1000.0, 5);
        engine.create(TriggerAnchor::Document, None, Some(SnapConfig::sections(5)));
        engine.update(&update(2000.0, 0.0));
        for _ in 0..30 {
            assert!(engine.tick(1.0 / 60.0).is_empty());
        }
    }

    #[test]
    fn snap_durations_are_bounded() {
        let snap = SnapConfig::sections(5);
        assert_relative_eq!(snap.duration_for(0.0), SNAP_DURATION_MIN);
        assert_relative_eq!(snap.duration_for(0.25), SNAP_DURATION_MAX);
        assert_relative_eq!(snap.duration_for(3.0), SNAP_DURATION_MAX);
        assert_eq!(snap.nearest(0.9), Some(1.0));
        assert_eq!(SnapConfig::sections(0).nearest(0.5), None);
    }
}
