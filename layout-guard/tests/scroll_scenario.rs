use layout_guard::{
    GuardError, GuardThresholds, LayoutSnapshot, PageDriver, ScrollScenario, TextBox, Viewport,
    Violation, run_scenario,
};

/// Page model with full-viewport sections and a loading mask that fades out
/// over `mask_fade_ms` after load.
struct SimulatedPage {
    viewport: Viewport,
    sections: usize,
    scroll: f32,
    elapsed_ms: u64,
    mask_fade_ms: u64,
    /// Extra width of the widest element, to provoke overflow.
    overhang_px: f32,
}

impl SimulatedPage {
    fn new(sections: usize) -> Self {
        Self {
            viewport: Viewport::new(0.0, 0.0),
            sections,
            scroll: 0.0,
            elapsed_ms: 0,
            mask_fade_ms: 700,
            overhang_px: 0.0,
        }
    }

    fn limit(&self) -> f32 {
        (self.sections as f32 - 1.0) * self.viewport.height
    }
}

impl PageDriver for SimulatedPage {
    fn open(&mut self, viewport: Viewport) -> Result<(), GuardError> {
        self.viewport = viewport;
        self.scroll = 0.0;
        // Load completes before the first capture.
        self.elapsed_ms = 1_000;
        Ok(())
    }

    fn wheel(&mut self, delta_px: f32) -> Result<(), GuardError> {
        self.scroll = (self.scroll + delta_px).clamp(0.0, self.limit());
        Ok(())
    }

    fn settle(&mut self, millis: u64) -> Result<(), GuardError> {
        self.elapsed_ms += millis;
        Ok(())
    }

    fn snapshot(&mut self) -> Result<LayoutSnapshot, GuardError> {
        let mut snapshot = LayoutSnapshot::blank(self.viewport, self.scroll);
        snapshot.document_width = self.viewport.width + self.overhang_px;
        let margin = self.viewport.width * 0.08;
        let copy_width = (self.viewport.width - 2.0 * margin).min(576.0);
        snapshot.text_boxes.push(TextBox {
            text: "Headline".into(),
            left: margin,
            right: margin + copy_width,
            opacity: 1.0,
            displayed: true,
        });
        let fade = (self.elapsed_ms as f32 / self.mask_fade_ms as f32).min(1.0);
        snapshot.overlay_opacity = Some(1.0 - fade);
        Ok(snapshot)
    }
}

#[test]
fn wheel_through_page_at_laptop_viewport_stays_stable() {
    let mut page = SimulatedPage::new(5);
    let scenario = ScrollScenario::for_viewport(Viewport::new(1366.0, 768.0));

    let report = run_scenario(&mut page, &scenario, &GuardThresholds::default()).unwrap();

    assert!(report.passed(), "{}", report.summary());
    let run = &report.runs[0];
    assert_eq!(run.steps.len(), 8);
    // 7 × 680 px overshoots the 3072 px limit; the last steps rest at the end.
    assert_eq!(run.steps.last().map(|s| s.scroll_offset), Some(3072.0));
}

#[test]
fn overflow_and_stuck_mask_are_caught() {
    let mut page = SimulatedPage::new(5);
    page.overhang_px = 24.0;
    page.mask_fade_ms = u64::MAX;
    let scenario = ScrollScenario::for_viewport(Viewport::new(1366.0, 768.0));

    let report = run_scenario(&mut page, &scenario, &GuardThresholds::default()).unwrap();

    assert!(!report.passed());
    let first = &report.runs[0].steps[0].violations;
    assert!(first
        .iter()
        .any(|v| matches!(v, Violation::HorizontalOverflow { .. })));
    assert!(first
        .iter()
        .any(|v| matches!(v, Violation::OverlayTooOpaque { .. })));
}

#[test]
fn every_default_viewport_is_replayed() {
    let mut page = SimulatedPage::new(5);
    let scenario = ScrollScenario::default();

    let report = run_scenario(&mut page, &scenario, &GuardThresholds::default()).unwrap();

    assert_eq!(report.runs.len(), scenario.viewports.len());
    assert!(report.passed(), "{}", report.summary());
}
