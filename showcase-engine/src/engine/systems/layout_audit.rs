use crate::engine::assets::showcase_config::ShowcaseConfig;
use crate::engine::core::app_state::{AppState, FrameSet};
use crate::engine::overlay::transition::{
    TransitionMask, TransitionOverlay, transition_overlay_opacity,
};
use crate::engine::scroll::ease::Ease;
use crate::engine::scroll::smooth_scroll::SmoothScroll;
use crate::engine::systems::console_capture::{AuditConsoleLog, CapturedLog};
use crate::rpc::web_rpc::WebRpcInterface;
use bevy::asset::AssetLoadFailedEvent;
use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use layout_guard::{
    GuardReport, GuardThresholds, LayoutSnapshot, RequestRecord, ScenarioStep,
    ScrollScenario, StepOutcome, TextBox, Viewport, check_snapshot,
};

#[cfg(not(target_arch = "wasm32"))]
use layout_guard::AuditRecord;
#[cfg(not(target_arch = "wasm32"))]
use std::path::PathBuf;

/// Environment variable that starts the audit once the showcase is running.
pub const AUDIT_ENV: &str = "SHOWCASE_LAYOUT_AUDIT";

#[cfg(not(target_arch = "wasm32"))]
pub const AUDIT_OUTPUT_PATH: &str = "layout_audit.jsonl";

/// Request to replay the wheel scenario against the live overlay.
#[derive(Event, Debug, Clone, Copy, Default)]
pub struct StartLayoutAudit;

/// Failed asset loads, reported as failed same-origin requests.
#[derive(Resource, Debug, Default)]
pub struct AuditRequestLog(pub Vec<RequestRecord>);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuditPhase {
    #[default]
    Idle,
    /// Requested, waiting for the transition overlay to clear.
    Pending,
    Running,
}

/// In-app scenario driver over the current window.
#[derive(Resource, Default)]
pub struct LayoutAudit {
    phase: AuditPhase,
    steps: Vec<ScenarioStep>,
    cursor: usize,
    settle_until: Option<f64>,
    viewport: Option<Viewport>,
    thresholds: GuardThresholds,
    report: GuardReport,
    #[cfg(not(target_arch = "wasm32"))]
    output_path: Option<PathBuf>,
    #[cfg(not(target_arch = "wasm32"))]
    sink: Option<std::io::BufWriter<std::fs::File>>,
}

impl LayoutAudit {
    /// Audit that records every capture as a JSON line at `path`.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn writing_to(path: impl Into<PathBuf>) -> Self {
        Self {
            output_path: Some(path.into()),
            ..default()
        }
    }

    pub fn phase(&self) -> AuditPhase {
        self.phase
    }

    pub fn report(&self) -> &GuardReport {
        &self.report
    }

    pub fn request(&mut self) -> bool {
        if self.phase != AuditPhase::Idle {
            return false;
        }
        self.phase = AuditPhase::Pending;
        true
    }
}

pub struct LayoutAuditPlugin;

impl Plugin for LayoutAuditPlugin {
    fn build(&self, app: &mut App) {
        #[cfg(not(target_arch = "wasm32"))]
        app.insert_resource(LayoutAudit::writing_to(AUDIT_OUTPUT_PATH));
        #[cfg(target_arch = "wasm32")]
        app.init_resource::<LayoutAudit>();

        app.init_resource::<AuditRequestLog>()
            .init_resource::<AuditConsoleLog>()
            .add_event::<StartLayoutAudit>()
            .add_systems(Startup, request_audit_from_env)
            .add_systems(
                Update,
                (
                    record_failed_config_loads,
                    request_layout_audit,
                    run_layout_audit.run_if(in_state(AppState::Running)),
                )
                    .chain()
                    .after(FrameSet::Render),
            );
    }
}

/// Horizontal box of a UI node in logical pixels.
/// `centre_x` and `width` are physical, as Bevy UI lays them out.
pub fn logical_span(centre_x: f32, width: f32, scale_factor: f32) -> (f32, f32) {
    let scale = if scale_factor > 0.0 { scale_factor } else { 1.0 };
    ((centre_x - width * 0.5) / scale, (centre_x + width * 0.5) / scale)
}

/// Width the document would scroll to: never less than the viewport.
pub fn document_width(viewport_width: f32, rights: impl IntoIterator<Item = f32>) -> f32 {
    rights
        .into_iter()
        .filter(|right| right.is_finite())
        .fold(viewport_width, f32::max)
}

pub fn request_layout_audit(
    mut requests: EventReader<StartLayoutAudit>,
    mut audit: ResMut<LayoutAudit>,
) {
    if requests.read().count() > 0 && audit.request() {
        info!("Layout audit requested");
    }
}

/// Start the audit from the environment on native builds.
pub fn request_audit_from_env(mut requests: EventWriter<StartLayoutAudit>) {
    #[cfg(not(target_arch = "wasm32"))]
    if std::env::var(AUDIT_ENV).is_ok_and(|value| value == "1") {
        requests.write(StartLayoutAudit);
    }

    #[cfg(target_arch = "wasm32")]
    let _ = &mut requests;
}

pub fn record_failed_config_loads(
    mut failures: EventReader<AssetLoadFailedEvent<ShowcaseConfig>>,
    mut log: ResMut<AuditRequestLog>,
) {
    for failure in failures.read() {
        log.0.push(RequestRecord {
            url: failure.path.to_string(),
            same_origin: true,
            status: None,
            failed: true,
        });
    }
}

#[allow(clippy::too_many_arguments)]
pub fn run_layout_audit(
    time: Res<Time<Real>>,
    mut audit: ResMut<LayoutAudit>,
    smooth: Option<ResMut<SmoothScroll>>,
    mask: Option<Res<TransitionMask>>,
    windows: Query<&Window, With<PrimaryWindow>>,
    texts: Query<(&Text, &ComputedNode, &GlobalTransform, &TextColor, &InheritedVisibility)>,
    nodes: Query<(&ComputedNode, &GlobalTransform)>,
    overlays: Query<&BackgroundColor, With<TransitionOverlay>>,
    requests: Res<AuditRequestLog>,
    console: Option<Res<AuditConsoleLog>>,
    mut rpc: Option<ResMut<WebRpcInterface>>,
) {
    let Some(mut smooth) = smooth else {
        return;
    };
    let now = time.elapsed_secs_f64();

    if audit.phase == AuditPhase::Pending {
        let mask_cleared =
            mask.is_none_or(|mask| mask.removed) && transition_overlay_opacity(&overlays).is_none();
        let Ok(window) = windows.single() else {
            return;
        };
        if !mask_cleared {
            return;
        }
        begin(&mut audit, Viewport::new(window.width(), window.height()));
        smooth.scroll_to(0.0, 0.0, Ease::Linear);
    }
    if audit.phase != AuditPhase::Running {
        return;
    }

    while let Some(step) = audit.steps.get(audit.cursor).copied() {
        match step {
            ScenarioStep::Wheel { delta_px } => smooth.on_wheel(delta_px),
            ScenarioStep::Settle { millis } => {
                let until = *audit
                    .settle_until
                    .get_or_insert(now + millis as f64 / 1000.0);
                if now < until {
                    return;
                }
                audit.settle_until = None;
            }
            ScenarioStep::Capture { step } => {
                let Ok(window) = windows.single() else {
                    return;
                };
                let log = console.as_deref().map(AuditConsoleLog::captured).unwrap_or_default();
                let snapshot = capture(
                    window,
                    smooth.scroll(),
                    &texts,
                    &nodes,
                    &overlays,
                    &requests,
                    log,
                );
                record(&mut audit, step, snapshot, rpc.as_deref_mut());
            }
        }
        audit.cursor += 1;
    }

    finish(&mut audit);
}

fn begin(audit: &mut LayoutAudit, viewport: Viewport) {
    let scenario = ScrollScenario::for_viewport(viewport);
    audit.steps = scenario.steps();
    audit.cursor = 0;
    audit.settle_until = None;
    audit.viewport = Some(viewport);
    audit.report = GuardReport::default();
    audit.phase = AuditPhase::Running;

    #[cfg(not(target_arch = "wasm32"))]
    {
        audit.sink = audit.output_path.as_ref().and_then(|path| {
            match std::fs::File::create(path) {
                Ok(file) => Some(std::io::BufWriter::new(file)),
                Err(err) => {
                    warn!("Layout audit: cannot write {}: {err}", path.display());
                    None
                }
            }
        });
    }

    info!("Layout audit started at {viewport} → {} steps", audit.steps.len());
}

fn capture(
    window: &Window,
    scroll_offset: f32,
    texts: &Query<(&Text, &ComputedNode, &GlobalTransform, &TextColor, &InheritedVisibility)>,
    nodes: &Query<(&ComputedNode, &GlobalTransform)>,
    overlays: &Query<&BackgroundColor, With<TransitionOverlay>>,
    requests: &AuditRequestLog,
    log: CapturedLog,
) -> LayoutSnapshot {
    let scale = window.scale_factor();
    let viewport = Viewport::new(window.width(), window.height());
    let mut snapshot = LayoutSnapshot::blank(viewport, scroll_offset);

    snapshot.document_width = document_width(
        viewport.width,
        nodes.iter().map(|(node, transform)| {
            logical_span(transform.translation().x, node.size().x, scale).1
        }),
    );
    snapshot.text_boxes = texts
        .iter()
        .filter(|(text, ..)| !text.0.trim().is_empty())
        .map(|(text, node, transform, colour, visibility)| {
            let (left, right) = logical_span(transform.translation().x, node.size().x, scale);
            TextBox {
                text: text.0.clone(),
                left,
                right,
                opacity: colour.0.alpha(),
                displayed: visibility.get() && !node.is_empty(),
            }
        })
        .collect();
    snapshot.overlay_opacity = transition_overlay_opacity(overlays);
    snapshot.requests = requests.0.clone();
    snapshot.console = log.console;
    snapshot.page_errors = log.page_errors;
    snapshot
}

fn record(
    audit: &mut LayoutAudit,
    step: usize,
    snapshot: LayoutSnapshot,
    rpc: Option<&mut WebRpcInterface>,
) {
    let violations = check_snapshot(&snapshot, &audit.thresholds);
    let Some(viewport) = audit.viewport else {
        return;
    };

    if !violations.is_empty() {
        for violation in &violations {
            warn!("Layout violation at step {step}: {violation}");
        }
        if let Some(rpc) = rpc {
            rpc.send_notification(
                "layout_violation",
                serde_json::json!({
                    "step": step,
                    "viewport": viewport,
                    "scroll_offset": snapshot.scroll_offset,
                    "violations": violations,
                }),
            );
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    if let Some(sink) = audit.sink.as_mut() {
        let record = AuditRecord {
            step,
            snapshot: snapshot.clone(),
        };
        if let Err(err) = record.write_line(sink) {
            warn!("Layout audit: failed to record step {step}: {err}");
        }
    }

    audit.report.push_step(
        viewport,
        StepOutcome {
            step,
            scroll_offset: snapshot.scroll_offset,
            violations,
        },
    );
}

fn finish(audit: &mut LayoutAudit) {
    audit.phase = AuditPhase::Idle;

    #[cfg(not(target_arch = "wasm32"))]
    if let Some(mut sink) = audit.sink.take() {
        use std::io::Write;
        if let Err(err) = sink.flush() {
            warn!("Layout audit: failed to flush the audit record: {err}");
        }
    }

    let summary = audit.report.summary();
    if audit.report.passed() {
        info!("Layout audit passed\n{summary}");
    } else {
        warn!(
            "Layout audit found {} violations\n{summary}",
            audit.report.violation_count()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::systems::console_capture::capture_panics;
    use bevy::log::tracing;
    use bevy::log::tracing_subscriber::Registry;
    use bevy::log::tracing_subscriber::layer::SubscriberExt;
    use bevy::time::TimeUpdateStrategy;
    use bevy::window::WindowResolution;
    use constants::layout::{AUDIT_WHEEL_STEP_PX, AUDIT_WHEEL_STEPS};
    use layout_guard::Violation;
    use std::time::Duration;

    #[test]
    fn spans_are_converted_to_logical_pixels() {
        assert_eq!(logical_span(200.0, 100.0, 2.0), (75.0, 125.0));
        assert_eq!(logical_span(200.0, 100.0, 0.0), (150.0, 250.0));
    }

    #[test]
    fn document_is_at_least_as_wide_as_the_viewport() {
        assert_eq!(document_width(1366.0, []), 1366.0);
        assert_eq!(document_width(1366.0, [400.0, 1300.0]), 1366.0);
        assert_eq!(document_width(390.0, [420.5, f32::NAN]), 420.5);
    }

    #[test]
    fn audit_is_not_requested_twice() {
        let mut audit = LayoutAudit::default();
        assert!(audit.request());
        assert!(!audit.request());
        assert_eq!(audit.phase(), AuditPhase::Pending);
    }

    fn audit_app(console: AuditConsoleLog) -> App {
        let mut smooth = SmoothScroll::default();
        smooth.set_limit(5000.0);

        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_millis(100)))
            .insert_resource(smooth)
            .insert_resource(console)
            .init_resource::<LayoutAudit>()
            .init_resource::<AuditRequestLog>()
            .add_event::<StartLayoutAudit>()
            .add_systems(Update, (request_layout_audit, run_layout_audit).chain());
        app.world_mut().spawn((
            Window {
                resolution: WindowResolution::new(1366.0, 768.0),
                ..default()
            },
            PrimaryWindow,
        ));
        app
    }

    fn run_audit(app: &mut App) {
        app.world_mut().send_event(StartLayoutAudit);
        for _ in 0..80 {
            app.update();
        }
    }

    #[test]
    fn scenario_replays_every_wheel_step_and_captures() {
        let mut app = audit_app(AuditConsoleLog::default());
        run_audit(&mut app);

        let audit = app.world().resource::<LayoutAudit>();
        assert_eq!(audit.phase(), AuditPhase::Idle);
        let report = audit.report();
        assert_eq!(report.runs.len(), 1);
        assert_eq!(report.runs[0].viewport, Viewport::new(1366.0, 768.0));
        assert_eq!(report.runs[0].steps.len(), AUDIT_WHEEL_STEPS + 1);
        assert!(report.passed(), "{}", report.summary());
        assert_eq!(
            app.world().resource::<SmoothScroll>().target(),
            AUDIT_WHEEL_STEPS as f32 * AUDIT_WHEEL_STEP_PX
        );
    }

    #[test]
    fn logged_errors_fail_the_audit() {
        let console = AuditConsoleLog::default();
        let mut app = audit_app(console.clone());
        let subscriber = Registry::default().with(console.layer());
        tracing::subscriber::with_default(subscriber, || {
            warn!("Slow asset decode");
            error!("Showcase config failed to deserialise");
            run_audit(&mut app);
        });

        let report = app.world().resource::<LayoutAudit>().report();
        assert!(!report.passed());
        let steps = &report.runs[0].steps;
        assert_eq!(steps.len(), AUDIT_WHEEL_STEPS + 1);
        for outcome in steps {
            assert_eq!(
                outcome.violations,
                vec![Violation::ConsoleError {
                    message: "Showcase config failed to deserialise".into(),
                }],
                "warnings are not violations"
            );
        }
    }

    #[test]
    fn panics_are_reported_as_page_errors() {
        let console = AuditConsoleLog::default();
        capture_panics(console.clone());
        let caught: std::thread::Result<()> =
            std::panic::catch_unwind(|| panic!("scene graph corrupted"));
        assert!(caught.is_err());

        let mut app = audit_app(console);
        run_audit(&mut app);

        let report = app.world().resource::<LayoutAudit>().report();
        assert!(!report.passed());
        assert!(report.runs[0].steps[0].violations.iter().any(|violation| matches!(
            violation,
            Violation::PageError { message } if message.contains("scene graph corrupted")
        )));
    }
}
