/// Scripted wheel scenario and the driver loop that runs it.
use crate::checks::{GuardThresholds, check_snapshot};
use crate::error::GuardError;
use crate::report::{GuardReport, StepOutcome, ViewportRun};
use crate::snapshot::{LayoutSnapshot, Viewport};
use constants::layout::{AUDIT_SETTLE_MS, AUDIT_VIEWPORTS, AUDIT_WHEEL_STEP_PX, AUDIT_WHEEL_STEPS};
use serde::{Deserialize, Serialize};

/// A fixed sequence of discrete wheel steps, replayed at every viewport.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScrollScenario {
    pub viewports: Vec<Viewport>,
    pub wheel_steps: usize,
    pub wheel_step_px: f32,
    pub settle_ms: u64,
}

impl Default for ScrollScenario {
    fn default() -> Self {
        Self {
            viewports: AUDIT_VIEWPORTS
                .iter()
                .map(|&(width, height)| Viewport::new(width, height))
                .collect(),
            wheel_steps: AUDIT_WHEEL_STEPS,
            wheel_step_px: AUDIT_WHEEL_STEP_PX,
            settle_ms: AUDIT_SETTLE_MS,
        }
    }
}

/// One action of the scenario at a single viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScenarioStep {
    Wheel { delta_px: f32 },
    Settle { millis: u64 },
    Capture { step: usize },
}

impl ScrollScenario {
    /// Scenario for a single viewport with the default wheel script.
    pub fn for_viewport(viewport: Viewport) -> Self {
        Self {
            viewports: vec![viewport],
            ..Self::default()
        }
    }

    /// Actions replayed at each viewport: capture the resting page, then
    /// wheel, settle and capture once per step.
    pub fn steps(&self) -> Vec<ScenarioStep> {
        let mut steps = Vec::with_capacity(1 + self.wheel_steps * 3);
        steps.push(ScenarioStep::Capture { step: 0 });
        for step in 1..=self.wheel_steps {
            steps.push(ScenarioStep::Wheel {
                delta_px: self.wheel_step_px,
            });
            steps.push(ScenarioStep::Settle {
                millis: self.settle_ms,
            });
            steps.push(ScenarioStep::Capture { step });
        }
        steps
    }
}

/// Browser-like host the scenario is replayed against.
pub trait PageDriver {
    /// Load the page fresh at the given viewport.
    fn open(&mut self, viewport: Viewport) -> Result<(), GuardError>;

    /// Dispatch one wheel event of `delta_px` vertical pixels.
    fn wheel(&mut self, delta_px: f32) -> Result<(), GuardError>;

    /// Let the page run for `millis` milliseconds.
    fn settle(&mut self, millis: u64) -> Result<(), GuardError>;

    /// Capture the current layout.
    fn snapshot(&mut self) -> Result<LayoutSnapshot, GuardError>;
}

/// Replay `scenario` on `driver` at every viewport, checking each capture.
pub fn run_scenario<D: PageDriver>(
    driver: &mut D,
    scenario: &ScrollScenario,
    thresholds: &GuardThresholds,
) -> Result<GuardReport, GuardError> {
    let steps = scenario.steps();
    let mut report = GuardReport::default();

    for viewport in &scenario.viewports {
        driver.open(*viewport)?;
        let mut run = ViewportRun::new(*viewport);

        for action in &steps {
            match *action {
                ScenarioStep::Wheel { delta_px } => driver.wheel(delta_px)?,
                ScenarioStep::Settle { millis } => driver.settle(millis)?,
                ScenarioStep::Capture { step } => {
                    let snapshot = driver.snapshot()?;
                    run.steps.push(StepOutcome {
                        step,
                        scroll_offset: snapshot.scroll_offset,
                        violations: check_snapshot(&snapshot, thresholds),
                    });
                }
            }
        }

        report.runs.push(run);
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_script_captures_rest_and_every_step() {
        let scenario = ScrollScenario::for_viewport(Viewport::new(1366.0, 768.0));
        let steps = scenario.steps();
        let captures = steps
            .iter()
            .filter(|s| matches!(s, ScenarioStep::Capture { .. }))
            .count();
        assert_eq!(captures, AUDIT_WHEEL_STEPS + 1);
        assert_eq!(steps[0], ScenarioStep::Capture { step: 0 });
        assert_eq!(
            steps[1],
            ScenarioStep::Wheel {
                delta_px: AUDIT_WHEEL_STEP_PX
            }
        );
        assert_eq!(
            steps.last(),
            Some(&ScenarioStep::Capture {
                step: AUDIT_WHEEL_STEPS
            })
        );
    }
}
