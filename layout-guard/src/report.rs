/// Guard results and recorded audit files.
use crate::checks::Violation;
use crate::error::GuardError;
use crate::snapshot::{LayoutSnapshot, Viewport};
use serde::{Deserialize, Serialize};
use std::io::{BufRead, Write};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepOutcome {
    pub step: usize,
    pub scroll_offset: f32,
    pub violations: Vec<Violation>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewportRun {
    pub viewport: Viewport,
    pub steps: Vec<StepOutcome>,
}

impl ViewportRun {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            steps: Vec::new(),
        }
    }

    pub fn passed(&self) -> bool {
        self.steps.iter().all(|s| s.violations.is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GuardReport {
    pub runs: Vec<ViewportRun>,
}

impl GuardReport {
    pub fn passed(&self) -> bool {
        self.runs.iter().all(ViewportRun::passed)
    }

    pub fn violation_count(&self) -> usize {
        self.runs
            .iter()
            .flat_map(|run| &run.steps)
            .map(|step| step.violations.len())
            .sum()
    }

    /// Add a checked step, grouping it under its viewport.
    pub fn push_step(&mut self, viewport: Viewport, outcome: StepOutcome) {
        match self.runs.iter_mut().find(|run| run.viewport == viewport) {
            Some(run) => run.steps.push(outcome),
            None => {
                let mut run = ViewportRun::new(viewport);
                run.steps.push(outcome);
                self.runs.push(run);
            }
        }
    }

    /// Human-readable summary, one line per failing step.
    pub fn summary(&self) -> String {
        let mut out = String::new();
        for run in &self.runs {
            let status = if run.passed() { "ok" } else { "FAILED" };
            out.push_str(&format!(
                "{} ({} steps): {}\n",
                run.viewport,
                run.steps.len(),
                status
            ));
            for step in run.steps.iter().filter(|s| !s.violations.is_empty()) {
                for violation in &step.violations {
                    out.push_str(&format!(
                        "  step {} @ {:.0}px: {}\n",
                        step.step, step.scroll_offset, violation
                    ));
                }
            }
        }
        out
    }
}

/// One captured step as written by the in-app audit, one JSON object per line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditRecord {
    pub step: usize,
    pub snapshot: LayoutSnapshot,
}

impl AuditRecord {
    pub fn write_line<W: Write>(&self, writer: &mut W) -> Result<(), GuardError> {
        let line = serde_json::to_string(self)?;
        writeln!(writer, "{line}")?;
        Ok(())
    }
}

/// Read audit records from JSON lines, skipping blank lines.
pub fn read_records<R: BufRead>(reader: R) -> Result<Vec<AuditRecord>, GuardError> {
    let mut records = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let record = serde_json::from_str(&line).map_err(|source| GuardError::Parse {
            line: index + 1,
            source,
        })?;
        records.push(record);
    }
    Ok(records)
}
