//! Layout Stability Guard.
//!
//! Verifies, from the outside, that scrolling the showcase never produces a
//! visually broken frame: no horizontal overflow, no visible text clipped off
//! the sides of the viewport, no transition mask stuck above a small opacity,
//! and no script, console or network errors along the way.
//!
//! The guard treats the page as a black box. A [`PageDriver`] opens the page
//! at a viewport, feeds it wheel steps and hands back [`LayoutSnapshot`]s;
//! [`check_snapshot`] evaluates the invariants on each one. Recorded audit
//! files (one [`AuditRecord`] per JSON line) can be validated offline with
//! the `layout-guard` binary.

/// Invariant checks over a single snapshot.
pub mod checks;

/// Guard error type.
pub mod error;

/// Per-viewport results and audit record (JSON lines) I/O.
pub mod report;

/// Scroll scenario description and the driver loop.
pub mod scenario;

/// Captured page state.
pub mod snapshot;

pub use checks::{GuardThresholds, Violation, check_snapshot};
pub use error::GuardError;
pub use report::{AuditRecord, GuardReport, StepOutcome, ViewportRun};
pub use scenario::{PageDriver, ScenarioStep, ScrollScenario, run_scenario};
pub use snapshot::{ConsoleEntry, ConsoleLevel, LayoutSnapshot, RequestRecord, TextBox, Viewport};
