/// Validates recorded layout audit files (JSON lines written by the showcase engine).
use indicatif::{ProgressBar, ProgressStyle};
use layout_guard::report::read_records;
use layout_guard::{AuditRecord, GuardReport, GuardThresholds, StepOutcome, check_snapshot};
use rayon::prelude::*;
use std::env;
use std::fs::File;
use std::io::BufReader;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} <layout_audit.jsonl>...", args[0]);
        std::process::exit(2);
    }

    let mut records: Vec<AuditRecord> = Vec::new();
    for path in &args[1..] {
        let file = File::open(path)?;
        let loaded = read_records(BufReader::new(file))?;
        println!("Loaded {} audit records from {}", loaded.len(), path);
        records.extend(loaded);
    }

    let report = check_records(&records, &GuardThresholds::default());
    print!("{}", report.summary());

    if report.passed() {
        println!("Layout stable across {} viewports", report.runs.len());
        Ok(())
    } else {
        eprintln!("{} layout violations found", report.violation_count());
        std::process::exit(1);
    }
}

fn check_records(records: &[AuditRecord], thresholds: &GuardThresholds) -> GuardReport {
    let pb = ProgressBar::new(records.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{bar:40.green/blue}] {pos}/{len} snapshots ({percent}%) {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▉▊▋▌▍▎▏"),
    );
    pb.set_message("Checking layout");

    let outcomes: Vec<_> = records
        .par_iter()
        .map(|record| {
            let outcome = StepOutcome {
                step: record.step,
                scroll_offset: record.snapshot.scroll_offset,
                violations: check_snapshot(&record.snapshot, thresholds),
            };
            pb.inc(1);
            (record.snapshot.viewport, outcome)
        })
        .collect();

    pb.finish_with_message("Layout checked");

    let mut report = GuardReport::default();
    for (viewport, outcome) in outcomes {
        report.push_step(viewport, outcome);
    }
    report
}
