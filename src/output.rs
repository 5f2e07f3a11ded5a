//! CLI output formatting for scenario runs and checks.
//!
//! # Output Format
//!
//! ## Run
//!
//! ```text
//! nav/mobile-menu.toml: passed
//!     Description: Menu opens on tap and closes on Escape
//!     Steps: 6, ending at 1016 ms
//!     Location: /index.html#services
//!     Digest: 3f9a61c0be42
//! ```
//!
//! Failures follow the header, one per line, tagged with the step number:
//!
//! ```text
//! forms/contact.toml: FAILED (1 failure)
//!     Step 4: `#email` lacks class `is-invalid` (class="form-control")
//! ```
//!
//! ## Check
//!
//! ```text
//! 001 filter.toml passed, unchanged
//! 002 forms/contact.toml FAILED, changed (was 77d0b31a4c55)
//!     Step 4: `#email` lacks class `is-invalid` (class="form-control")
//! 003 modal.toml ERROR: step 1: nothing matches `#cta`
//!
//! 3 scenarios: 1 passed, 1 failed, 1 error
//! Snapshots: 1 unchanged, 1 changed, 0 new (2 total)
//! ```
//!
//! # Architecture
//!
//! Each report has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format functions
//! are pure: no I/O, no side effects.

use crate::check::{CheckEntry, CheckSummary};
use crate::scenario::{ExpectationFailure, ScenarioReport};
use crate::snapshot::SnapshotStatus;

/// Digest characters shown in reports.
const SHORT_DIGEST: usize = 12;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn short_digest(digest: &str) -> &str {
    &digest[..digest.len().min(SHORT_DIGEST)]
}

fn plural(n: usize, one: &str, many: &str) -> String {
    if n == 1 {
        format!("{n} {one}")
    } else {
        format!("{n} {many}")
    }
}

fn verdict(report: &ScenarioReport) -> String {
    if report.passed() {
        "passed".to_string()
    } else {
        format!(
            "FAILED ({})",
            plural(report.failures.len(), "failure", "failures")
        )
    }
}

fn failure_line(failure: &ExpectationFailure) -> String {
    format!("{}Step {}: {}", indent(1), failure.step, failure.message)
}

fn snapshot_label(status: &SnapshotStatus) -> String {
    match status {
        SnapshotStatus::New => "new".to_string(),
        SnapshotStatus::Unchanged => "unchanged".to_string(),
        SnapshotStatus::Changed { previous } => {
            format!("changed (was {})", short_digest(previous))
        }
    }
}

// ============================================================================
// Run
// ============================================================================

/// Format the report of a single `run`.
pub fn format_run_report(report: &ScenarioReport) -> Vec<String> {
    let mut lines = vec![format!("{}: {}", report.name, verdict(report))];
    lines.extend(report.failures.iter().map(failure_line));
    if let Some(description) = &report.description {
        lines.push(format!("{}Description: {}", indent(1), description));
    }
    lines.push(format!(
        "{}Steps: {}, ending at {} ms",
        indent(1),
        report.steps,
        report.final_time_ms
    ));
    lines.push(format!("{}Location: {}", indent(1), report.location));
    lines.push(format!(
        "{}Digest: {}",
        indent(1),
        short_digest(&report.digest)
    ));
    lines
}

pub fn print_run_report(report: &ScenarioReport) {
    for line in format_run_report(report) {
        println!("{}", line);
    }
}

// ============================================================================
// Check
// ============================================================================

/// Format one scenario's line (plus failures) within a check.
pub fn format_check_entry(position: usize, entry: &CheckEntry) -> Vec<String> {
    let header = format!("{} {}", format_index(position), entry.name);
    match &entry.outcome {
        Ok(report) => {
            let mut first = format!("{} {}", header, verdict(report));
            if let Some(status) = &entry.snapshot {
                first.push_str(", ");
                first.push_str(&snapshot_label(status));
            }
            let mut lines = vec![first];
            lines.extend(report.failures.iter().map(failure_line));
            lines
        }
        Err(err) => vec![format!("{} ERROR: {}", header, err)],
    }
}

/// Format the full check output: one block per scenario, then totals.
pub fn format_check_summary(summary: &CheckSummary) -> Vec<String> {
    let mut lines: Vec<String> = summary
        .entries
        .iter()
        .enumerate()
        .flat_map(|(i, entry)| format_check_entry(i + 1, entry))
        .collect();

    if !lines.is_empty() {
        lines.push(String::new());
    }
    lines.push(format!(
        "{}: {} passed, {} failed, {}",
        plural(summary.entries.len(), "scenario", "scenarios"),
        summary.passed(),
        summary.failed(),
        plural(summary.errored(), "error", "errors")
    ));
    lines.push(format!("Snapshots: {}", summary.stats));
    if summary.updated {
        lines.push("Snapshot manifest updated".to_string());
    } else if summary.drifted() > 0 {
        lines.push("Run with --update to accept changed snapshots".to_string());
    }
    lines
}

pub fn print_check_summary(summary: &CheckSummary) {
    for line in format_check_summary(summary) {
        println!("{}", line);
    }
}
