//! Run a directory of scenarios and compare their digests with the manifest.
//!
//! Scenarios are independent, so they run in parallel with
//! [rayon](https://docs.rs/rayon). Each worker resolves its own cascaded
//! config and builds its own page; only the resulting [`ScenarioReport`]s
//! cross threads. Results keep discovery order.
//!
//! A check succeeds when every scenario ran, every expectation held, and no
//! recorded digest changed. With `update`, the manifest is rewritten from
//! this run (stale names dropped) and digest changes are accepted.

use crate::config;
use crate::scenario::{self, ScenarioError, ScenarioReport};
use crate::snapshot::{SnapshotManifest, SnapshotStats, SnapshotStatus};
use rayon::prelude::*;
use std::path::Path;

/// One scenario's result within a check.
#[derive(Debug)]
pub struct CheckEntry {
    pub name: String,
    pub outcome: Result<ScenarioReport, ScenarioError>,
    /// `None` when the scenario could not run.
    pub snapshot: Option<SnapshotStatus>,
}

#[derive(Debug, Default)]
pub struct CheckSummary {
    pub entries: Vec<CheckEntry>,
    pub stats: SnapshotStats,
    pub updated: bool,
}

impl CheckSummary {
    pub fn passed(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| e.outcome.as_ref().is_ok_and(ScenarioReport::passed))
            .count()
    }

    pub fn failed(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| e.outcome.as_ref().is_ok_and(|r| !r.passed()))
            .count()
    }

    pub fn errored(&self) -> usize {
        self.entries.iter().filter(|e| e.outcome.is_err()).count()
    }

    /// Digests that changed and were not accepted with `update`.
    pub fn drifted(&self) -> u32 {
        if self.updated { 0 } else { self.stats.changed }
    }

    pub fn is_success(&self) -> bool {
        self.failed() == 0 && self.errored() == 0 && self.drifted() == 0
    }
}

/// Discover, run, and compare every scenario under `dir`.
pub fn check_directory(dir: &Path, update: bool) -> Result<CheckSummary, ScenarioError> {
    let files = scenario::discover_scenarios(dir)?;
    tracing::info!(dir = %dir.display(), scenarios = files.len(), "checking scenarios");

    let outcomes: Vec<(String, Result<ScenarioReport, ScenarioError>)> = files
        .par_iter()
        .map(|path| {
            let name = scenario::scenario_name(dir, path);
            let scenario_dir = path.parent().unwrap_or(dir);
            let outcome = config::load_cascaded_config(dir, scenario_dir)
                .map_err(ScenarioError::from)
                .and_then(|config| scenario::run_file(path, &config, &name));
            (name, outcome)
        })
        .collect();

    Ok(compare_with_manifest(dir, outcomes, update)?)
}

fn compare_with_manifest(
    dir: &Path,
    outcomes: Vec<(String, Result<ScenarioReport, ScenarioError>)>,
    update: bool,
) -> std::io::Result<CheckSummary> {
    let mut manifest = SnapshotManifest::load(dir);
    let mut summary = CheckSummary {
        updated: update,
        ..CheckSummary::default()
    };

    for (name, outcome) in outcomes {
        let snapshot = match &outcome {
            Ok(report) => {
                let status = manifest.compare(&name, &report.digest);
                summary.stats.record(&status);
                if let SnapshotStatus::Changed { .. } = status {
                    tracing::warn!(scenario = %name, "snapshot digest changed");
                }
                Some(status)
            }
            Err(err) => {
                tracing::warn!(scenario = %name, error = %err, "scenario could not run");
                None
            }
        };
        summary.entries.push(CheckEntry {
            name,
            outcome,
            snapshot,
        });
    }

    if update {
        for entry in &summary.entries {
            if let Ok(report) = &entry.outcome {
                manifest.insert(entry.name.clone(), report.digest.clone());
            }
        }
        manifest.retain_names(summary.entries.iter().map(|e| e.name.as_str()));
        manifest.save(dir)?;
    }
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn report(name: &str, digest: &str, failed: bool) -> ScenarioReport {
        let failures = if failed {
            vec![scenario::ExpectationFailure {
                step: 1,
                message: "nope".into(),
            }]
        } else {
            Vec::new()
        };
        ScenarioReport {
            name: name.into(),
            description: None,
            steps: 1,
            failures,
            final_time_ms: 0,
            location: "/".into(),
            html: String::new(),
            digest: digest.into(),
        }
    }

    fn outcome(
        name: &str,
        digest: &str,
        failed: bool,
    ) -> (String, Result<ScenarioReport, ScenarioError>) {
        (name.to_string(), Ok(report(name, digest, failed)))
    }

    #[test]
    fn summary_counts_each_outcome() {
        let tmp = TempDir::new().unwrap();
        let outcomes = vec![
            outcome("a.toml", "aaa", false),
            outcome("b.toml", "bbb", true),
            (
                "c.toml".to_string(),
                Err(ScenarioError::TargetNotFound {
                    step: 2,
                    selector: "#gone".into(),
                }),
            ),
        ];
        let summary = compare_with_manifest(tmp.path(), outcomes, false).unwrap();

        assert_eq!(summary.passed(), 1);
        assert_eq!(summary.failed(), 1);
        assert_eq!(summary.errored(), 1);
        assert_eq!(summary.stats.new, 2);
        assert!(summary.entries[2].snapshot.is_none());
        assert!(!summary.is_success());
    }

    #[test]
    fn changed_digest_counts_as_drift_unless_updating() {
        let tmp = TempDir::new().unwrap();
        compare_with_manifest(tmp.path(), vec![outcome("a.toml", "old", false)], true).unwrap();

        let drifted =
            compare_with_manifest(tmp.path(), vec![outcome("a.toml", "new", false)], false)
                .unwrap();
        assert_eq!(drifted.drifted(), 1);
        assert!(!drifted.is_success());
        assert_eq!(
            drifted.entries[0].snapshot,
            Some(SnapshotStatus::Changed {
                previous: "old".into()
            })
        );

        let accepted =
            compare_with_manifest(tmp.path(), vec![outcome("a.toml", "new", false)], true)
                .unwrap();
        assert_eq!(accepted.drifted(), 0);
        assert!(accepted.is_success());
        assert_eq!(SnapshotManifest::load(tmp.path()).entries["a.toml"], "new");
    }

    #[test]
    fn failed_runs_are_still_recorded_on_update() {
        let tmp = TempDir::new().unwrap();
        compare_with_manifest(tmp.path(), vec![outcome("a.toml", "d1", true)], true).unwrap();
        let manifest = SnapshotManifest::load(tmp.path());
        assert_eq!(manifest.entries.get("a.toml").map(String::as_str), Some("d1"));
    }
}
