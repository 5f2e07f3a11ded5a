//! Behavior snapshot manifest for regression checks.
//!
//! Every scenario ends with a page in some final state. The `check` command
//! hashes that state and compares it with the digest recorded the last time
//! the manifest was updated, so any change in what a behavior does to the DOM
//! shows up as a changed digest even when the scenario's own expectations
//! still pass.
//!
//! ## Digests
//!
//! A digest is the SHA-256 of the final location (pathname and hash) and the
//! rendered document. Rendering is byte-stable: attributes keep their source
//! and insertion order. Timing does not enter the digest, only the resulting
//! state.
//!
//! ## Storage
//!
//! The manifest is a JSON file at `<scenario_dir>/.behavior-snapshots.json`,
//! keyed by scenario name (the scenario path relative to that directory). It
//! is meant to be committed next to the scenarios.
//!
//! A manifest that is missing, unreadable, or written by another format
//! version loads as empty, which makes every scenario report as new.

use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

/// Name of the snapshot manifest file within the scenario directory.
const MANIFEST_FILENAME: &str = ".behavior-snapshots.json";

/// Version of the manifest format. Bump this when the digest input changes.
const MANIFEST_VERSION: u32 = 1;

/// On-disk manifest mapping scenario names to digests.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SnapshotManifest {
    pub version: u32,
    pub entries: BTreeMap<String, String>,
}

/// How a scenario's digest compares with the recorded one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SnapshotStatus {
    New,
    Unchanged,
    Changed { previous: String },
}

impl SnapshotManifest {
    pub fn empty() -> Self {
        Self {
            version: MANIFEST_VERSION,
            entries: BTreeMap::new(),
        }
    }

    /// Load from the scenario directory. Returns an empty manifest if the
    /// file doesn't exist or can't be parsed.
    pub fn load(dir: &Path) -> Self {
        let Ok(content) = std::fs::read_to_string(manifest_path(dir)) else {
            return Self::empty();
        };
        match serde_json::from_str::<Self>(&content) {
            Ok(manifest) if manifest.version == MANIFEST_VERSION => manifest,
            _ => Self::empty(),
        }
    }

    pub fn save(&self, dir: &Path) -> io::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(manifest_path(dir), json)
    }

    pub fn compare(&self, name: &str, digest: &str) -> SnapshotStatus {
        match self.entries.get(name) {
            None => SnapshotStatus::New,
            Some(previous) if previous == digest => SnapshotStatus::Unchanged,
            Some(previous) => SnapshotStatus::Changed {
                previous: previous.clone(),
            },
        }
    }

    pub fn insert(&mut self, name: String, digest: String) {
        self.entries.insert(name, digest);
    }

    /// Drop entries for scenarios that no longer exist.
    pub fn retain_names<'a>(&mut self, names: impl IntoIterator<Item = &'a str>) {
        let keep: std::collections::HashSet<&str> = names.into_iter().collect();
        self.entries.retain(|name, _| keep.contains(name.as_str()));
    }
}

/// SHA-256 of a final page state, as a hex string.
pub fn digest_state(location: &str, html: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(b"page\0");
    hasher.update(location.as_bytes());
    hasher.update(b"\0");
    hasher.update(html.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Tally of snapshot comparisons for one `check` run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SnapshotStats {
    pub unchanged: u32,
    pub changed: u32,
    pub new: u32,
}

impl SnapshotStats {
    pub fn record(&mut self, status: &SnapshotStatus) {
        match status {
            SnapshotStatus::New => self.new += 1,
            SnapshotStatus::Unchanged => self.unchanged += 1,
            SnapshotStatus::Changed { .. } => self.changed += 1,
        }
    }

    pub fn total(&self) -> u32 {
        self.unchanged + self.changed + self.new
    }
}

impl fmt::Display for SnapshotStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.changed > 0 || self.new > 0 {
            write!(
                f,
                "{} unchanged, {} changed, {} new ({} total)",
                self.unchanged,
                self.changed,
                self.new,
                self.total()
            )
        } else {
            write!(f, "{} unchanged", self.unchanged)
        }
    }
}

/// Resolve the manifest path for a scenario directory.
pub fn manifest_path(dir: &Path) -> PathBuf {
    dir.join(MANIFEST_FILENAME)
}
