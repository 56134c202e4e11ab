//! Baseline store
//!
//! Persists the last-synced snapshot under `.orcasync/state.json`. Saves
//! go through a temp file plus rename so a crash mid-write leaves the
//! previous baseline intact.

use crate::snapshot::Snapshot;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::PathBuf;
use tempfile::NamedTempFile;
use tracing::debug;

const STATE_VERSION: u32 = 1;

#[derive(Serialize, Deserialize)]
struct StateFile {
    version: u32,
    files: Snapshot,
}

/// Owner of the persisted baseline snapshot
pub struct BaselineStore {
    path: PathBuf,
}

impl BaselineStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Load the baseline; an absent state file means "never synced" and
    /// yields an empty snapshot. A corrupt state file is an error, not a
    /// silent reset.
    pub fn load(&self) -> Result<Snapshot> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "no baseline state file");
            return Ok(Snapshot::new());
        }
        let raw = fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read baseline state {}", self.path.display()))?;
        let state: StateFile = serde_json::from_str(&raw)
            .with_context(|| format!("invalid baseline state {}", self.path.display()))?;
        Ok(state.files)
    }

    /// Atomically replace the baseline. Either the new snapshot is fully
    /// written or the old one survives untouched.
    pub fn save(&self, snapshot: &Snapshot) -> Result<()> {
        let dir = self
            .path
            .parent()
            .context("baseline state path has no parent directory")?;
        fs::create_dir_all(dir).with_context(|| format!("failed to create {}", dir.display()))?;

        let state = StateFile {
            version: STATE_VERSION,
            files: snapshot.clone(),
        };
        let mut tmp = NamedTempFile::new_in(dir)
            .with_context(|| format!("failed to create temp file in {}", dir.display()))?;
        serde_json::to_writer_pretty(&mut tmp, &state).context("failed to serialize baseline")?;
        tmp.write_all(b"\n")?;
        tmp.persist(&self.path)
            .with_context(|| format!("failed to replace {}", self.path.display()))?;

        debug!(path = %self.path.display(), files = snapshot.len(), "baseline saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::FileFingerprint;
    use tempfile::TempDir;

    fn sample() -> Snapshot {
        let mut snap = Snapshot::new();
        snap.insert(
            "filament/pla.json".into(),
            FileFingerprint {
                hash: "abc123".into(),
                size: 42,
                mtime: 1_700_000_000,
            },
        );
        snap
    }

    #[test]
    fn missing_state_file_loads_empty() {
        let tmp = TempDir::new().unwrap();
        let store = BaselineStore::new(tmp.path().join(".orcasync/state.json"));
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn save_then_load_round_trips() {
        let tmp = TempDir::new().unwrap();
        let store = BaselineStore::new(tmp.path().join(".orcasync/state.json"));
        store.save(&sample()).unwrap();
        assert_eq!(store.load().unwrap(), sample());
    }

    #[test]
    fn save_replaces_prior_state_completely() {
        let tmp = TempDir::new().unwrap();
        let store = BaselineStore::new(tmp.path().join(".orcasync/state.json"));
        store.save(&sample()).unwrap();
        store.save(&Snapshot::new()).unwrap();
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn save_leaves_no_stray_temp_files() {
        let tmp = TempDir::new().unwrap();
        let store = BaselineStore::new(tmp.path().join(".orcasync/state.json"));
        store.save(&sample()).unwrap();
        let entries: Vec<_> = std::fs::read_dir(tmp.path().join(".orcasync"))
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(entries, vec![std::ffi::OsString::from("state.json")]);
    }

    #[test]
    fn corrupt_state_file_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(".orcasync/state.json");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "not json").unwrap();
        assert!(BaselineStore::new(path).load().is_err());
    }
}
