//! Sync orchestration
//!
//! `SyncContext` carries the resolved configuration, baseline store, and
//! scan helpers for one invocation; the command modules compose it with
//! the git collaborator. File operations here are the only writers of
//! the local scope and mirror trees.

use crate::config::{ResolvedPaths, SyncConfig};
use crate::diff::{classify, ChangeSet};
use crate::error::SyncError;
use crate::snapshot::{scan_cached, Snapshot};
use crate::state::BaselineStore;
use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// Everything one operation needs, threaded explicitly instead of
/// living in globals
pub struct SyncContext {
    pub config: SyncConfig,
    pub paths: ResolvedPaths,
    pub store: BaselineStore,
}

impl SyncContext {
    /// Build a context rooted at the working directory (the mirror
    /// repository root). Loads or auto-creates the config.
    pub fn new(repo_root: &Path) -> Result<Self> {
        let (config, paths) = SyncConfig::load(repo_root)?;
        let store = BaselineStore::new(paths.state.clone());
        Ok(Self {
            config,
            paths,
            store,
        })
    }

    /// Snapshot of the local scope, allow-list applied. The baseline is
    /// used as an mtime cache; hashes stay authoritative.
    pub fn scan_local(&self, baseline: &Snapshot) -> Result<Snapshot> {
        scan_cached(&self.paths.scope, &self.config.sync_folders, Some(baseline))
    }

    /// Snapshot of the mirror tree, same allow-list.
    pub fn scan_mirror(&self, baseline: &Snapshot) -> Result<Snapshot> {
        scan_cached(&self.paths.mirror, &self.config.sync_folders, Some(baseline))
    }

    /// Classify local and mirror against the stored baseline. Returns the
    /// change set together with both snapshots for later copying.
    pub fn current_changes(&self) -> Result<(ChangeSet, Snapshot, Snapshot)> {
        let baseline = self.store.load()?;
        let local = self.scan_local(&baseline)?;
        let mirror = self.scan_mirror(&baseline)?;
        Ok((classify(&local, &mirror, &baseline), local, mirror))
    }
}

fn fs_err(path: &Path, source: std::io::Error) -> anyhow::Error {
    SyncError::Filesystem {
        path: path.to_path_buf(),
        source,
    }
    .into()
}

/// Copy one relative path between trees, creating parent directories.
pub fn copy_file(src_root: &Path, dst_root: &Path, rel: &str) -> Result<()> {
    let src = src_root.join(rel);
    let dst = dst_root.join(rel);
    if let Some(parent) = dst.parent() {
        fs::create_dir_all(parent).map_err(|e| fs_err(parent, e))?;
    }
    fs::copy(&src, &dst).map_err(|e| fs_err(&src, e))?;
    debug!(rel, "copied");
    Ok(())
}

/// Delete one relative path and prune any parent directories left empty,
/// stopping at `root`.
pub fn remove_file(root: &Path, rel: &str) -> Result<()> {
    let target = root.join(rel);
    if target.exists() {
        fs::remove_file(&target).map_err(|e| fs_err(&target, e))?;
        debug!(rel, "removed");
    }
    let mut parent = target.parent().map(PathBuf::from);
    while let Some(dir) = parent {
        if dir == root || !dir.exists() {
            break;
        }
        // Only empty directories go; rmdir on a non-empty one fails and
        // ends the walk.
        if fs::remove_dir(&dir).is_err() {
            break;
        }
        parent = dir.parent().map(PathBuf::from);
    }
    Ok(())
}

/// Delete every file and subdirectory under `root`, keeping `root`
/// itself. Returns the number of files removed.
pub fn wipe_tree(root: &Path) -> Result<usize> {
    if !root.is_dir() {
        return Ok(0);
    }
    let mut removed = 0;
    for entry in WalkDir::new(root).min_depth(1).contents_first(true) {
        let entry = entry.map_err(|e| {
            fs_err(root, std::io::Error::other(e.to_string()))
        })?;
        let path = entry.path();
        if entry.file_type().is_dir() {
            fs::remove_dir(path).map_err(|e| fs_err(path, e))?;
        } else {
            fs::remove_file(path).map_err(|e| fs_err(path, e))?;
            removed += 1;
        }
    }
    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn copy_creates_parent_directories() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("src");
        let dst = tmp.path().join("dst");
        fs::create_dir_all(src.join("filament/deep")).unwrap();
        fs::write(src.join("filament/deep/a.json"), b"data").unwrap();

        copy_file(&src, &dst, "filament/deep/a.json").unwrap();
        assert_eq!(
            fs::read(dst.join("filament/deep/a.json")).unwrap(),
            b"data"
        );
    }

    #[test]
    fn remove_prunes_empty_parents() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("tree");
        fs::create_dir_all(root.join("machine/x1")).unwrap();
        fs::write(root.join("machine/x1/cfg.json"), b"x").unwrap();

        remove_file(&root, "machine/x1/cfg.json").unwrap();
        assert!(!root.join("machine").exists());
        assert!(root.exists());
    }

    #[test]
    fn remove_keeps_nonempty_parents() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("tree");
        fs::create_dir_all(root.join("machine")).unwrap();
        fs::write(root.join("machine/a.json"), b"a").unwrap();
        fs::write(root.join("machine/b.json"), b"b").unwrap();

        remove_file(&root, "machine/a.json").unwrap();
        assert!(root.join("machine/b.json").exists());
    }

    #[test]
    fn remove_missing_file_is_a_no_op() {
        let tmp = TempDir::new().unwrap();
        remove_file(tmp.path(), "machine/none.json").unwrap();
    }

    #[test]
    fn wipe_empties_the_tree_but_keeps_root() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("mirror");
        fs::create_dir_all(root.join("filament/sub")).unwrap();
        fs::write(root.join("filament/a.json"), b"a").unwrap();
        fs::write(root.join("filament/sub/b.json"), b"b").unwrap();

        let removed = wipe_tree(&root).unwrap();
        assert_eq!(removed, 2);
        assert!(root.exists());
        assert_eq!(fs::read_dir(&root).unwrap().count(), 0);
    }

    #[test]
    fn wipe_missing_root_is_a_no_op() {
        let tmp = TempDir::new().unwrap();
        assert_eq!(wipe_tree(&tmp.path().join("none")).unwrap(), 0);
    }
}
