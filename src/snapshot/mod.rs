//! Snapshot engine
//!
//! Walks the allow-listed subfolders of a tree and produces a
//! content-fingerprint map. All comparison logic lives in `diff`; this
//! module is the only place that reads file contents.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::fs::File;
use std::io;
use std::path::Path;
use std::time::UNIX_EPOCH;
use tracing::debug;
use walkdir::WalkDir;

/// Content fingerprint of one regular file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileFingerprint {
    pub hash: String,
    pub size: u64,
    pub mtime: u64,
}

/// Relative posix path -> fingerprint, for files under the allow-listed
/// folders only. BTreeMap keeps iteration and serialization deterministic.
pub type Snapshot = BTreeMap<String, FileFingerprint>;

/// Scan `root`, restricted to the named subfolders.
///
/// A missing root or subfolder contributes nothing; two scans of an
/// unchanged tree produce identical snapshots.
pub fn scan(root: &Path, folders: &[String]) -> Result<Snapshot> {
    scan_cached(root, folders, None)
}

/// Like [`scan`], but reuses hashes from `prior` for files whose size and
/// mtime are unchanged. The stored hash is still what classification
/// compares; the cache only skips re-digesting unmodified content.
pub fn scan_cached(root: &Path, folders: &[String], prior: Option<&Snapshot>) -> Result<Snapshot> {
    let mut snapshot = Snapshot::new();
    if !root.is_dir() {
        debug!(root = %root.display(), "scan root missing, returning empty snapshot");
        return Ok(snapshot);
    }

    for folder in folders {
        let base = root.join(folder);
        if !base.is_dir() {
            continue;
        }

        for entry in WalkDir::new(&base).follow_links(false) {
            let entry = entry.with_context(|| format!("failed to walk {}", base.display()))?;
            // file_type() is the symlink-free type here; symlinks and
            // other non-regular entries are skipped.
            if !entry.file_type().is_file() {
                continue;
            }

            let rel = relative_posix(root, entry.path())
                .with_context(|| format!("path escapes scan root: {}", entry.path().display()))?;

            let meta = entry
                .metadata()
                .with_context(|| format!("failed to stat {}", entry.path().display()))?;
            let size = meta.len();
            let mtime = meta
                .modified()
                .ok()
                .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
                .map(|d| d.as_secs())
                .unwrap_or(0);

            let hash = match prior.and_then(|p| p.get(&rel)) {
                Some(cached) if cached.size == size && cached.mtime == mtime && mtime != 0 => {
                    cached.hash.clone()
                }
                _ => hash_file(entry.path())?,
            };

            snapshot.insert(rel, FileFingerprint { hash, size, mtime });
        }
    }

    debug!(root = %root.display(), files = snapshot.len(), "scan complete");
    Ok(snapshot)
}

/// Streaming sha256 of one file, hex-encoded.
pub fn hash_file(path: &Path) -> Result<String> {
    let mut file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    let mut hasher = Sha256::new();
    io::copy(&mut file, &mut hasher)
        .with_context(|| format!("failed to read {}", path.display()))?;
    Ok(hex::encode(hasher.finalize()))
}

/// Path relative to `root`, with forward slashes so local and mirror keys
/// compare equal across platforms.
fn relative_posix(root: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    let parts: Vec<&str> = rel
        .components()
        .map(|c| c.as_os_str().to_str())
        .collect::<Option<_>>()?;
    Some(parts.join("/"))
}
