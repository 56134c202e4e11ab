//! Error taxonomy for sync operations
//!
//! Errors are carried inside the anyhow chain so commands can add context
//! freely; `main` downcasts to `SyncError` to pick the process exit code.

use std::path::PathBuf;
use thiserror::Error;

/// Classified failure modes of a sync invocation
#[derive(Debug, Error)]
pub enum SyncError {
    /// Missing or invalid configuration; nothing has been mutated yet
    #[error("configuration error: {0}")]
    Config(String),

    /// Push aborted because divergent edits exist on both sides
    #[error("{count} conflicting file(s); resolve manually, then re-run push", count = .paths.len())]
    Conflicts { paths: Vec<String> },

    /// IO failure mid-batch; the baseline has not been advanced
    #[error("filesystem error at {}: {source}", .path.display())]
    Filesystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// External git call failed; on-disk copies are preserved
    #[error("git {operation} failed: {detail}")]
    VersionControl { operation: String, detail: String },
}

impl SyncError {
    /// Process exit code for this failure class
    pub fn exit_code(&self) -> u8 {
        match self {
            SyncError::Config(_) => 2,
            SyncError::Conflicts { .. } => 1,
            SyncError::Filesystem { .. } => 3,
            SyncError::VersionControl { .. } => 4,
        }
    }
}
