//! Git collaborator
//!
//! The sync core treats version control as an opaque pair of calls:
//! commit-and-push after a clean copy, and pull-with-rebase. Both shell
//! out to the `git` binary in the repository root and surface stderr on
//! failure. Network retry behavior stays git's problem.

use crate::error::SyncError;
use anyhow::Result;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::debug;

/// Version-control operations the orchestrator depends on
pub trait VersionControl {
    /// Stage everything, commit if anything changed, push to the remote.
    fn commit_and_push(&self, message: &str) -> Result<()>;

    /// Fetch and rebase the repository onto its upstream.
    fn pull_rebase(&self) -> Result<()>;
}

/// `git` subprocess implementation rooted at the mirror repository
pub struct GitCli {
    repo_root: PathBuf,
}

impl GitCli {
    pub fn new(repo_root: &Path) -> Result<Self> {
        which::which("git").map_err(|_| SyncError::VersionControl {
            operation: "startup".to_string(),
            detail: "git binary not found on PATH".to_string(),
        })?;
        Ok(Self {
            repo_root: repo_root.to_path_buf(),
        })
    }

    fn run(&self, args: &[&str]) -> Result<String> {
        debug!(?args, "running git");
        let output = Command::new("git")
            .arg("-C")
            .arg(&self.repo_root)
            .args(args)
            .output()
            .map_err(|e| SyncError::VersionControl {
                operation: args.join(" "),
                detail: e.to_string(),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let stdout = String::from_utf8_lossy(&output.stdout);
            let detail = if stderr.trim().is_empty() {
                stdout.trim().to_string()
            } else {
                stderr.trim().to_string()
            };
            return Err(SyncError::VersionControl {
                operation: args.join(" "),
                detail,
            }
            .into());
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl VersionControl for GitCli {
    fn commit_and_push(&self, message: &str) -> Result<()> {
        let status = self.run(&["status", "--porcelain"])?;
        if status.trim().is_empty() {
            debug!("nothing to commit");
            return Ok(());
        }
        self.run(&["add", "-A"])?;
        self.run(&["commit", "-m", message])?;
        self.run(&["push"])?;
        Ok(())
    }

    fn pull_rebase(&self) -> Result<()> {
        self.run(&["pull", "--rebase"])?;
        Ok(())
    }
}
