//! Rebase the mirror repository onto its remote
//!
//! Pull only moves the git-tracked mirror; local scope files and the
//! baseline are untouched. The next status or push re-snapshots the
//! mirror and reconciles from there.

use crate::cli::Output;
use crate::git::{GitCli, VersionControl};
use crate::sync::SyncContext;
use anyhow::Result;

pub fn execute(ctx: &SyncContext, output: &Output) -> Result<()> {
    let git = GitCli::new(&ctx.paths.mirror)?;
    git.pull_rebase()?;
    output.success("Mirror updated from remote (git pull --rebase).");
    output.info("Run `orcasync status` to review changes, or `orcasync apply` to adopt them locally.");
    Ok(())
}
