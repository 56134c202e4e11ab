//! Copy local changes into the mirror, then commit and push
//!
//! Aborts before touching anything if conflicts exist. The baseline only
//! advances after the git step succeeds; a failed push leaves the copies
//! on disk and the old baseline in place, and the next run reclassifies
//! from the real file states.

use crate::cli::Output;
use crate::diff::ChangeKind;
use crate::error::SyncError;
use crate::git::{GitCli, VersionControl};
use crate::sync::{self, SyncContext};
use anyhow::Result;
use std::fs;

pub fn execute(ctx: &SyncContext, message: &str, output: &Output) -> Result<()> {
    if !ctx.paths.scope.is_dir() {
        return Err(SyncError::Config(format!(
            "local scope directory does not exist: {}",
            ctx.paths.scope.display()
        ))
        .into());
    }
    let git = GitCli::new(&ctx.paths.mirror)?;

    let (changes, local, _) = ctx.current_changes()?;

    if changes.has_conflicts() {
        output.error("Push blocked due to conflicts:");
        super::print_conflicts(&changes, output);
        output.info("Resolve manually, then re-run push.");
        return Err(SyncError::Conflicts {
            paths: changes.conflicts().iter().map(|s| s.to_string()).collect(),
        }
        .into());
    }

    // Local is truth for paths local changed or added; mirror-side edits
    // stay put until a pull/apply brings them here.
    let mut to_copy: Vec<&str> = changes.paths_with(ChangeKind::AddedLocal);
    let mut to_remove: Vec<&str> = Vec::new();
    for rel in changes.paths_with(ChangeKind::LocalOnly) {
        if local.contains_key(rel) {
            to_copy.push(rel);
        } else {
            to_remove.push(rel);
        }
    }
    to_copy.sort_unstable();

    if to_copy.is_empty() && to_remove.is_empty() {
        output.info("Nothing to push; local scope matches the baseline.");
    }

    fs::create_dir_all(&ctx.paths.mirror).map_err(|e| SyncError::Filesystem {
        path: ctx.paths.mirror.clone(),
        source: e,
    })?;

    let total = to_copy.len() + to_remove.len();
    let mut done = 0usize;
    let mut run_batch = || -> Result<()> {
        for rel in &to_copy {
            sync::copy_file(&ctx.paths.scope, &ctx.paths.mirror, rel)?;
            output.verbose(&format!("copied {rel}"));
            done += 1;
        }
        for rel in &to_remove {
            sync::remove_file(&ctx.paths.mirror, rel)?;
            output.verbose(&format!("removed {rel}"));
            done += 1;
        }
        Ok(())
    };
    if let Err(e) = run_batch() {
        output.error(&format!(
            "Aborted after {done} of {total} file operation(s); baseline unchanged."
        ));
        return Err(e);
    }
    output.step(&format!("Mirrored {total} file operation(s)."));

    if let Err(e) = git.commit_and_push(message) {
        output.error("Git commit/push failed; copied files remain in the mirror.");
        output.info("Baseline not advanced; fix the git issue and re-run push.");
        return Err(e);
    }

    // Baseline becomes the mirror as it is now on disk.
    let baseline = ctx.store.load()?;
    let new_mirror = ctx.scan_mirror(&baseline)?;
    ctx.store.save(&new_mirror)?;

    output.success("Pushed to remote and updated the baseline.");
    Ok(())
}
