//! Show differences and conflicts without changing anything

use crate::cli::Output;
use crate::diff::ChangeKind;
use crate::sync::SyncContext;
use anyhow::Result;

pub fn execute(ctx: &SyncContext, output: &Output) -> Result<()> {
    let (changes, _, _) = ctx.current_changes()?;

    output.header("Status summary");
    output.summary_stats("local additions", changes.count(ChangeKind::AddedLocal));
    output.summary_stats("mirror additions", changes.count(ChangeKind::AddedMirror));
    output.summary_stats("local changes", changes.count(ChangeKind::LocalOnly));
    output.summary_stats("mirror changes", changes.count(ChangeKind::MirrorOnly));
    output.summary_stats("deleted both sides", changes.count(ChangeKind::Deleted));
    output.summary_stats("conflicts", changes.count(ChangeKind::Conflict));

    if changes.has_conflicts() {
        output.blank_line();
        output.warning("Conflicts (manual resolution required):");
        super::print_conflicts(&changes, output);
        output.info("Resolve the files above, then re-run push.");
    } else {
        output.verbose("no conflicts");
    }

    Ok(())
}
