//! Delete every file under the mirror directory
//!
//! Refused without `--yes`. The local scope and the baseline are never
//! touched; to re-seed the mirror from local afterwards, delete the
//! baseline state file so push sees every local file as an addition.

use crate::cli::Output;
use crate::sync::{self, SyncContext};
use anyhow::{bail, Result};

pub fn execute(ctx: &SyncContext, yes: bool, output: &Output) -> Result<()> {
    if !yes {
        bail!("wipe-profiles deletes every file in the mirror; pass --yes to confirm");
    }

    let removed = sync::wipe_tree(&ctx.paths.mirror)?;
    output.success(&format!(
        "Wiped {} file(s) from {}.",
        removed,
        ctx.paths.mirror.display()
    ));
    output.info(&format!(
        "Baseline left at {}; delete it before the next push to re-seed the mirror from local.",
        ctx.paths.state.display()
    ));
    Ok(())
}
