//! Overwrite the local scope with the mirror contents
//!
//! Directional and unconditional: every mirror file replaces its local
//! counterpart, no conflict check. With `--prune`, local files absent
//! from the mirror are deleted too. Destructive by design; the mirror
//! wins.

use crate::cli::Output;
use crate::sync::{self, SyncContext};
use anyhow::Result;

pub fn execute(ctx: &SyncContext, prune: bool, output: &Output) -> Result<()> {
    let baseline = ctx.store.load()?;
    let mirror = ctx.scan_mirror(&baseline)?;
    let local = ctx.scan_local(&baseline)?;

    let to_remove: Vec<&String> = if prune {
        local.keys().filter(|rel| !mirror.contains_key(*rel)).collect()
    } else {
        Vec::new()
    };

    let total = mirror.len() + to_remove.len();
    let mut done = 0usize;
    let mut run_batch = || -> Result<()> {
        for rel in mirror.keys() {
            sync::copy_file(&ctx.paths.mirror, &ctx.paths.scope, rel)?;
            output.verbose(&format!("applied {rel}"));
            done += 1;
        }
        for rel in &to_remove {
            sync::remove_file(&ctx.paths.scope, rel)?;
            output.verbose(&format!("pruned {rel}"));
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

    // Baseline follows what actually landed in the local scope.
    let applied = ctx.scan_local(&mirror)?;
    ctx.store.save(&applied)?;

    output.success(&format!(
        "Applied {} mirror file(s) to the local scope{}.",
        mirror.len(),
        if prune {
            format!(", pruned {}", to_remove.len())
        } else {
            String::new()
        }
    ));
    Ok(())
}
