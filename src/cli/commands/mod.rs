//! Command implementations
//!
//! One module per sync operation; each composes the context, the change
//! classification, and the git collaborator.

pub mod apply;
pub mod pull;
pub mod push;
pub mod status;
pub mod wipe;

use crate::cli::Output;
use crate::diff::ChangeSet;

/// How many conflicting paths to list before truncating.
const CONFLICT_LIST_CAP: usize = 25;

/// Print the conflict list with a capped tail.
pub(crate) fn print_conflicts(changes: &ChangeSet, output: &Output) {
    let conflicts = changes.conflicts();
    for rel in conflicts.iter().take(CONFLICT_LIST_CAP) {
        output.list_item(rel);
    }
    if conflicts.len() > CONFLICT_LIST_CAP {
        output.list_item(&format!("... and {} more", conflicts.len() - CONFLICT_LIST_CAP));
    }
}
