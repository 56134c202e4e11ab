//! Command-line interface
//!
//! Clap derive structs and dispatch. Every invocation resolves the
//! configuration first and prints where data lives before acting, so
//! the operator always knows which trees a command will touch.

use crate::sync::SyncContext;
use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod output;

pub use output::Output;

/// Git-backed sync for OrcaSlicer profiles
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Enable quiet output (minimal)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Show local/mirror differences and conflicts (read-only)
    Status,
    /// Copy local changes into the mirror, then git commit and push
    Push {
        /// Git commit message
        #[arg(short, long, default_value = "Sync OrcaSlicer profiles")]
        message: String,
    },
    /// Git pull --rebase the mirror repository; local files are untouched
    Pull,
    /// Overwrite the local scope with the mirror contents (destructive)
    Apply {
        /// Also delete local files that are absent from the mirror
        #[arg(long)]
        prune: bool,
    },
    /// Delete every file under the mirror directory (destructive)
    WipeProfiles {
        /// Confirm the wipe; refused without this flag
        #[arg(long)]
        yes: bool,
    },
}

impl Cli {
    /// Execute the parsed command
    pub fn run(self) -> Result<()> {
        let output = Output::new(self.verbose, self.quiet);
        let repo_root = std::env::current_dir()?;
        let ctx = SyncContext::new(&repo_root)?;

        print_locations(&ctx, &output);

        match self.command {
            Commands::Status => commands::status::execute(&ctx, &output),
            Commands::Push { message } => commands::push::execute(&ctx, &message, &output),
            Commands::Pull => commands::pull::execute(&ctx, &output),
            Commands::Apply { prune } => commands::apply::execute(&ctx, prune, &output),
            Commands::WipeProfiles { yes } => commands::wipe::execute(&ctx, yes, &output),
        }
    }
}

/// Print the resolved absolute paths before any command acts.
fn print_locations(ctx: &SyncContext, output: &Output) {
    output.header("Storage locations");
    output.key_value(
        "Local OrcaSlicer dir",
        &ctx.paths.local_base.display().to_string(),
    );
    output.key_value("Synced scope", &ctx.paths.scope.display().to_string());
    output.key_value("Mirror (git-tracked)", &ctx.paths.mirror.display().to_string());
    output.key_value("Baseline state", &ctx.paths.state.display().to_string());
    output.key_value("Config", &ctx.paths.config.display().to_string());
    output.blank_line();
}
