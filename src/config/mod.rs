//! Configuration management
//!
//! Settings live in `.orcasync/config.json` next to the mirror repository
//! and are auto-created with defaults on first run. Layering is defaults
//! -> JSON file -> `ORCASYNC_*` environment variables, so individual
//! fields can be overridden without editing the file.

use crate::error::SyncError;
use anyhow::{Context, Result};
use figment::providers::{Env, Format, Json, Serialized};
use figment::Figment;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Directory for tool-owned files, relative to the working directory
pub const APP_DIR: &str = ".orcasync";
pub const CONFIG_FILE: &str = "config.json";
pub const STATE_FILE: &str = "state.json";

/// User-editable sync settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Live OrcaSlicer directory on this machine
    pub local_orca_dir: String,

    /// Subdirectory of the OrcaSlicer dir that is actually synced
    pub local_scope_subdir: String,

    /// Folder allow-list inside the scope; everything else is ignored
    pub sync_folders: Vec<String>,

    /// Git-tracked mirror directory, relative to the repo root or absolute
    pub mirror_dir: String,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            local_orca_dir: default_orca_dir(),
            local_scope_subdir: "user/default".to_string(),
            sync_folders: vec![
                "filament".to_string(),
                "machine".to_string(),
                "process".to_string(),
            ],
            mirror_dir: "./profiles".to_string(),
        }
    }
}

/// Best-effort default OrcaSlicer location by OS
fn default_orca_dir() -> String {
    if cfg!(target_os = "macos") {
        "~/Library/Application Support/OrcaSlicer".to_string()
    } else if cfg!(target_os = "windows") {
        "%APPDATA%\\OrcaSlicer".to_string()
    } else {
        "~/.config/OrcaSlicer".to_string()
    }
}

/// Absolute paths for one invocation, resolved once at startup
#[derive(Debug, Clone)]
pub struct ResolvedPaths {
    /// Root OrcaSlicer directory
    pub local_base: PathBuf,
    /// `local_base` joined with the scope subdir; what scans cover
    pub scope: PathBuf,
    /// Git-tracked mirror tree
    pub mirror: PathBuf,
    /// Baseline state file
    pub state: PathBuf,
    /// Config file itself
    pub config: PathBuf,
}

impl SyncConfig {
    /// Load configuration rooted at `repo_root` (the working directory).
    /// Writes a default config file first if none exists.
    pub fn load(repo_root: &Path) -> Result<(Self, ResolvedPaths)> {
        let config_path = repo_root.join(APP_DIR).join(CONFIG_FILE);
        Self::write_defaults_if_missing(&config_path)?;

        let config: SyncConfig = Figment::from(Serialized::defaults(SyncConfig::default()))
            .merge(Json::file(&config_path))
            .merge(Env::prefixed("ORCASYNC_"))
            .extract()
            .map_err(|e| SyncError::Config(format!("{}: {e}", config_path.display())))?;
        config.validate()?;

        let local_base = expand_path(&config.local_orca_dir);
        let scope = local_base.join(&config.local_scope_subdir);
        let mirror_raw = expand_path(&config.mirror_dir);
        let mirror = if mirror_raw.is_absolute() {
            mirror_raw
        } else {
            repo_root.join(&mirror_raw)
        };

        let paths = ResolvedPaths {
            local_base,
            scope,
            mirror,
            state: repo_root.join(APP_DIR).join(STATE_FILE),
            config: config_path,
        };
        debug!(?paths, "configuration resolved");
        Ok((config, paths))
    }

    fn write_defaults_if_missing(config_path: &Path) -> Result<()> {
        if config_path.exists() {
            return Ok(());
        }
        let dir = config_path
            .parent()
            .context("config path has no parent directory")?;
        fs::create_dir_all(dir)
            .map_err(|e| SyncError::Config(format!("cannot create {}: {e}", dir.display())))?;
        let body = serde_json::to_string_pretty(&SyncConfig::default())
            .context("failed to serialize default config")?;
        fs::write(config_path, body + "\n").map_err(|e| {
            SyncError::Config(format!("cannot write {}: {e}", config_path.display()))
        })?;
        debug!(path = %config_path.display(), "wrote default config");
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if self.local_orca_dir.trim().is_empty() {
            return Err(SyncError::Config("local_orca_dir cannot be empty".into()).into());
        }
        if self.mirror_dir.trim().is_empty() {
            return Err(SyncError::Config("mirror_dir cannot be empty".into()).into());
        }
        if self.sync_folders.is_empty() {
            return Err(
                SyncError::Config("sync_folders must list at least one folder".into()).into(),
            );
        }
        Ok(())
    }
}

/// Expand `~`, `$VAR`, and `%VAR%` in a path string.
///
/// `%VAR%` is handled explicitly so Windows-style config strings keep
/// working when the same config file lands on another OS. Unknown
/// variables are left as written.
pub fn expand_path(raw: &str) -> PathBuf {
    let s = expand_vars(raw);
    if let Some(rest) = s.strip_prefix('~') {
        if let Some(home) = dirs::home_dir() {
            let rest = rest.trim_start_matches(['/', '\\']);
            return if rest.is_empty() { home } else { home.join(rest) };
        }
    }
    PathBuf::from(s)
}

fn expand_vars(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut s = raw;
    while let Some(i) = s.find(['%', '$']) {
        out.push_str(&s[..i]);
        let tail = &s[i + 1..];
        if s.as_bytes()[i] == b'%' {
            match tail.find('%') {
                Some(end) => {
                    let name = &tail[..end];
                    match std::env::var(name) {
                        Ok(value) => out.push_str(&value),
                        Err(_) => {
                            out.push('%');
                            out.push_str(name);
                            out.push('%');
                        }
                    }
                    s = &tail[end + 1..];
                }
                None => {
                    out.push('%');
                    s = tail;
                }
            }
        } else {
            let end = tail
                .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
                .unwrap_or(tail.len());
            if end == 0 {
                out.push('$');
                s = tail;
            } else {
                let name = &tail[..end];
                match std::env::var(name) {
                    Ok(value) => out.push_str(&value),
                    Err(_) => {
                        out.push('$');
                        out.push_str(name);
                    }
                }
                s = &tail[end..];
            }
        }
    }
    out.push_str(s);
    out
}
