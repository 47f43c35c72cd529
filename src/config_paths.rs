//! Where dockwork keeps its files
//!
//! One directory holds `style.yaml` and the `logs/` folder:
//! `$XDG_CONFIG_HOME/dockwork`, else `~/.config/dockwork`
//! (`%APPDATA%\dockwork` on Windows).

use std::path::PathBuf;

use anyhow::{Context, Result};

const APP_DIR: &str = "dockwork";

pub fn config_dir() -> Option<PathBuf> {
    let base = if cfg!(target_os = "windows") {
        std::env::var_os("APPDATA").map(PathBuf::from)
    } else {
        std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| dirs::home_dir().map(|h| h.join(".config")))
    };
    base.map(|dir| dir.join(APP_DIR))
}

/// Style read by [`crate::DockStyle::load`]
pub fn style_file() -> Option<PathBuf> {
    Some(config_dir()?.join("style.yaml"))
}

/// Log folder used by [`crate::tracing::init`], created on demand
pub fn ensure_logs_dir() -> Result<PathBuf> {
    let logs = config_dir()
        .context("No config directory available")?
        .join("logs");
    std::fs::create_dir_all(&logs)
        .with_context(|| format!("Failed to create log directory {}", logs.display()))?;
    Ok(logs)
}
