//! Centralized path resolution for nova
//!
//! # Environment Variables
//!
//! - `NOVA_CONFIG_DIR` - Override config directory (e.g., `~/dotfiles/nova`)
//! - `NOVA_LOG_DIR` - Override where run transcripts are written
//!
//! # Path Resolution Priority
//!
//! For config_dir():
//! 1. `NOVA_CONFIG_DIR` environment variable
//! 2. `XDG_CONFIG_HOME/nova` (if set)
//! 3. `~/.config/nova`
//!
//! For log_dir():
//! 1. `NOVA_LOG_DIR` environment variable
//! 2. `XDG_STATE_HOME/nova/logs` (if set)
//! 3. `~/.local/state/nova/logs`

use anyhow::{Context, Result};
use std::path::PathBuf;

/// Environment variable for config directory override
pub const ENV_CONFIG_DIR: &str = "NOVA_CONFIG_DIR";

/// Environment variable for transcript directory override
pub const ENV_LOG_DIR: &str = "NOVA_LOG_DIR";

/// Get the nova config directory path
pub fn config_dir() -> Result<PathBuf> {
    config_dir_with(|key| std::env::var(key).ok())
}

/// Get the directory run transcripts are appended to
pub fn log_dir() -> Result<PathBuf> {
    log_dir_with(|key| std::env::var(key).ok())
}

fn config_dir_with(env: impl Fn(&str) -> Option<String>) -> Result<PathBuf> {
    if let Some(dir) = env(ENV_CONFIG_DIR) {
        let path = expand(&dir);
        log::debug!("Using config dir from {}: {}", ENV_CONFIG_DIR, path.display());
        return Ok(path);
    }

    if let Some(xdg_config) = env("XDG_CONFIG_HOME") {
        let path = PathBuf::from(xdg_config).join("nova");
        log::debug!("Using XDG_CONFIG_HOME: {}", path.display());
        return Ok(path);
    }

    let home = dirs::home_dir().context("Could not determine home directory")?;
    let path = home.join(".config").join("nova");
    log::debug!("Using default config dir: {}", path.display());
    Ok(path)
}

fn log_dir_with(env: impl Fn(&str) -> Option<String>) -> Result<PathBuf> {
    if let Some(dir) = env(ENV_LOG_DIR) {
        let path = expand(&dir);
        log::debug!("Using log dir from {}: {}", ENV_LOG_DIR, path.display());
        return Ok(path);
    }

    if let Some(xdg_state) = env("XDG_STATE_HOME") {
        return Ok(PathBuf::from(xdg_state).join("nova").join("logs"));
    }

    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home.join(".local").join("state").join("nova").join("logs"))
}

/// Expand ~ and environment variables in a path string.
///
/// All config paths go through here instead of calling shellexpand directly.
pub fn expand(path: &str) -> PathBuf {
    let expanded = shellexpand::full(path).unwrap_or(std::borrow::Cow::Borrowed(path));
    PathBuf::from(expanded.as_ref())
}

// ============================================================================
// Tests
// ============================================================================
