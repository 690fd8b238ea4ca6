//! XDG-style path utilities for the configuration directory.
//!
//! Prefers XDG Base Directory conventions over OS-specific locations, so the
//! config lives in the same place on macOS and Linux.

use anyhow::{Context, Result};
use std::path::PathBuf;

/// Returns the configuration directory for gtrans.
///
/// Resolution order:
/// 1. `$XDG_CONFIG_HOME/gtrans` if `XDG_CONFIG_HOME` is set
/// 2. `~/.config/gtrans` otherwise
pub fn config_dir() -> Result<PathBuf> {
    match std::env::var("XDG_CONFIG_HOME") {
        Ok(xdg) if !xdg.is_empty() => Ok(PathBuf::from(xdg).join("gtrans")),
        _ => Ok(home_dir()?.join(".config").join("gtrans")),
    }
}

fn home_dir() -> Result<PathBuf> {
    dirs::home_dir().context("Failed to determine home directory")
}
