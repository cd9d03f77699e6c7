//! Centralized path management for fitclass

use anyhow::{Context, Result};
use std::path::PathBuf;

/// Get the fitclass config directory, creating it if necessary
pub fn fitclass_config_dir() -> Result<PathBuf> {
    let config_dir = dirs::config_dir()
        .context("Unable to determine user config directory")?
        .join("fitclass");

    std::fs::create_dir_all(&config_dir)
        .with_context(|| format!("creating config directory at {}", config_dir.display()))?;

    Ok(config_dir)
}

pub fn class_config_path() -> Result<PathBuf> {
    Ok(fitclass_config_dir()?.join("class.toml"))
}

pub fn workouts_config_path() -> Result<PathBuf> {
    Ok(fitclass_config_dir()?.join("workouts.toml"))
}
