//! Shared loading and saving for the per-domain config files.
//!
//! Configs are TOML by default. A path ending in `.json` is read as JSON so
//! older `config.json` files keep working.

use anyhow::{Context, Result, bail};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Toml,
    Json,
}

impl ConfigFormat {
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => ConfigFormat::Json,
            _ => ConfigFormat::Toml,
        }
    }
}

pub fn parse_config<T: DeserializeOwned>(contents: &str, format: ConfigFormat) -> Result<T> {
    match format {
        ConfigFormat::Toml => toml::from_str(contents).context("parsing TOML config"),
        ConfigFormat::Json => serde_json::from_str(contents).context("parsing JSON config"),
    }
}

/// Load a config that the user pointed at explicitly; it must exist.
pub fn load_existing<T: DeserializeOwned>(path: &Path) -> Result<T> {
    if !path.exists() {
        bail!("Config file {} does not exist", path.display());
    }
    let contents = fs::read_to_string(path)
        .with_context(|| format!("reading config from {}", path.display()))?;
    parse_config(&contents, ConfigFormat::from_path(path))
        .with_context(|| format!("invalid config {}", path.display()))
}

/// Load a config from its default location, writing the defaults on first use.
pub fn load_or_create<T>(path: &Path) -> Result<T>
where
    T: DeserializeOwned + Serialize + Default,
{
    if !path.exists() {
        let config = T::default();
        save(&config, path)?;
        return Ok(config);
    }
    load_existing(path)
}

pub fn save<T: Serialize>(config: &T, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating config directory {}", parent.display()))?;
    }

    let contents = match ConfigFormat::from_path(path) {
        ConfigFormat::Toml => toml::to_string_pretty(config).context("serializing config")?,
        ConfigFormat::Json => {
            serde_json::to_string_pretty(config).context("serializing config")?
        }
    };
    fs::write(path, contents).with_context(|| format!("writing config to {}", path.display()))?;
    Ok(())
}
