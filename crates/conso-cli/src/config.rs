//! CLI configuration: locating and loading `conso.toml`

use std::path::{Path, PathBuf};

use anyhow::Context;
use conso_core::ValidationConfig;

pub const CONFIG_FILE_NAME: &str = "conso.toml";

/// Per-user configuration file
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("conso").join(CONFIG_FILE_NAME))
}

/// Pick the configuration file: an explicit path, then `conso.toml` in the
/// data directory, then the per-user file. `None` means built-in defaults.
pub fn config_file_path(explicit: Option<&Path>, data_dir: &Path) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    let local = data_dir.join(CONFIG_FILE_NAME);
    if local.exists() {
        return Some(local);
    }
    user_config_path().filter(|path| path.exists())
}

/// Load the configuration, falling back to defaults when no file is found
pub fn load(explicit: Option<&Path>, data_dir: &Path) -> anyhow::Result<ValidationConfig> {
    let Some(path) = config_file_path(explicit, data_dir) else {
        tracing::debug!("No config file found, using defaults");
        return Ok(ValidationConfig::default());
    };
    tracing::debug!("Loading config from {:?}", path);
    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    let config: ValidationConfig = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file {}", path.display()))?;
    Ok(config)
}

/// Write a configuration file with every default spelled out
pub fn save(config: &ValidationConfig, path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let content = toml::to_string_pretty(config)?;
    std::fs::write(path, content)
        .with_context(|| format!("Failed to write config file {}", path.display()))?;
    Ok(())
}
