//! Persisted CLI configuration.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;

/// Stored CLI configuration.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CliConfig {
    /// Default store URL used when `--store` is not given.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store: Option<String>,

    /// API token sent to network stores.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    /// Path of a JSON schema registry overriding the built-in one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schemas: Option<PathBuf>,
}

/// Get the config file path.
fn config_path() -> Result<PathBuf> {
    let dirs =
        ProjectDirs::from("", "", "kartotek").context("Could not determine config directory")?;

    let config_dir = dirs.config_dir();
    fs::create_dir_all(config_dir).context("Failed to create config directory")?;

    Ok(config_dir.join("config.json"))
}

/// Load the configuration, defaulting when no file exists.
pub fn load() -> Result<CliConfig> {
    let path = config_path()?;

    if !path.exists() {
        return Ok(CliConfig::default());
    }

    let json = fs::read_to_string(&path).context("Failed to read config file")?;
    serde_json::from_str(&json).context("Invalid config file")
}

/// Save the configuration to disk.
pub fn save(config: &CliConfig) -> Result<()> {
    let path = config_path()?;
    let json = serde_json::to_string_pretty(config)?;

    fs::write(&path, &json).context("Failed to write config file")?;

    // The config may hold a token; restrict permissions (Unix only)
    #[cfg(unix)]
    {
        let mut perms = fs::metadata(&path)?.permissions();
        perms.set_mode(0o600);
        fs::set_permissions(&path, perms)?;
    }

    Ok(())
}

/// Remove the stored configuration.
pub fn clear() -> Result<()> {
    let path = config_path()?;

    if path.exists() {
        fs::remove_file(&path).context("Failed to remove config file")?;
    }

    Ok(())
}
