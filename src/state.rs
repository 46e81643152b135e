use std::fs;
use std::path::{Path, PathBuf};

use crate::error::RunError;
use crate::types::Config;

/// Environment variable that overrides the config location.
pub const CONFIG_ENV: &str = "COMMAND_CENTER_CONFIG";

/// Get the canonical config file path (~/.command-center/config.json)
pub fn config_path() -> Result<PathBuf, RunError> {
    if let Ok(custom) = std::env::var(CONFIG_ENV) {
        if !custom.trim().is_empty() {
            return Ok(crate::util::expand_home(custom.trim()));
        }
    }
    let home = dirs::home_dir().ok_or(RunError::NoHomeDir)?;
    Ok(home.join(".command-center").join("config.json"))
}

/// Load configuration, using defaults when no config file exists.
pub fn load_config() -> Result<Config, RunError> {
    load_config_from(&config_path()?)
}

/// Load configuration from an explicit path.
///
/// A missing file yields `Config::default()`; an unreadable or malformed one is an error.
pub fn load_config_from(path: &Path) -> Result<Config, RunError> {
    if !path.exists() {
        log::info!("No config at {}, using defaults", path.display());
        return Ok(Config::default());
    }

    let content = fs::read_to_string(path).map_err(|source| RunError::ConfigRead {
        path: path.to_path_buf(),
        source,
    })?;

    serde_json::from_str(&content).map_err(|source| RunError::ConfigParse {
        path: path.to_path_buf(),
        source,
    })
}
