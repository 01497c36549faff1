//! Configuration file resolution and loading
//!
//! Config file resolution follows this priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. User config file (`<config dir>/vamp/config.toml`) if it exists
//! 4. None: caller falls back to built-in defaults

use crate::{Error, Result};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Environment variable naming the config file
pub const CONFIG_ENV_VAR: &str = "VAMP_CONFIG";

/// Resolve which config file to read, if any
pub fn resolve_config_path(cli_arg: Option<&Path>, env_var_name: &str) -> Option<PathBuf> {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return Some(path.to_path_buf());
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(env_var_name) {
        if !path.is_empty() {
            return Some(PathBuf::from(path));
        }
    }

    // Priority 3: User config file
    default_config_file().filter(|path| path.exists())
}

/// Platform config location: `~/.config/vamp/config.toml` on Linux
pub fn default_config_file() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("vamp").join("config.toml"))
}

/// Parse a TOML file into `T`
pub fn load_toml<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        Error::Config(format!("Failed to read {}: {}", path.display(), e))
    })?;
    let value = toml::from_str(&content)?;
    debug!("Loaded configuration from {}", path.display());
    Ok(value)
}

/// Parse a TOML file into `T`, or use `T::default()` when no file is given
///
/// A missing file named explicitly is an error; a missing optional file is not.
pub fn load_toml_or_default<T: DeserializeOwned + Default>(path: Option<&Path>) -> Result<T> {
    match path {
        Some(path) => load_toml(path),
        None => {
            warn!("No config file found, using built-in defaults");
            Ok(T::default())
        }
    }
}
