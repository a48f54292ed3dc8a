//! TOML configuration file I/O
//!
//! An optional `config.toml` in the user's configuration directory can
//! carry the non-secret settings so they need not live in the shell
//! environment. The master password is never read from this file.

use crate::config::ENV_CONFIG_DIR;
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Default configuration file name
const CONFIG_FILE_NAME: &str = "config.toml";

/// Settings accepted in `config.toml`; every field is optional
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub item_id: Option<String>,
    pub secret_field: Option<String>,
    pub mfa_serial: Option<String>,
    pub profile: Option<String>,
    pub duration_seconds: Option<i32>,
    pub cache_file: Option<PathBuf>,
    pub bw_binary: Option<String>,
}

/// Get the configuration directory
///
/// Returns `$BWSTS_CONFIG_DIR` if set, otherwise `~/.config/bwsts`.
/// `None` when neither that variable nor `HOME` is available.
pub fn get_config_dir<F>(lookup: &F) -> Option<PathBuf>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(dir) = lookup(ENV_CONFIG_DIR) {
        return Some(PathBuf::from(dir));
    }

    lookup("HOME").map(|home| PathBuf::from(home).join(".config").join("bwsts"))
}

/// Load `config.toml` from the configuration directory, if there is one
pub fn load_file_config<F>(lookup: &F) -> Result<FileConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match get_config_dir(lookup) {
        Some(dir) => load_file_config_from_path(dir.join(CONFIG_FILE_NAME)),
        None => Ok(FileConfig::default()),
    }
}

/// Load settings from a specific TOML file
///
/// A missing file yields the empty configuration; a present but unreadable
/// or invalid file is an error.
pub fn load_file_config_from_path<P: AsRef<Path>>(path: P) -> Result<FileConfig, ConfigError> {
    let path = path.as_ref();
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!("No config file at {}", path.display());
            return Ok(FileConfig::default());
        }
        Err(e) => {
            return Err(ConfigError::LoadFailed {
                path: path.to_string_lossy().to_string(),
                message: e.to_string(),
            })
        }
    };

    let config: FileConfig = toml::from_str(&contents).map_err(|e| ConfigError::LoadFailed {
        path: path.to_string_lossy().to_string(),
        message: e.to_string(),
    })?;

    debug!("Loaded config file {}", path.display());
    Ok(config)
}
