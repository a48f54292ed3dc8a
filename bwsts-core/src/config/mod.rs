//! Configuration module
//!
//! Builds the single [`Config`] value the pipeline runs with. Sources, lowest
//! precedence first: optional `config.toml`, a `.env` file in the working
//! directory, the process environment.

use crate::error::ConfigError;
use crate::types::MasterPassword;
use std::path::PathBuf;
use tracing::debug;

pub mod toml_config;

pub use toml_config::FileConfig;

pub const ENV_ITEM_ID: &str = "BW_ITEM_ID";
pub const ENV_SECRET_FIELD: &str = "BW_MFA_SECRET_KEY_NAME";
pub const ENV_MFA_SERIAL: &str = "IAM_TOTP_MFA_ARN";
pub const ENV_PROFILE: &str = "PROFILE_NAME";
pub const ENV_PASSWORD: &str = "BW_PASSWORD";
pub const ENV_DURATION: &str = "STS_DURATION_SECONDS";
pub const ENV_CACHE_FILE: &str = "BWSTS_CACHE_FILE";
pub const ENV_BW_BIN: &str = "BW_BIN";
pub const ENV_CONFIG_DIR: &str = "BWSTS_CONFIG_DIR";

/// Session length requested when nothing else is configured (36 hours)
pub const DEFAULT_DURATION_SECONDS: i32 = 129_600;

/// GetSessionToken accepts 15 minutes up to 36 hours
pub const MIN_DURATION_SECONDS: i32 = 900;
pub const MAX_DURATION_SECONDS: i32 = 129_600;

pub const DEFAULT_BW_BINARY: &str = "bw";

/// Cache location relative to the home directory
const DEFAULT_CACHE_FILE: &str = ".aws/aws_sts_session_cache.json";

/// Runtime configuration, built once at startup
#[derive(Debug, Clone)]
pub struct Config {
    /// Vault item holding the TOTP secret
    pub item_id: String,

    /// Name of the custom field inside the item
    pub secret_field: String,

    /// MFA device serial number or ARN
    pub mfa_serial: String,

    /// Named cloud profile holding the long-term credentials
    pub profile: String,

    /// Only needed when the vault is locked
    pub master_password: Option<MasterPassword>,

    pub duration_seconds: i32,

    pub cache_file: PathBuf,

    /// Vault CLI executable, a name looked up in PATH or a path
    pub bw_binary: String,
}

/// The subset of settings the vault client needs
///
/// Commands that never reach the token service load this instead of
/// [`Config`], so the MFA serial and profile need not be set.
#[derive(Debug, Clone)]
pub struct VaultConfig {
    pub item_id: String,
    pub master_password: Option<MasterPassword>,
    pub bw_binary: String,
}

impl VaultConfig {
    /// Load from `.env`, the optional TOML file and the process environment
    pub fn load() -> Result<Self, ConfigError> {
        load_dotenv()?;
        let lookup = |name: &str| std::env::var(name).ok();
        let file = toml_config::load_file_config(&lookup)?;
        Self::from_lookup(lookup, &file)
    }

    /// Only `BW_ITEM_ID` is required
    pub fn from_lookup<F>(lookup: F, file: &FileConfig) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let item_id = get(ENV_ITEM_ID)
            .or_else(|| file.item_id.clone())
            .ok_or_else(|| ConfigError::MissingVar {
                name: ENV_ITEM_ID.to_string(),
            })?;
        let master_password = get(ENV_PASSWORD).map(MasterPassword::new);
        let bw_binary = get(ENV_BW_BIN)
            .or_else(|| file.bw_binary.clone())
            .unwrap_or_else(|| DEFAULT_BW_BINARY.to_string());

        Ok(Self {
            item_id,
            master_password,
            bw_binary,
        })
    }
}

/// Export `.env` from the working directory (or a parent) into the
/// process environment; variables that are already set win
fn load_dotenv() -> Result<(), ConfigError> {
    match dotenvy::dotenv() {
        Ok(path) => debug!("Loaded environment from {}", path.display()),
        Err(e) if e.not_found() => {}
        Err(e) => {
            return Err(ConfigError::LoadFailed {
                path: ".env".to_string(),
                message: e.to_string(),
            })
        }
    }
    Ok(())
}

impl Config {
    /// Load from `.env`, the optional TOML file and the process environment
    pub fn load() -> Result<Self, ConfigError> {
        load_dotenv()?;
        let lookup = |name: &str| std::env::var(name).ok();
        let file = toml_config::load_file_config(&lookup)?;
        Self::from_lookup(lookup, file)
    }

    /// Build from an environment lookup layered over file settings
    ///
    /// Empty variables count as unset.
    pub fn from_lookup<F>(lookup: F, file: FileConfig) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let required = |name: &str, fallback: Option<String>| {
            get(name)
                .or(fallback)
                .ok_or_else(|| ConfigError::MissingVar {
                    name: name.to_string(),
                })
        };

        let VaultConfig {
            item_id,
            master_password,
            bw_binary,
        } = VaultConfig::from_lookup(&lookup, &file)?;
        let secret_field = required(ENV_SECRET_FIELD, file.secret_field)?;
        let mfa_serial = required(ENV_MFA_SERIAL, file.mfa_serial)?;
        let profile = required(ENV_PROFILE, file.profile)?;

        let duration_seconds = match get(ENV_DURATION) {
            Some(raw) => raw
                .trim()
                .parse::<i32>()
                .map_err(|e| ConfigError::InvalidValue {
                    name: ENV_DURATION.to_string(),
                    message: e.to_string(),
                })?,
            None => file.duration_seconds.unwrap_or(DEFAULT_DURATION_SECONDS),
        };

        let cache_file = match get(ENV_CACHE_FILE)
            .map(PathBuf::from)
            .or(file.cache_file)
        {
            Some(path) => path,
            None => {
                let home = get("HOME").ok_or(ConfigError::NoHomeDir)?;
                PathBuf::from(home).join(DEFAULT_CACHE_FILE)
            }
        };

        let config = Self {
            item_id,
            secret_field,
            mfa_serial,
            profile,
            master_password,
            duration_seconds,
            cache_file,
            bw_binary,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_DURATION_SECONDS..=MAX_DURATION_SECONDS).contains(&self.duration_seconds) {
            return Err(ConfigError::InvalidValue {
                name: ENV_DURATION.to_string(),
                message: format!(
                    "must be between {} and {} seconds, got {}",
                    MIN_DURATION_SECONDS, MAX_DURATION_SECONDS, self.duration_seconds
                ),
            });
        }

        Ok(())
    }
}
