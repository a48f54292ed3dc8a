//! Error types for the bwsts credential helper
//!
//! Every stage of the pipeline has its own error enum so callers can tell
//! a missing environment variable from a locked vault or a rejected code.
//! Nothing in this crate terminates the process; the binary maps
//! [`BwstsError`] to an exit status in exactly one place.

use thiserror::Error;

/// Main error type for the bwsts application
#[derive(Error, Debug)]
pub enum BwstsError {
    /// Errors related to configuration loading/parsing
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Errors talking to the password-manager CLI
    #[error("Vault error: {0}")]
    Vault(#[from] VaultError),

    /// Errors related to OTP/TOTP operations
    #[error("OTP error: {0}")]
    Otp(#[from] OtpError),

    /// Errors from the remote token-issuing service
    #[error("Remote service error: {0}")]
    Remote(#[from] RemoteServiceError),

    /// Credential cache errors
    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),

    /// JSON (de)serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-related errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{name} environment variable is not set")]
    MissingVar { name: String },

    #[error("Invalid value for {name}: {message}")]
    InvalidValue { name: String, message: String },

    #[error("Failed to load configuration file: {path}: {message}")]
    LoadFailed { path: String, message: String },

    #[error("Cannot determine home directory (HOME is not set)")]
    NoHomeDir,
}

/// Password-manager CLI errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VaultError {
    #[error("Vault CLI '{binary}' not found in PATH")]
    CliNotFound { binary: String },

    #[error("Failed to run vault CLI: {reason}")]
    SpawnFailed { reason: String },

    #[error("Vault is locked and BW_PASSWORD is not set")]
    Locked,

    #[error("Failed to unlock vault: {stderr}")]
    UnlockFailed { stderr: String },

    #[error("Failed to get item from vault: {stderr}")]
    ItemFetchFailed { stderr: String },

    #[error("Failed to parse vault item: {reason}")]
    MalformedItem { reason: String },

    #[error("Field '{name}' not found in vault item")]
    FieldNotFound { name: String },

    #[error("No FIDO2 credentials found in vault item")]
    NoFido2Credential,
}

/// OTP/TOTP operation errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OtpError {
    #[error("Invalid Base32 secret")]
    InvalidSecret,

    #[error("System time error")]
    TimeError,
}

/// Remote token service errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RemoteServiceError {
    #[error("Failed to get session token: {message}")]
    RequestFailed { message: String },

    #[error("Token service response did not contain credentials")]
    MissingCredentials,

    #[error("Token service returned an unrepresentable expiration")]
    InvalidExpiration,

    #[error("Failed to start async runtime: {reason}")]
    Runtime { reason: String },

    #[error("Unsupported authentication flow: {reason}")]
    Unsupported { reason: String },
}

/// Credential cache errors
///
/// The pipeline downgrades these to a cache miss when reading.
#[derive(Error, Debug)]
pub enum CacheError {
    #[error("Failed to read cache file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write cache file {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed cache file {path}: {source}")]
    Malformed {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid expiration '{value}' in cache file {path}")]
    InvalidExpiration { path: String, value: String },
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, BwstsError>;
