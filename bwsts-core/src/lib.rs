//! Core library for the bwsts credential helper
//!
//! Turns a TOTP secret kept in a password manager into temporary AWS
//! session credentials, with a local cache so the vault and STS are only
//! contacted when the cached session is about to expire.

pub mod error;
pub mod types;

pub mod cache;
pub mod config;
pub mod fido2;
pub mod otp;
pub mod pipeline;
pub mod sts;
pub mod vault;

pub use tracing_subscriber::filter::LevelFilter;

/// Initialize logging infrastructure
///
/// Under systemd the journal receives the events. Everywhere else they go
/// to stderr: stdout belongs to the credential-process JSON.
pub fn init_logging(level: LevelFilter) -> Result<(), Box<dyn std::error::Error>> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    #[cfg(target_os = "linux")]
    {
        if std::env::var("JOURNAL_STREAM").is_ok() {
            let journal_layer = tracing_journald::layer()?;
            tracing_subscriber::registry()
                .with(journal_layer)
                .with(level)
                .try_init()?;
            return Ok(());
        }
    }

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .with(level)
        .try_init()?;

    Ok(())
}
