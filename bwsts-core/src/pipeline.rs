//! Credential pipeline
//!
//! cache check -> unlock vault -> read TOTP secret -> generate code ->
//! GetSessionToken -> save cache. One attempt, no retries; the first
//! failing step's error is returned to the caller.

use crate::cache::CredentialCache;
use crate::config::Config;
use crate::error::{BwstsError, OtpError, Result};
use crate::otp::totp;
use crate::sts::{SessionTokenIssuer, SessionTokenRequest};
use crate::types::{SessionCredentials, TotpToken};
use crate::vault::SecretVault;
use chrono::{DateTime, Utc};
use tracing::{info, warn};

/// Where the returned credentials came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialSource {
    Cache,
    Issued,
}

#[derive(Debug, Clone)]
pub struct Outcome {
    pub credentials: SessionCredentials,
    pub source: CredentialSource,
}

pub struct Pipeline<'a> {
    config: &'a Config,
    cache: CredentialCache,
    use_cache: bool,
}

impl<'a> Pipeline<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self {
            config,
            cache: CredentialCache::from_config(config),
            use_cache: true,
        }
    }

    /// Skip reading the cache (it is still written after issuance)
    pub fn use_cache(mut self, use_cache: bool) -> Self {
        self.use_cache = use_cache;
        self
    }

    /// Fresh cached credentials, if any
    ///
    /// An unreadable or malformed cache is logged and treated as a miss.
    pub fn cached(&self, now: DateTime<Utc>) -> Option<SessionCredentials> {
        if !self.use_cache {
            return None;
        }

        match self.cache.load_at(now) {
            Ok(Some(credentials)) => {
                info!(
                    "Using cached credentials {} (expires {})",
                    credentials.access_key_id, credentials.expiration
                );
                Some(credentials)
            }
            Ok(None) => {
                info!("No valid cached credentials");
                None
            }
            Err(e) => {
                warn!("Ignoring credential cache: {}", e);
                None
            }
        }
    }

    /// Unlock the vault and compute the code for `now`
    pub fn current_code<V: SecretVault>(&self, vault: &mut V, now: DateTime<Utc>) -> Result<TotpToken> {
        vault.unlock()?;
        let secret = vault.get_field(&self.config.item_id, &self.config.secret_field)?;
        let unix_secs = u64::try_from(now.timestamp()).map_err(|_| OtpError::TimeError)?;
        Ok(totp::generate_totp_at(&secret, unix_secs)?)
    }

    /// Issue new credentials and store them in the cache
    ///
    /// A failed cache write is logged; the credentials are still returned.
    pub fn issue<V, I>(&self, vault: &mut V, issuer: &I, now: DateTime<Utc>) -> Result<SessionCredentials>
    where
        V: SecretVault,
        I: SessionTokenIssuer,
    {
        let code = self.current_code(vault, now)?;
        let request = SessionTokenRequest::new(self.config, code);
        let credentials = issuer.get_session_token(&request)?;

        if let Err(e) = self.cache.save(&credentials) {
            warn!("Failed to cache credentials: {}", e);
        }
        Ok(credentials)
    }

    /// Full run; collaborators are only built on a cache miss
    pub fn run<V, I, FV, FI>(&self, now: DateTime<Utc>, make_vault: FV, make_issuer: FI) -> Result<Outcome>
    where
        V: SecretVault,
        I: SessionTokenIssuer,
        FV: FnOnce() -> std::result::Result<V, BwstsError>,
        FI: FnOnce() -> std::result::Result<I, BwstsError>,
    {
        if let Some(credentials) = self.cached(now) {
            return Ok(Outcome {
                credentials,
                source: CredentialSource::Cache,
            });
        }

        let mut vault = make_vault()?;
        let issuer = make_issuer()?;
        let credentials = self.issue(&mut vault, &issuer, now)?;

        Ok(Outcome {
            credentials,
            source: CredentialSource::Issued,
        })
    }
}
