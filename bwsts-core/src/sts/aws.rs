//! AWS STS `GetSessionToken`
//!
//! The SDK is async; the issuer owns a current-thread tokio runtime and
//! blocks on each call so the rest of the program stays synchronous.

use crate::config::Config;
use crate::error::RemoteServiceError;
use crate::sts::{SessionTokenIssuer, SessionTokenRequest};
use crate::types::SessionCredentials;
use aws_config::BehaviorVersion;
use aws_sdk_sts::error::DisplayErrorContext;
use aws_sdk_sts::Client;
use chrono::{DateTime, Utc};
use tracing::{debug, info};

pub struct AwsStsIssuer {
    runtime: tokio::runtime::Runtime,
    client: Client,
}

impl AwsStsIssuer {
    /// Client signed with the long-term credentials of `profile`
    pub fn new(profile: &str) -> Result<Self, RemoteServiceError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| RemoteServiceError::Runtime {
                reason: e.to_string(),
            })?;

        debug!("Loading AWS configuration for profile {}", profile);
        let sdk_config = runtime.block_on(
            aws_config::defaults(BehaviorVersion::latest())
                .profile_name(profile)
                .load(),
        );

        Ok(Self {
            runtime,
            client: Client::new(&sdk_config),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, RemoteServiceError> {
        Self::new(&config.profile)
    }
}

impl SessionTokenIssuer for AwsStsIssuer {
    fn get_session_token(
        &self,
        request: &SessionTokenRequest,
    ) -> Result<SessionCredentials, RemoteServiceError> {
        debug!(
            "Requesting session token for {} ({}s)",
            request.serial_number, request.duration_seconds
        );

        let response = self
            .runtime
            .block_on(
                self.client
                    .get_session_token()
                    .serial_number(request.serial_number.as_str())
                    .token_code(request.token_code.expose())
                    .duration_seconds(request.duration_seconds)
                    .send(),
            )
            .map_err(|e| RemoteServiceError::RequestFailed {
                message: DisplayErrorContext(&e).to_string(),
            })?;

        let credentials = response
            .credentials()
            .ok_or(RemoteServiceError::MissingCredentials)?;

        let expiration = credentials.expiration();
        let expiration = DateTime::<Utc>::from_timestamp(expiration.secs(), expiration.subsec_nanos())
            .ok_or(RemoteServiceError::InvalidExpiration)?;

        info!(
            "Issued session credentials {} valid until {}",
            credentials.access_key_id(),
            expiration
        );

        Ok(SessionCredentials::new(
            credentials.access_key_id().to_string(),
            credentials.secret_access_key().to_string(),
            credentials.session_token().to_string(),
            expiration,
        ))
    }
}
