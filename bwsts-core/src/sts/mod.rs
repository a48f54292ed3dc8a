//! Remote token service
//!
//! Exchanges an MFA code for temporary session credentials.

use crate::config::Config;
use crate::error::RemoteServiceError;
use crate::types::{SessionCredentials, TotpToken};

pub mod aws;

pub use aws::AwsStsIssuer;

/// Parameters of one `GetSessionToken` call
#[derive(Debug, Clone)]
pub struct SessionTokenRequest {
    /// MFA device serial number or ARN
    pub serial_number: String,
    pub token_code: TotpToken,
    pub duration_seconds: i32,
}

impl SessionTokenRequest {
    pub fn new(config: &Config, token_code: TotpToken) -> Self {
        Self {
            serial_number: config.mfa_serial.clone(),
            token_code,
            duration_seconds: config.duration_seconds,
        }
    }
}

pub trait SessionTokenIssuer {
    fn get_session_token(
        &self,
        request: &SessionTokenRequest,
    ) -> Result<SessionCredentials, RemoteServiceError>;
}
