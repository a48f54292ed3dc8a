//! Type definitions and wrappers for secure data handling
//!
//! This module provides type-safe wrappers for sensitive data using the
//! secrecy crate to prevent accidental exposure in logs or debug output.

use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
use secrecy::{ExposeSecret, Secret};
use serde::Serialize;

/// Shared TOTP secret as stored in the vault
///
/// Base32 text exactly as the vault returned it; decoding happens in
/// [`crate::otp::totp`].
#[derive(Clone, Debug)]
pub struct OtpSecret(Secret<String>);

impl OtpSecret {
    /// Create a new OtpSecret from a Base32-encoded string
    pub fn new(secret: String) -> Self {
        Self(Secret::new(secret))
    }

    /// Expose the secret value (use with caution!)
    ///
    /// Only the OTP generator should need this.
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

impl From<String> for OtpSecret {
    fn from(secret: String) -> Self {
        Self::new(secret)
    }
}

/// Wrapper for generated TOTP tokens
///
/// Generated OTP tokens should also be treated as sensitive data
/// and never logged, even though they have a short lifetime.
#[derive(Clone, Debug)]
pub struct TotpToken(Secret<String>);

impl TotpToken {
    /// Create a new TotpToken from a generated token string
    pub fn new(token: String) -> Self {
        Self(Secret::new(token))
    }

    /// Expose the token value (use with caution!)
    ///
    /// This should only be called when sending the token to stdout
    /// or passing to the token service.
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

/// Vault master password
#[derive(Clone, Debug)]
pub struct MasterPassword(Secret<String>);

impl MasterPassword {
    pub fn new(password: String) -> Self {
        Self(Secret::new(password))
    }

    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

/// Temporary credentials issued by the token service
///
/// The access key id is an identifier, not a secret, so it stays a plain
/// string and may appear in logs.
#[derive(Clone, Debug)]
pub struct SessionCredentials {
    pub access_key_id: String,
    secret_access_key: Secret<String>,
    session_token: Secret<String>,
    pub expiration: DateTime<Utc>,
}

impl SessionCredentials {
    pub fn new(
        access_key_id: String,
        secret_access_key: String,
        session_token: String,
        expiration: DateTime<Utc>,
    ) -> Self {
        Self {
            access_key_id,
            secret_access_key: Secret::new(secret_access_key),
            session_token: Secret::new(session_token),
            expiration,
        }
    }

    pub fn secret_access_key(&self) -> &str {
        self.secret_access_key.expose_secret()
    }

    pub fn session_token(&self) -> &str {
        self.session_token.expose_secret()
    }

    /// Shape printed on stdout for the credential-process protocol
    pub fn to_process_output(&self) -> CredentialProcessOutput<'_> {
        CredentialProcessOutput {
            version: CREDENTIAL_PROCESS_VERSION,
            access_key_id: &self.access_key_id,
            secret_access_key: self.secret_access_key(),
            session_token: self.session_token(),
            expiration: format_expiration(&self.expiration),
        }
    }
}

impl PartialEq for SessionCredentials {
    fn eq(&self, other: &Self) -> bool {
        self.access_key_id == other.access_key_id
            && self.secret_access_key() == other.secret_access_key()
            && self.session_token() == other.session_token()
            && self.expiration == other.expiration
    }
}

impl Eq for SessionCredentials {}

/// Version field required by the credential-process protocol
pub const CREDENTIAL_PROCESS_VERSION: u8 = 1;

/// `{"Version":1,"AccessKeyId":..,"SecretAccessKey":..,"SessionToken":..,"Expiration":..}`
#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CredentialProcessOutput<'a> {
    pub version: u8,
    pub access_key_id: &'a str,
    pub secret_access_key: &'a str,
    pub session_token: &'a str,
    pub expiration: String,
}

/// Render an expiration as ISO-8601 text (RFC 3339, UTC, `Z` suffix)
pub fn format_expiration(expiration: &DateTime<Utc>) -> String {
    expiration.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

/// Parse an ISO-8601 expiration
///
/// Accepts RFC 3339 with any UTC offset, or a timestamp without offset,
/// which is taken to be UTC.
pub fn parse_expiration(text: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    match DateTime::parse_from_rfc3339(text) {
        Ok(dt) => Ok(dt.with_timezone(&Utc)),
        Err(rfc_err) => NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f")
            .map(|naive| naive.and_utc())
            .map_err(|_| rfc_err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_expiration_offsets() {
        let expected = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        assert_eq!(parse_expiration("2024-05-01T12:00:00Z").unwrap(), expected);
        assert_eq!(parse_expiration("2024-05-01T12:00:00+00:00").unwrap(), expected);
        assert_eq!(parse_expiration("2024-05-01T21:00:00+09:00").unwrap(), expected);
    }

    #[test]
    fn test_parse_expiration_naive_is_utc() {
        let expected = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        assert_eq!(parse_expiration("2024-05-01T12:00:00").unwrap(), expected);
    }

    #[test]
    fn test_parse_expiration_garbage() {
        assert!(parse_expiration("tomorrow").is_err());
        assert!(parse_expiration("").is_err());
    }

    #[test]
    fn test_process_output_shape() {
        let creds = SessionCredentials::new(
            "ASIAEXAMPLE".to_string(),
            "secret".to_string(),
            "token".to_string(),
            Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
        );
        let json = serde_json::to_string(&creds.to_process_output()).unwrap();
        assert_eq!(
            json,
            r#"{"Version":1,"AccessKeyId":"ASIAEXAMPLE","SecretAccessKey":"secret","SessionToken":"token","Expiration":"2024-05-01T12:00:00Z"}"#
        );
    }

    #[test]
    fn test_debug_hides_secrets() {
        let creds = SessionCredentials::new(
            "ASIAEXAMPLE".to_string(),
            "very-secret-key".to_string(),
            "very-secret-token".to_string(),
            Utc::now(),
        );
        let debug = format!("{:?}", creds);
        assert!(debug.contains("ASIAEXAMPLE"));
        assert!(!debug.contains("very-secret-key"));
        assert!(!debug.contains("very-secret-token"));
    }
}
