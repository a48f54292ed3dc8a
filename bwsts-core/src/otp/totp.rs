//! TOTP (Time-based One-Time Password) generation
//!
//! RFC 4226 HOTP driven by the RFC 6238 time-step counter: SHA-1,
//! 30-second steps, 6 digits. Everything here is a pure function of the
//! secret and the Unix time, except [`generate_totp`] which reads the
//! system clock.

use crate::error::OtpError;
use crate::otp::{base32::decode_base32, hmac::hmac_sha1};
use crate::types::{OtpSecret, TotpToken};
use std::time::{SystemTime, UNIX_EPOCH};

/// RFC 6238 default step
pub const TIME_STEP_SECS: u64 = 30;

/// Number of decimal digits in a code
pub const DIGITS: u32 = 6;

const MODULUS: u32 = 10u32.pow(DIGITS);

/// Counter for the 30-second window containing `unix_secs`
pub fn time_step(unix_secs: u64) -> u64 {
    unix_secs / TIME_STEP_SECS
}

/// Seconds until the window containing `unix_secs` rolls over
pub fn seconds_remaining(unix_secs: u64) -> u64 {
    TIME_STEP_SECS - unix_secs % TIME_STEP_SECS
}

/// RFC 4226 HOTP value (before zero padding) for `key` and `counter`
pub fn hotp(key: &[u8], counter: u64) -> u32 {
    let digest = hmac_sha1(key, &counter.to_be_bytes());

    // Dynamic truncation
    let offset = (digest[digest.len() - 1] & 0x0F) as usize;
    let binary = u32::from_be_bytes([
        digest[offset],
        digest[offset + 1],
        digest[offset + 2],
        digest[offset + 3],
    ]) & 0x7FFF_FFFF;

    binary % MODULUS
}

/// Generate the code for `secret` at a fixed Unix time
///
/// # Errors
///
/// Returns `OtpError::InvalidSecret` if the secret is not valid Base32.
pub fn generate_totp_at(secret: &OtpSecret, unix_secs: u64) -> Result<TotpToken, OtpError> {
    let key = decode_base32(secret.expose())?;
    let code = hotp(&key, time_step(unix_secs));
    Ok(TotpToken::new(format!(
        "{:0width$}",
        code,
        width = DIGITS as usize
    )))
}

/// Generate the code for `secret` at the current system time
pub fn generate_totp(secret: &OtpSecret) -> Result<TotpToken, OtpError> {
    generate_totp_at(secret, unix_now()?)
}

/// Current Unix time in whole seconds
pub fn unix_now() -> Result<u64, OtpError> {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .map_err(|_| OtpError::TimeError)
}

#[cfg(test)]
mod tests {
    use super::*;

    // RFC 4226 Appendix D secret "12345678901234567890"
    const RFC_KEY: &[u8] = b"12345678901234567890";

    #[test]
    fn test_hotp_rfc4226_vectors() {
        let expected = [
            755224, 287082, 359152, 969429, 338314, 254676, 287922, 162583, 399871, 520489,
        ];
        for (counter, code) in expected.iter().enumerate() {
            assert_eq!(hotp(RFC_KEY, counter as u64), *code, "counter={}", counter);
        }
    }

    #[test]
    fn test_time_step_boundaries() {
        assert_eq!(time_step(0), 0);
        assert_eq!(time_step(29), 0);
        assert_eq!(time_step(30), 1);
        assert_eq!(time_step(59), 1);
        assert_eq!(time_step(60), 2);
    }

    #[test]
    fn test_seconds_remaining() {
        assert_eq!(seconds_remaining(0), 30);
        assert_eq!(seconds_remaining(29), 1);
        assert_eq!(seconds_remaining(30), 30);
    }

    #[test]
    fn test_generate_totp_zero_padded() {
        // RFC 6238 T=1234567890 yields 89005924; the low six digits start with zeros
        let secret = OtpSecret::new("GEZDGNBVGY3TQOJQGEZDGNBVGY3TQOJQ".to_string());
        let token = generate_totp_at(&secret, 1_234_567_890).unwrap();
        assert_eq!(token.expose(), "005924");
    }

    #[test]
    fn test_generate_totp_invalid_secret() {
        let secret = OtpSecret::new("NOT-BASE32!".to_string());
        assert_eq!(
            generate_totp_at(&secret, 59).unwrap_err(),
            OtpError::InvalidSecret
        );
    }

    #[test]
    fn test_generate_totp_now_is_six_digits() {
        let secret = OtpSecret::new("JBSWY3DPEHPK3PXP".to_string());
        let token = generate_totp(&secret).unwrap();
        assert_eq!(token.expose().len(), 6);
        assert!(token.expose().chars().all(|c| c.is_ascii_digit()));
    }
}
