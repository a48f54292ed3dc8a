//! TOTP generation against published vectors
//!
//! RFC 6238 Appendix B (SHA-1 rows, truncated to six digits) and
//! independently computed HOTP values.

use bwsts_core::error::OtpError;
use bwsts_core::otp::{base32, totp};
use bwsts_core::types::OtpSecret;

/// "12345678901234567890" in Base32
const RFC_SECRET: &str = "GEZDGNBVGY3TQOJQGEZDGNBVGY3TQOJQ";

fn code_at(secret: &str, unix_secs: u64) -> String {
    totp::generate_totp_at(&OtpSecret::new(secret.to_string()), unix_secs)
        .expect("valid secret")
        .expose()
        .to_string()
}

#[test]
fn test_rfc6238_sha1_vectors() {
    let vectors = [
        (59, "287082"),
        (1_111_111_109, "081804"),
        (1_111_111_111, "050471"),
        (1_234_567_890, "005924"),
        (2_000_000_000, "279037"),
        (20_000_000_000, "353130"),
    ];

    for (time, expected) in vectors {
        assert_eq!(code_at(RFC_SECRET, time), expected, "T={}", time);
    }
}

#[test]
fn test_rfc_secret_decodes_to_ascii_digits() {
    assert_eq!(
        base32::decode_base32(RFC_SECRET).unwrap(),
        b"12345678901234567890"
    );
}

#[test]
fn test_short_rfc_secret() {
    // First ten bytes of the RFC key; computed with Python's hmac module
    assert_eq!(code_at("GEZDGNBVGY3TQOJQ", 59), "263420");
    assert_eq!(code_at("GEZDGNBVGY3TQOJQ", 1_111_111_109), "343526");
}

#[test]
fn test_fixed_clock_at_59_uses_counter_1() {
    assert_eq!(totp::time_step(59), 1);

    let key = base32::decode_base32("JBSWY3DPEHPK3PXP").unwrap();
    let expected = format!("{:06}", totp::hotp(&key, 1));
    assert_eq!(expected, "996554");
    assert_eq!(code_at("JBSWY3DPEHPK3PXP", 59), expected);
}

#[test]
fn test_same_window_same_code() {
    for window_start in [0u64, 30, 1_700_000_010] {
        let first = code_at("JBSWY3DPEHPK3PXP", window_start);
        for offset in 1..30 {
            assert_eq!(code_at("JBSWY3DPEHPK3PXP", window_start + offset), first);
        }
    }
}

#[test]
fn test_adjacent_windows_differ() {
    // HOTP(JBSWY3DPEHPK3PXP, 0..=2) = 282760, 996554, 602287
    assert_eq!(code_at("JBSWY3DPEHPK3PXP", 29), "282760");
    assert_eq!(code_at("JBSWY3DPEHPK3PXP", 30), "996554");
    assert_eq!(code_at("JBSWY3DPEHPK3PXP", 60), "602287");
}

#[test]
fn test_codes_are_six_ascii_digits() {
    let mut t = 0u64;
    while t < 3_000_000 {
        let code = code_at(RFC_SECRET, t);
        assert_eq!(code.len(), 6, "T={}", t);
        assert!(code.bytes().all(|b| b.is_ascii_digit()), "T={}", t);
        t += 7_919;
    }
}

#[test]
fn test_secret_formatting_does_not_matter() {
    let canonical = code_at("JBSWY3DPEHPK3PXP", 1_700_000_000);
    assert_eq!(code_at("jbsw y3dp ehpk 3pxp", 1_700_000_000), canonical);
}

#[test]
fn test_malformed_secret() {
    for secret in ["", "not base32!", "JBSWY3DP1", "ЖЖЖЖЖЖЖЖ"] {
        let result = totp::generate_totp_at(&OtpSecret::new(secret.to_string()), 59);
        assert_eq!(
            result.unwrap_err(),
            OtpError::InvalidSecret,
            "secret={:?}",
            secret
        );
    }
}
