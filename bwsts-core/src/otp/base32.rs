//! Lenient Base32 decoding for TOTP secrets
//!
//! Secrets copied out of a password manager come in every shape: grouped
//! with spaces, lowercase, with or without `=` padding. Before decoding:
//! 1. Remove all whitespace characters
//! 2. Drop any existing padding and re-pad to 8-character boundaries
//! 3. Decode case-insensitively (RFC 4648 alphabet)

use crate::error::OtpError;

/// Remove whitespace and trailing padding
fn clean(input: &str) -> String {
    input
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .trim_end_matches('=')
        .to_string()
}

/// Pad input string to 8-character boundaries
///
/// Formula: padding_length = (8 - (len % 8)) % 8
fn pad(input: &str) -> String {
    let padding_len = (8 - (input.len() % 8)) % 8;
    format!("{}{}", input, "=".repeat(padding_len))
}

/// Decode a Base32 secret to key bytes
///
/// An empty secret, characters outside the alphabet, or a length no
/// Base32 encoding can produce all fail with [`OtpError::InvalidSecret`].
pub fn decode_base32(input: &str) -> Result<Vec<u8>, OtpError> {
    use data_encoding::BASE32;

    let cleaned = clean(input);
    if cleaned.is_empty() {
        return Err(OtpError::InvalidSecret);
    }

    let padded = pad(&cleaned);

    BASE32
        .decode(padded.to_ascii_uppercase().as_bytes())
        .map_err(|_| OtpError::InvalidSecret)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_removes_whitespace() {
        assert_eq!(clean("JBSW Y3DP\tEHPK 3PXP\n"), "JBSWY3DPEHPK3PXP");
    }

    #[test]
    fn test_clean_strips_padding() {
        assert_eq!(clean("JBSWY3DPEHPK3P=="), "JBSWY3DPEHPK3P");
    }

    #[test]
    fn test_pad_no_padding_needed() {
        assert_eq!(pad("JBSWY3DPEHPK3PXP"), "JBSWY3DPEHPK3PXP");
    }

    #[test]
    fn test_pad_needs_padding() {
        // Length 14, needs 2 padding chars to reach 16
        assert_eq!(pad("JBSWY3DPEHPK3P"), "JBSWY3DPEHPK3P==");
    }

    #[test]
    fn test_pad_formula() {
        for len in 1..=8 {
            let input = "A".repeat(len);
            assert_eq!(pad(&input).len(), 8, "len={}", len);
        }
    }

    #[test]
    fn test_decode_base32_valid() {
        let bytes = decode_base32("JBSWY3DPEHPK3PXP").unwrap();
        assert_eq!(bytes, b"Hello!\xde\xad\xbe\xef");
    }

    #[test]
    fn test_decode_base32_with_spaces() {
        let with_spaces = decode_base32("JBSW Y3DP EHPK 3PXP").unwrap();
        let without_spaces = decode_base32("JBSWY3DPEHPK3PXP").unwrap();
        assert_eq!(with_spaces, without_spaces);
    }

    #[test]
    fn test_decode_base32_lowercase() {
        let upper = decode_base32("JBSWY3DPEHPK3PXP").unwrap();
        let lower = decode_base32("jbswy3dpehpk3pxp").unwrap();
        let mixed = decode_base32("JbSwY3DpEhPk3PxP").unwrap();

        assert_eq!(upper, lower);
        assert_eq!(upper, mixed);
    }

    #[test]
    fn test_decode_base32_already_padded() {
        let padded = decode_base32("GEZDGNBVGY======").unwrap();
        assert_eq!(padded, b"123456");
    }

    #[test]
    fn test_decode_base32_invalid() {
        assert_eq!(decode_base32("INVALID@CHARS!"), Err(OtpError::InvalidSecret));
        // '1', '8' and '0' are not in the RFC 4648 alphabet
        assert_eq!(decode_base32("GEZDGNB1"), Err(OtpError::InvalidSecret));
        assert_eq!(decode_base32(""), Err(OtpError::InvalidSecret));
        assert_eq!(decode_base32("   "), Err(OtpError::InvalidSecret));
        // A single trailing symbol cannot be produced by any encoding
        assert_eq!(decode_base32("A"), Err(OtpError::InvalidSecret));
    }
}
