//! One-time passcode generation
//!
//! Base32 secret decoding, HMAC-SHA1 and the HOTP/TOTP routine.

pub mod base32;
pub mod hmac;
pub mod totp;
