//! HMAC-SHA1 (RFC 2104)
//!
//! HOTP only ever needs SHA-1 with a short key and an 8-byte message, so
//! the construction is spelled out over the `sha1` digest directly.
//! Block size: 64 bytes, ipad 0x36, opad 0x5C.

use sha1::{Digest, Sha1};

const BLOCK_SIZE: usize = 64;
const IPAD: u8 = 0x36;
const OPAD: u8 = 0x5C;

/// Length of a SHA-1 digest in bytes
pub const DIGEST_LEN: usize = 20;

/// Compute `HMAC-SHA1(key, message)`
pub fn hmac_sha1(key: &[u8], message: &[u8]) -> [u8; DIGEST_LEN] {
    // Keys longer than a block are replaced by their digest; shorter keys
    // are zero-padded.
    let mut key_block = [0u8; BLOCK_SIZE];
    if key.len() > BLOCK_SIZE {
        key_block[..DIGEST_LEN].copy_from_slice(&Sha1::digest(key));
    } else {
        key_block[..key.len()].copy_from_slice(key);
    }

    let inner_key: Vec<u8> = key_block.iter().map(|b| b ^ IPAD).collect();
    let outer_key: Vec<u8> = key_block.iter().map(|b| b ^ OPAD).collect();

    let inner_hash = Sha1::new_with_prefix(&inner_key)
        .chain_update(message)
        .finalize();

    let outer_hash = Sha1::new_with_prefix(&outer_key)
        .chain_update(inner_hash)
        .finalize();

    let mut result = [0u8; DIGEST_LEN];
    result.copy_from_slice(&outer_hash);
    result
}
