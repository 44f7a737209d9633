//! World ID signal hashing.
//!
//! The cloud verifier expects `signal_hash = keccak256(signal) >> 8`, encoded
//! as `0x` followed by 64 hex digits. The shift keeps the value inside the
//! BN254 scalar field.

use sha3::{Digest, Keccak256};

/// Hash a signal the way the World ID SDKs do.
///
/// A `0x`-prefixed hex string is hashed as the bytes it encodes, with an odd
/// digit count padded by a leading `0`. Anything else is hashed as UTF-8.
pub fn hash_to_field(signal: &str) -> String {
    let bytes = hex_bytes(signal).unwrap_or_else(|| signal.as_bytes().to_vec());
    let digest = Keccak256::digest(&bytes);

    let mut shifted = [0u8; 32];
    shifted[1..].copy_from_slice(&digest[..31]);
    format!("0x{}", hex::encode(shifted))
}

fn hex_bytes(signal: &str) -> Option<Vec<u8>> {
    let digits = signal.strip_prefix("0x")?;
    if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    if digits.len() % 2 == 1 {
        hex::decode(format!("0{digits}")).ok()
    } else {
        hex::decode(digits).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_signal_matches_sdk() {
        // keccak256("") = c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470
        assert_eq!(
            hash_to_field(""),
            "0x00c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a4"
        );
    }

    #[test]
    fn output_is_fixed_width() {
        let h = hash_to_field("petition-signal");
        assert_eq!(h.len(), 66);
        assert!(h.starts_with("0x00"));
    }

    #[test]
    fn hex_signals_hash_as_bytes() {
        assert_eq!(hash_to_field("0x"), hash_to_field(""));
        assert_ne!(hash_to_field("0x41"), hash_to_field("0x42"));
        assert_eq!(hash_to_field("0x41"), hash_to_field("A"));
    }

    #[test]
    fn odd_length_hex_is_left_padded() {
        assert_eq!(hash_to_field("0x123"), hash_to_field("0x0123"));
        assert_eq!(hash_to_field("0x1"), hash_to_field("0x01"));
        assert_ne!(hash_to_field("0x123"), {
            let digest = Keccak256::digest(b"0x123");
            let mut shifted = [0u8; 32];
            shifted[1..].copy_from_slice(&digest[..31]);
            format!("0x{}", hex::encode(shifted))
        });
    }

    #[test]
    fn invalid_hex_falls_back_to_utf8() {
        assert_ne!(hash_to_field("0xzz"), hash_to_field(""));
    }
}
