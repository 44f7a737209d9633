//! Wallet-auth nonces.
//!
//! The server issues a random nonce together with its HMAC under the auth
//! secret. The client echoes both back when signing in, which lets the server
//! confirm it minted the nonce without keeping any state.

use crate::secret::constant_time_eq;
use crate::CryptoError;
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Length of generated nonces. SIWE requires at least 8 alphanumerics.
pub const NONCE_LEN: usize = 16;

const ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Generate an alphanumeric nonce from the OS random source.
pub fn generate_nonce() -> Result<String, CryptoError> {
    let mut out = String::with_capacity(NONCE_LEN);
    let mut buf = [0u8; 1];
    // Rejection sampling keeps the distribution uniform over the alphabet.
    let limit = 256 - (256 % ALPHABET.len());
    while out.len() < NONCE_LEN {
        getrandom::getrandom(&mut buf).map_err(|e| CryptoError::Random(e.to_string()))?;
        let b = buf[0] as usize;
        if b < limit {
            out.push(ALPHABET[b % ALPHABET.len()] as char);
        }
    }
    Ok(out)
}

/// HMAC-SHA256 of `nonce` under `secret`, hex encoded.
pub fn hash_nonce(secret: &[u8], nonce: &str) -> Result<String, CryptoError> {
    let mut mac =
        HmacSha256::new_from_slice(secret).map_err(|e| CryptoError::InvalidKey(e.to_string()))?;
    mac.update(nonce.as_bytes());
    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// Check that `signed_nonce` is the HMAC of `nonce` under `secret`.
pub fn verify_signed_nonce(secret: &[u8], nonce: &str, signed_nonce: &str) -> bool {
    match hash_nonce(secret, nonce) {
        Ok(expected) => constant_time_eq(expected.as_bytes(), signed_nonce.as_bytes()),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nonce_is_alphanumeric_and_sized() {
        let n = generate_nonce().unwrap();
        assert_eq!(n.len(), NONCE_LEN);
        assert!(n.bytes().all(|b| b.is_ascii_alphanumeric()));
    }

    #[test]
    fn nonces_differ() {
        assert_ne!(generate_nonce().unwrap(), generate_nonce().unwrap());
    }

    #[test]
    fn signed_nonce_verifies() {
        let signed = hash_nonce(b"secret", "abc12345").unwrap();
        assert!(verify_signed_nonce(b"secret", "abc12345", &signed));
        assert!(!verify_signed_nonce(b"other", "abc12345", &signed));
        assert!(!verify_signed_nonce(b"secret", "abc12346", &signed));
    }
}
