//! Petition id generation.
//!
//! An id is `hex(HMAC-SHA256(secret, 32 random bytes))`: fixed width, and
//! unpredictable without both the secret and the random draw. Ids are never
//! re-derived or checked against the secret afterwards, so rotating the secret
//! only changes how future ids are minted.

use crate::CryptoError;
use hmac::{Hmac, Mac};
use petition_types::PetitionId;
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Number of random bytes fed into each id.
const RANDOM_INPUT_LEN: usize = 32;

/// Key used when no secret is configured. Ids remain random, but anyone can
/// reproduce the keyed hash of an observed input.
pub const FALLBACK_ID_SECRET: &str = "petition-id-fallback-secret";

/// Mints petition ids.
#[derive(Clone)]
pub struct IdGenerator {
    secret: Vec<u8>,
}

impl IdGenerator {
    pub fn new(secret: impl AsRef<[u8]>) -> Self {
        Self {
            secret: secret.as_ref().to_vec(),
        }
    }

    /// Build from an optional configured secret, falling back to
    /// [`FALLBACK_ID_SECRET`] with a warning.
    pub fn from_config(secret: Option<&str>) -> Self {
        match secret.filter(|s| !s.is_empty()) {
            Some(s) => Self::new(s),
            None => {
                tracing::warn!("no id secret configured, using the built-in fallback key");
                Self::new(FALLBACK_ID_SECRET)
            }
        }
    }

    /// Generate a fresh id.
    pub fn generate(&self) -> Result<PetitionId, CryptoError> {
        let mut input = [0u8; RANDOM_INPUT_LEN];
        getrandom::getrandom(&mut input).map_err(|e| CryptoError::Random(e.to_string()))?;
        self.derive(&input)
    }

    /// Keyed hash of a given input. Exposed for deterministic tests.
    pub fn derive(&self, input: &[u8]) -> Result<PetitionId, CryptoError> {
        let mut mac = HmacSha256::new_from_slice(&self.secret)
            .map_err(|e| CryptoError::InvalidKey(e.to_string()))?;
        mac.update(input);
        let digest = hex::encode(mac.finalize().into_bytes());
        PetitionId::new(digest).map_err(|e| CryptoError::InvalidKey(e.to_string()))
    }
}

impl std::fmt::Debug for IdGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdGenerator").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn ids_are_fixed_width_hex() {
        let gen = IdGenerator::new("secret");
        let id = gen.generate().unwrap();
        assert_eq!(id.as_str().len(), PetitionId::GENERATED_LEN);
        assert!(id.is_generated_form());
    }

    #[test]
    fn ids_do_not_repeat() {
        let gen = IdGenerator::new("secret");
        let ids: HashSet<_> = (0..500).map(|_| gen.generate().unwrap()).collect();
        assert_eq!(ids.len(), 500);
    }

    #[test]
    fn derive_is_keyed() {
        let a = IdGenerator::new("key-a").derive(b"same input").unwrap();
        let b = IdGenerator::new("key-b").derive(b"same input").unwrap();
        let a2 = IdGenerator::new("key-a").derive(b"same input").unwrap();
        assert_ne!(a, b);
        assert_eq!(a, a2);
    }

    #[test]
    fn rfc4231_test_case_2() {
        // HMAC-SHA256 with key "Jefe".
        let id = IdGenerator::new("Jefe")
            .derive(b"what do ya want for nothing?")
            .unwrap();
        assert_eq!(
            id.as_str(),
            "5bdcc146bf60754e6a042426089575c75a003f089d2739839dec58b964ec3843"
        );
    }

    #[test]
    fn empty_config_uses_fallback() {
        let fallback = IdGenerator::from_config(Some("")).derive(b"x").unwrap();
        let expected = IdGenerator::new(FALLBACK_ID_SECRET).derive(b"x").unwrap();
        assert_eq!(fallback, expected);
    }
}
