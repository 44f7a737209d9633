//! Stateless nonce issuing.

use crate::AuthError;
use petition_crypto::{generate_nonce, hash_nonce, verify_signed_nonce};
use serde::{Deserialize, Serialize};

/// A nonce plus the server's HMAC over it.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct IssuedNonce {
    pub nonce: String,
    pub signed_nonce: String,
}

#[derive(Clone)]
pub struct NonceIssuer {
    secret: Vec<u8>,
}

impl NonceIssuer {
    pub fn new(secret: impl AsRef<[u8]>) -> Self {
        Self {
            secret: secret.as_ref().to_vec(),
        }
    }

    pub fn issue(&self) -> Result<IssuedNonce, AuthError> {
        let nonce = generate_nonce()?;
        let signed_nonce = hash_nonce(&self.secret, &nonce)?;
        Ok(IssuedNonce {
            nonce,
            signed_nonce,
        })
    }

    pub fn verify(&self, nonce: &str, signed_nonce: &str) -> bool {
        verify_signed_nonce(&self.secret, nonce, signed_nonce)
    }
}

impl std::fmt::Debug for NonceIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NonceIssuer").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issued_nonce_verifies() {
        let issuer = NonceIssuer::new("hmac-secret");
        let issued = issuer.issue().unwrap();
        assert!(issuer.verify(&issued.nonce, &issued.signed_nonce));
        assert!(!NonceIssuer::new("other").verify(&issued.nonce, &issued.signed_nonce));
    }

    #[test]
    fn serializes_camel_case() {
        let issued = IssuedNonce {
            nonce: "n".into(),
            signed_nonce: "s".into(),
        };
        let json = serde_json::to_value(&issued).unwrap();
        assert_eq!(json["signedNonce"], "s");
    }
}
