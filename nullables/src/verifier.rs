//! Nullable proof verifier: scripted verdicts, recorded calls.

use futures_util::future::BoxFuture;
use petition_worldid::{ProofPayload, ProofVerifier, VerifyResponse, WorldIdError};
use std::sync::Mutex;

#[derive(Clone, Debug)]
enum Script {
    Accept,
    Reject(String, String),
    Unreachable,
}

/// A [`ProofVerifier`] that never leaves the process.
pub struct NullVerifier {
    script: Mutex<Script>,
    calls: Mutex<Vec<(String, Option<String>)>>,
}

impl NullVerifier {
    /// Accepts every proof.
    pub fn accepting() -> Self {
        Self::scripted(Script::Accept)
    }

    /// Rejects every proof with the given code and detail.
    pub fn rejecting(code: &str, detail: &str) -> Self {
        Self::scripted(Script::Reject(code.into(), detail.into()))
    }

    /// Fails every call as if the portal were down.
    pub fn unreachable() -> Self {
        Self::scripted(Script::Unreachable)
    }

    fn scripted(script: Script) -> Self {
        Self {
            script: Mutex::new(script),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Switch to accepting (or rejecting) subsequent proofs.
    pub fn set_accepting(&self, accept: bool) {
        if let Ok(mut script) = self.script.lock() {
            *script = if accept {
                Script::Accept
            } else {
                Script::Reject("invalid_proof".into(), "The provided proof is invalid.".into())
            };
        }
    }

    /// Number of verification requests received.
    pub fn call_count(&self) -> usize {
        self.calls.lock().map(|c| c.len()).unwrap_or(0)
    }

    /// `(action, signal)` of every request, in order.
    pub fn calls(&self) -> Vec<(String, Option<String>)> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }
}

impl ProofVerifier for NullVerifier {
    fn verify<'a>(
        &'a self,
        _proof: &'a ProofPayload,
        action: &'a str,
        signal: Option<&'a str>,
    ) -> BoxFuture<'a, Result<VerifyResponse, WorldIdError>> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push((action.to_string(), signal.map(String::from)));
        }
        let script = self
            .script
            .lock()
            .map(|s| s.clone())
            .unwrap_or(Script::Unreachable);
        Box::pin(async move {
            match script {
                Script::Accept => Ok(VerifyResponse::accepted()),
                Script::Reject(code, detail) => Ok(VerifyResponse::rejected(code, detail)),
                Script::Unreachable => Err(WorldIdError::Unreachable("null verifier offline".into())),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use petition_worldid::VerificationLevel;

    fn proof() -> ProofPayload {
        ProofPayload {
            proof: "p".into(),
            merkle_root: "r".into(),
            nullifier_hash: "n".into(),
            verification_level: VerificationLevel::Orb,
            version: None,
        }
    }

    #[tokio::test]
    async fn records_calls_and_follows_script() {
        let v = NullVerifier::accepting();
        assert!(v.verify(&proof(), "a", Some("s")).await.unwrap().success);
        v.set_accepting(false);
        assert!(!v.verify(&proof(), "b", None).await.unwrap().success);
        assert_eq!(
            v.calls(),
            vec![("a".to_string(), Some("s".to_string())), ("b".to_string(), None)]
        );
    }

    #[tokio::test]
    async fn unreachable_errors() {
        let v = NullVerifier::unreachable();
        assert!(v.verify(&proof(), "a", None).await.is_err());
        assert_eq!(v.call_count(), 1);
    }
}
