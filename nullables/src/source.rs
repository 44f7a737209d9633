//! Nullable proof source: stands in for the in-app verify command.

use futures_util::future::BoxFuture;
use petition_worldid::{
    ProofError, ProofPayload, ProofSource, VerificationLevel, VerifyPayload, WorldIdError,
};
use std::sync::Mutex;

/// Returns a canned payload for every action and records what was asked for.
pub struct NullProofSource {
    payload: Mutex<VerifyPayload>,
    requested: Mutex<Vec<String>>,
}

impl NullProofSource {
    /// Always yields a well-formed success payload.
    pub fn succeeding() -> Self {
        Self::with_payload(VerifyPayload::Success(ProofPayload {
            proof: "0xnullproof".into(),
            merkle_root: "0xnullroot".into(),
            nullifier_hash: "0xnullnullifier".into(),
            verification_level: VerificationLevel::Orb,
            version: Some(1),
        }))
    }

    /// Always yields a client-side error payload.
    pub fn failing(error_code: &str) -> Self {
        Self::with_payload(VerifyPayload::Error(ProofError {
            error_code: error_code.into(),
            version: Some(1),
        }))
    }

    pub fn with_payload(payload: VerifyPayload) -> Self {
        Self {
            payload: Mutex::new(payload),
            requested: Mutex::new(Vec::new()),
        }
    }

    pub fn set_payload(&self, payload: VerifyPayload) {
        if let Ok(mut p) = self.payload.lock() {
            *p = payload;
        }
    }

    /// Actions proofs were requested for, in order.
    pub fn requested_actions(&self) -> Vec<String> {
        self.requested.lock().map(|r| r.clone()).unwrap_or_default()
    }
}

impl ProofSource for NullProofSource {
    fn request_proof<'a>(
        &'a self,
        action: &'a str,
        _level: &'a VerificationLevel,
    ) -> BoxFuture<'a, Result<VerifyPayload, WorldIdError>> {
        if let Ok(mut requested) = self.requested.lock() {
            requested.push(action.to_string());
        }
        let payload = self
            .payload
            .lock()
            .map(|p| p.clone())
            .map_err(|_| WorldIdError::ProofSource("null proof source poisoned".into()));
        Box::pin(async move { payload })
    }
}
