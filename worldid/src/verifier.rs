//! Cloud verification of World ID proofs.

use crate::client::WorldIdClient;
use crate::error::WorldIdError;
use crate::types::{ProofPayload, VerifyResponse};

use futures_util::future::BoxFuture;
use serde::Serialize;
use serde_json::Value;

/// Checks a proof of personhood for an action.
pub trait ProofVerifier: Send + Sync {
    /// Ask the verifier whether `proof` is valid for `action` and `signal`.
    ///
    /// `Ok` carries the verdict, accepted or not. `Err` means no verdict was
    /// obtained (transport failure, unreadable reply).
    fn verify<'a>(
        &'a self,
        proof: &'a ProofPayload,
        action: &'a str,
        signal: Option<&'a str>,
    ) -> BoxFuture<'a, Result<VerifyResponse, WorldIdError>>;
}

/// Request body of `POST /api/v2/verify/{app_id}`.
#[derive(Serialize)]
struct CloudVerifyRequest<'a> {
    proof: &'a str,
    merkle_root: &'a str,
    nullifier_hash: &'a str,
    verification_level: &'a str,
    action: &'a str,
    signal_hash: String,
}

/// [`ProofVerifier`] backed by the World ID developer portal.
#[derive(Clone, Debug)]
pub struct CloudVerifier {
    client: WorldIdClient,
    app_id: String,
}

impl CloudVerifier {
    pub fn new(client: WorldIdClient, app_id: impl Into<String>) -> Self {
        Self {
            client,
            app_id: app_id.into(),
        }
    }

    pub fn app_id(&self) -> &str {
        &self.app_id
    }

    async fn verify_cloud_proof(
        &self,
        proof: &ProofPayload,
        action: &str,
        signal: Option<&str>,
    ) -> Result<VerifyResponse, WorldIdError> {
        let url = self.client.url(&format!("/api/v2/verify/{}", self.app_id));
        let body = CloudVerifyRequest {
            proof: &proof.proof,
            merkle_root: &proof.merkle_root,
            nullifier_hash: &proof.nullifier_hash,
            verification_level: proof.verification_level.as_str(),
            action,
            signal_hash: petition_crypto::hash_to_field(signal.unwrap_or("")),
        };

        let (status, text) = self.client.post_json(&url, None, &body).await?;

        let parsed = serde_json::from_str::<Value>(&text);
        if status.is_success() {
            let map = match parsed {
                Ok(Value::Object(map)) => map,
                _ => Default::default(),
            };
            return Ok(VerifyResponse::from_upstream(true, map));
        }

        match parsed {
            Ok(Value::Object(map)) => Ok(VerifyResponse::from_upstream(false, map)),
            _ => Err(WorldIdError::InvalidResponse {
                detail: format!("verifier answered HTTP {status} with a non-JSON body"),
                raw: text,
            }),
        }
    }
}

impl ProofVerifier for CloudVerifier {
    fn verify<'a>(
        &'a self,
        proof: &'a ProofPayload,
        action: &'a str,
        signal: Option<&'a str>,
    ) -> BoxFuture<'a, Result<VerifyResponse, WorldIdError>> {
        Box::pin(self.verify_cloud_proof(proof, action, signal))
    }
}
