//! Where proofs come from.
//!
//! Inside the mini-app host, the verify command produces the payload. Outside
//! of it (CLI, tests) a payload prepared elsewhere is replayed from a file or
//! from memory.

use crate::error::WorldIdError;
use crate::types::{VerificationLevel, VerifyPayload};

use futures_util::future::BoxFuture;
use std::path::PathBuf;

/// Produces a verify payload for an action.
pub trait ProofSource: Send + Sync {
    fn request_proof<'a>(
        &'a self,
        action: &'a str,
        level: &'a VerificationLevel,
    ) -> BoxFuture<'a, Result<VerifyPayload, WorldIdError>>;
}

/// Reads a single JSON verify payload from disk on every request.
#[derive(Clone, Debug)]
pub struct FileProofSource {
    path: PathBuf,
}

impl FileProofSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    async fn load(&self) -> Result<VerifyPayload, WorldIdError> {
        let raw = tokio::fs::read(&self.path).await.map_err(|e| {
            WorldIdError::ProofSource(format!("cannot read {}: {e}", self.path.display()))
        })?;
        serde_json::from_slice(&raw).map_err(|e| {
            WorldIdError::ProofSource(format!("{} is not a verify payload: {e}", self.path.display()))
        })
    }
}

impl ProofSource for FileProofSource {
    fn request_proof<'a>(
        &'a self,
        action: &'a str,
        level: &'a VerificationLevel,
    ) -> BoxFuture<'a, Result<VerifyPayload, WorldIdError>> {
        tracing::debug!(%action, %level, path = %self.path.display(), "loading proof from file");
        Box::pin(self.load())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn reads_payload_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("proof.json");
        std::fs::write(&path, br#"{"status":"error","error_code":"user_rejected"}"#).unwrap();
        let source = FileProofSource::new(&path);
        let payload = source
            .request_proof("create-petition", &VerificationLevel::Orb)
            .await
            .unwrap();
        assert!(payload.is_error());
    }

    #[tokio::test]
    async fn missing_file_is_a_source_error() {
        let source = FileProofSource::new("/nonexistent/proof.json");
        let err = source
            .request_proof("create-petition", &VerificationLevel::Orb)
            .await
            .unwrap_err();
        assert!(matches!(err, WorldIdError::ProofSource(_)));
    }
}
