//! World ID integration.
//!
//! Speaks to the World ID developer portal on behalf of the gateway:
//! - `POST /api/v2/verify/{app_id}` checks a zero-knowledge proof of
//!   personhood for an action ([`CloudVerifier`])
//! - `POST /api/v2/create-action/{app_id}` (or the legacy `/api/v1/actions`)
//!   registers a new action ([`CloudActionRegistry`])
//!
//! Both sit behind traits so the gateway and the client orchestrator can run
//! against deterministic doubles.

pub mod actions;
pub mod client;
pub mod error;
pub mod source;
pub mod types;
pub mod verifier;

pub use actions::{ActionApiVersion, ActionRegistry, CloudActionRegistry};
pub use client::{WorldIdClient, DEFAULT_BASE_URL};
pub use error::WorldIdError;
pub use source::{FileProofSource, ProofSource};
pub use types::{
    ActionRecord, CreateActionRequest, ProofError, ProofPayload, VerificationLevel,
    VerifyPayload, VerifyResponse,
};
pub use verifier::{CloudVerifier, ProofVerifier};
