//! The verify-then-mutate flow behind every user action.
//!
//! ```text
//! Idle ──start──▶ Pending ──verified + mutated──▶ Success
//!                    │
//!                    └──any failure──▶ Failed ──FAILURE_DISPLAY──▶ Idle
//! ```
//!
//! One operation runs at a time; starting another while `Pending` fails
//! with [`FlowError::Busy`]. Nothing is retried automatically.

use crate::client::GatewayClient;
use crate::error::FlowError;

use petition_types::{sign_action_name, Clock, Petition, PetitionId, Timestamp, CREATE_PETITION_ACTION};
use petition_worldid::{CreateActionRequest, ProofSource, VerificationLevel, VerifyPayload};
use serde_json::Value;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

/// How long a failure stays visible before the flow returns to `Idle`.
pub const FAILURE_DISPLAY: Duration = Duration::from_secs(2);

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FlowState {
    Idle,
    Pending,
    Success,
    Failed { reason: String, since: Timestamp },
}

pub struct Orchestrator {
    gateway: GatewayClient,
    proofs: Arc<dyn ProofSource>,
    clock: Arc<dyn Clock>,
    level: VerificationLevel,
    state: Mutex<FlowState>,
}

/// Marks the flow `Pending` until finished. Dropping it unfinished (the
/// caller cancelled the future) records a failure.
struct PendingFlow<'a> {
    owner: &'a Orchestrator,
    finished: bool,
}

impl PendingFlow<'_> {
    fn finish<T>(mut self, result: Result<T, FlowError>) -> Result<T, FlowError> {
        self.finished = true;
        let next = match &result {
            Ok(_) => FlowState::Success,
            Err(e) => FlowState::Failed {
                reason: e.to_string(),
                since: self.owner.clock.now(),
            },
        };
        *self.owner.lock() = next;
        result
    }
}

impl Drop for PendingFlow<'_> {
    fn drop(&mut self) {
        if !self.finished {
            *self.owner.lock() = FlowState::Failed {
                reason: "cancelled".to_string(),
                since: self.owner.clock.now(),
            };
        }
    }
}

impl Orchestrator {
    pub fn new(gateway: GatewayClient, proofs: Arc<dyn ProofSource>, clock: Arc<dyn Clock>) -> Self {
        Self {
            gateway,
            proofs,
            clock,
            level: VerificationLevel::Orb,
            state: Mutex::new(FlowState::Idle),
        }
    }

    pub fn with_level(mut self, level: VerificationLevel) -> Self {
        self.level = level;
        self
    }

    pub fn gateway(&self) -> &GatewayClient {
        &self.gateway
    }

    fn lock(&self) -> MutexGuard<'_, FlowState> {
        // A poisoned lock only means a panic mid-assignment; the state is
        // still a valid enum value.
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Current state. A failure older than [`FAILURE_DISPLAY`] reads as
    /// (and becomes) `Idle`.
    pub fn state(&self) -> FlowState {
        let mut state = self.lock();
        self.expire(&mut state);
        state.clone()
    }

    fn expire(&self, state: &mut FlowState) {
        if let FlowState::Failed { since, .. } = state {
            let shown_ms = since.millis_until(self.clock.now());
            if u128::from(shown_ms) >= FAILURE_DISPLAY.as_millis() {
                *state = FlowState::Idle;
            }
        }
    }

    fn begin(&self) -> Result<PendingFlow<'_>, FlowError> {
        let mut state = self.lock();
        self.expire(&mut state);
        if *state == FlowState::Pending {
            return Err(FlowError::Busy);
        }
        *state = FlowState::Pending;
        Ok(PendingFlow {
            owner: self,
            finished: false,
        })
    }

    /// Obtain a proof for `action` and have the gateway verify it.
    async fn verify(&self, action: &str) -> Result<(), FlowError> {
        let payload = self.proofs.request_proof(action, &self.level).await?;
        if let VerifyPayload::Error(e) = &payload {
            tracing::warn!(%action, error_code = %e.error_code, "verification failed on the device");
            return Err(FlowError::ClientProof(e.error_code.clone()));
        }

        let outcome = self.gateway.verify_proof(&payload, action, None).await?;
        if !outcome.verify_res.success {
            tracing::warn!(%action, code = ?outcome.verify_res.code, "proof rejected by the gateway");
            return Err(FlowError::Rejected {
                code: outcome.verify_res.code,
                detail: outcome.verify_res.detail,
            });
        }
        tracing::debug!(%action, "proof accepted");
        Ok(())
    }

    /// Verify, create the petition, then register its sign action.
    pub async fn create_petition(&self, title: &str, description: &str) -> Result<Petition, FlowError> {
        let flow = self.begin()?;
        let result: Result<Petition, FlowError> = async {
            self.verify(CREATE_PETITION_ACTION).await?;
            let petition = self.gateway.create_petition(title, description).await?;
            tracing::info!(petition_id = %petition.id, "petition created");
            if let Err(source) = self.gateway.register_action(&sign_action_request(&petition.id)).await {
                tracing::error!(petition_id = %petition.id, "sign action registration failed: {source}");
                return Err(FlowError::ActionRegistration {
                    petition: Box::new(petition),
                    source,
                });
            }
            Ok(petition)
        }
        .await;
        flow.finish(result)
    }

    /// Verify for `sign-petition-{id}`, then record the signature.
    pub async fn sign_petition(&self, id: &PetitionId) -> Result<Petition, FlowError> {
        let flow = self.begin()?;
        let result: Result<Petition, FlowError> = async {
            self.verify(&sign_action_name(id)).await?;
            let petition = self.gateway.sign_petition(id).await?;
            tracing::info!(petition_id = %petition.id, signatures = petition.signature_count, "petition signed");
            Ok(petition)
        }
        .await;
        flow.finish(result)
    }

    /// Register the sign action of an existing petition, e.g. after
    /// [`FlowError::ActionRegistration`]. Does not verify, create or change
    /// the flow state.
    pub async fn register_sign_action(&self, id: &PetitionId) -> Result<Value, FlowError> {
        Ok(self.gateway.register_action(&sign_action_request(id)).await?)
    }
}

/// Registration request for the action that signs petition `id`.
pub fn sign_action_request(id: &PetitionId) -> CreateActionRequest {
    CreateActionRequest {
        action: sign_action_name(id),
        description: format!("Sign the petition with ID {id}"),
        max_verifications: 1,
        name: Some(format!("Sign Petition {id}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sign_action_request_uses_petition_id() {
        let id = PetitionId::new("42").unwrap();
        let request = sign_action_request(&id);
        assert_eq!(request.action, "sign-petition-42");
        assert_eq!(request.max_verifications, 1);
        assert_eq!(request.name.as_deref(), Some("Sign Petition 42"));
    }
}
