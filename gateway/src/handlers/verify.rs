//! `POST /verify-proof`.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use petition_worldid::{VerifyPayload, VerifyResponse};
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::validation::FieldErrors;
use crate::{ApiError, AppState};

#[derive(Debug, Deserialize, Serialize)]
pub struct VerifyRequest {
    pub payload: VerifyPayload,
    pub action: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signal: Option<String>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct VerifyReply {
    /// The client-reported error payload, echoed back.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<VerifyPayload>,
    #[serde(rename = "verifyRes")]
    pub verify_res: VerifyResponse,
    /// Mirrors the HTTP status.
    pub status: u16,
}

impl VerifyReply {
    fn new(status: StatusCode, verify_res: VerifyResponse) -> (StatusCode, Json<Self>) {
        (
            status,
            Json(Self {
                error: None,
                verify_res,
                status: status.as_u16(),
            }),
        )
    }
}

/// Gate a mutation on a World ID proof.
///
/// A payload the client itself marked as an error is answered with 400
/// without contacting the verifier. Otherwise the verifier's verdict is
/// returned as `verifyRes`: 200 when accepted, 400 when rejected.
pub async fn verify_proof(
    State(state): State<AppState>,
    body: Result<Json<VerifyRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<VerifyReply>), ApiError> {
    let Json(request) = body?;
    if request.action.trim().is_empty() {
        let mut errors = FieldErrors::default();
        errors.add("action", "action must not be empty");
        return Err(ApiError::Validation(errors));
    }

    let proof = match &request.payload {
        VerifyPayload::Error(e) => {
            state.metrics.proofs_short_circuited.inc();
            tracing::warn!(
                action = %request.action,
                error_code = %e.error_code,
                "verification failed on the client"
            );
            let (status, Json(mut reply)) =
                VerifyReply::new(StatusCode::BAD_REQUEST, VerifyResponse::default());
            reply.error = Some(request.payload.clone());
            return Ok((status, Json(reply)));
        }
        VerifyPayload::Success(proof) => proof,
    };

    if state.app_id().is_none() {
        return Err(ApiError::ServerConfiguration("APP_ID is not configured.".into()));
    }

    let started = Instant::now();
    let verdict = state
        .verifier
        .verify(proof, &request.action, request.signal.as_deref())
        .await?;
    state
        .metrics
        .verify_latency_ms
        .observe(started.elapsed().as_secs_f64() * 1000.0);

    if verdict.success {
        state.metrics.proofs_accepted.inc();
        tracing::info!(
            action = %request.action,
            verification_level = %proof.verification_level,
            "proof verified"
        );
        Ok(VerifyReply::new(StatusCode::OK, verdict))
    } else {
        state.metrics.proofs_rejected.inc();
        tracing::warn!(
            action = %request.action,
            verification_level = %proof.verification_level,
            merkle_root = %proof.merkle_root,
            nullifier_hash = %proof.nullifier_hash,
            code = verdict.code.as_deref().unwrap_or(""),
            "proof rejected"
        );
        Ok(VerifyReply::new(StatusCode::BAD_REQUEST, verdict))
    }
}
