//! `GET|POST|PUT /petitions`.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use petition_store::StoreError;
use petition_types::{Petition, PetitionId};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::validation::Validator;
use crate::{ApiError, AppState};

#[derive(Debug, Serialize, Deserialize)]
pub struct PetitionList {
    pub petitions: Vec<Petition>,
}

/// Store calls touch the disk; keep them off the async workers.
async fn run_store<T, F>(f: F) -> Result<T, ApiError>
where
    F: FnOnce() -> Result<T, StoreError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| ApiError::Internal(format!("store task failed: {e}")))?
        .map_err(ApiError::from)
}

pub async fn list_petitions(State(state): State<AppState>) -> Result<Json<PetitionList>, ApiError> {
    let store = state.store.clone();
    let petitions = run_store(move || store.list()).await?;
    state.metrics.petition_count.set(petitions.len() as i64);
    Ok(Json(PetitionList { petitions }))
}

pub async fn create_petition(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Petition>, ApiError> {
    let Json(body) = body?;
    let mut v = Validator::new(&body)?;
    let title = v.required_string("title");
    let description = v.required_string("description");
    v.finish(())?;

    let store = state.store.clone();
    let (petition, total) = run_store(move || {
        let petition = store.create(&title, &description)?;
        let total = store.count()?;
        Ok((petition, total))
    })
    .await?;

    state.metrics.petitions_created.inc();
    state.metrics.petition_count.set(total as i64);
    tracing::info!(petition_id = %petition.id, title = %petition.title, "petition created");
    Ok(Json(petition))
}

pub async fn sign_petition(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Petition>, ApiError> {
    let Json(body) = body?;
    let mut v = Validator::new(&body)?;
    let id = v.required_string("id");
    v.finish(())?;
    let id = PetitionId::new(id).map_err(|e| ApiError::InvalidRequest(e.to_string()))?;

    let store = state.store.clone();
    let petition = run_store(move || store.increment_signature(&id)).await?;

    state.metrics.signatures_recorded.inc();
    tracing::info!(
        petition_id = %petition.id,
        signatures = petition.signature_count,
        "petition signed"
    );
    Ok(Json(petition))
}
