//! `GET /auth/nonce`, `POST /auth/wallet`.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use petition_auth::{IssuedNonce, WalletCredentials, WalletUser};

use crate::{ApiError, AppState};

pub async fn issue_nonce(State(state): State<AppState>) -> Result<Json<IssuedNonce>, ApiError> {
    let issuer = state.nonce_issuer().ok_or_else(|| {
        ApiError::ServerConfiguration("HMAC_SECRET_KEY is not configured.".into())
    })?;
    Ok(Json(issuer.issue()?))
}

pub async fn wallet_login(
    State(state): State<AppState>,
    body: Result<Json<WalletCredentials>, JsonRejection>,
) -> Result<Json<WalletUser>, ApiError> {
    let Json(credentials) = body?;
    let authorizer = state
        .authorizer()
        .ok_or_else(|| ApiError::ServerConfiguration("wallet sign-in is not enabled.".into()))?;
    let user = authorizer.authorize(&credentials).await?;
    state.metrics.wallet_logins.inc();
    Ok(Json(user))
}
