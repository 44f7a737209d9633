//! Gateway error types.
//!
//! [`ApiError`] is what handlers return; it turns into the JSON error body
//! `{error, code, detail, attribute?, errors?}` with a matching HTTP status.
//! [`GatewayError`] covers startup (configuration, binding, wiring).

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use petition_auth::AuthError;
use petition_store::StoreError;
use petition_worldid::WorldIdError;
use serde_json::{json, Map, Value};
use thiserror::Error;

use crate::validation::FieldErrors;

/// Errors that end a request.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing or wrong API key, or a failed wallet sign-in.
    #[error("unauthorized: {detail}")]
    Unauthorized {
        detail: String,
        attribute: Option<String>,
    },

    /// One or more request fields failed validation.
    #[error("validation failed: {0}")]
    Validation(FieldErrors),

    /// No petition with the given id.
    #[error("petition not found: {0}")]
    PetitionNotFound(String),

    /// The body was not the JSON the route expects.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// World ID refused to create the action.
    #[error("action creation failed ({status}): {detail}")]
    ActionCreationFailed { status: u16, detail: String },

    /// World ID answered with something that is not JSON.
    #[error("invalid upstream response: {detail}")]
    InvalidResponse { detail: String, raw: String },

    /// World ID could not be reached or failed at the transport level.
    #[error("upstream error: {0}")]
    Upstream(String),

    /// A setting the route depends on is missing.
    #[error("server configuration error: {0}")]
    ServerConfiguration(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn unauthorized(detail: impl Into<String>) -> Self {
        ApiError::Unauthorized {
            detail: detail.into(),
            attribute: None,
        }
    }

    /// Machine-readable error code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Unauthorized { .. } => "unauthorized",
            Self::Validation(_) => "validation_error",
            Self::PetitionNotFound(_) => "not_found",
            Self::InvalidRequest(_) => "invalid_request",
            Self::ActionCreationFailed { .. } => "action_creation_failed",
            Self::InvalidResponse { .. } => "invalid_response",
            Self::Upstream(_) => "upstream_error",
            Self::ServerConfiguration(_) => "server_configuration_error",
            Self::Internal(_) => "internal_server_error",
        }
    }

    /// Returns the HTTP status code for this error.
    ///
    /// Action creation failures mirror the upstream status; anything outside
    /// the error range becomes 502.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            Self::Validation(_) | Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::PetitionNotFound(_) => StatusCode::NOT_FOUND,
            Self::ActionCreationFailed { status, .. } => StatusCode::from_u16(*status)
                .ok()
                .filter(|s| s.is_client_error() || s.is_server_error())
                .unwrap_or(StatusCode::BAD_GATEWAY),
            Self::Upstream(_) => StatusCode::BAD_GATEWAY,
            Self::InvalidResponse { .. }
            | Self::ServerConfiguration(_)
            | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn summary(&self) -> &'static str {
        match self {
            Self::Unauthorized { .. } => "Unauthorized",
            Self::Validation(_) => "Validation failed",
            Self::PetitionNotFound(_) => "Petition not found",
            Self::InvalidRequest(_) => "Invalid request",
            Self::ActionCreationFailed { .. } => "Failed to create action",
            Self::InvalidResponse { .. } => "Invalid response from World ID",
            Self::Upstream(_) => "World ID unavailable",
            Self::ServerConfiguration(_) => "Server misconfigured",
            Self::Internal(_) => "Internal server error",
        }
    }

    fn detail(&self) -> String {
        match self {
            Self::Unauthorized { detail, .. } => detail.clone(),
            Self::Validation(errors) => errors.to_string(),
            Self::PetitionNotFound(id) => format!("No petition with id {id}."),
            Self::InvalidRequest(detail)
            | Self::Upstream(detail)
            | Self::ServerConfiguration(detail) => detail.clone(),
            Self::ActionCreationFailed { detail, .. } | Self::InvalidResponse { detail, .. } => {
                detail.clone()
            }
            // Storage and crypto internals stay in the log.
            Self::Internal(_) => "The request could not be completed.".to_string(),
        }
    }

    fn attribute(&self) -> Option<String> {
        match self {
            Self::Unauthorized { attribute, .. } => attribute.clone(),
            Self::Validation(errors) => errors.first_field().map(String::from),
            Self::PetitionNotFound(_) => Some("id".to_string()),
            Self::ActionCreationFailed { .. } => Some("action".to_string()),
            _ => None,
        }
    }

    /// The JSON error body.
    pub fn body(&self) -> Value {
        let mut body = Map::new();
        body.insert("error".into(), json!(self.summary()));
        body.insert("code".into(), json!(self.code()));
        body.insert("detail".into(), json!(self.detail()));
        if let Some(attribute) = self.attribute() {
            body.insert("attribute".into(), json!(attribute));
        }
        match self {
            Self::Validation(errors) => {
                body.insert("errors".into(), json!(errors));
            }
            Self::InvalidResponse { raw, .. } => {
                body.insert("raw_response".into(), json!(raw));
            }
            _ => {}
        }
        Value::Object(body)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(code = self.code(), status = status.as_u16(), "{self}");
        } else {
            tracing::warn!(code = self.code(), status = status.as_u16(), "{self}");
        }
        (status, Json(self.body())).into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound(id) => ApiError::PetitionNotFound(id),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<WorldIdError> for ApiError {
    fn from(e: WorldIdError) -> Self {
        match e {
            WorldIdError::Unreachable(detail) | WorldIdError::RequestFailed(detail) => {
                ApiError::Upstream(detail)
            }
            WorldIdError::InvalidResponse { detail, raw } => {
                ApiError::InvalidResponse { detail, raw }
            }
            WorldIdError::ActionCreationFailed { status, detail } => {
                ApiError::ActionCreationFailed { status, detail }
            }
            WorldIdError::ProofSource(detail) => ApiError::Internal(detail),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::InvalidNonce => ApiError::Unauthorized {
                detail: "Invalid signed nonce.".into(),
                attribute: Some("signedNonce".into()),
            },
            AuthError::InvalidSignature => ApiError::Unauthorized {
                detail: "Wallet signature could not be verified.".into(),
                attribute: Some("finalPayloadJson".into()),
            },
            AuthError::InvalidPayload(detail) => ApiError::InvalidRequest(detail),
            AuthError::RateLimited(detail) | AuthError::Upstream(detail) => {
                ApiError::Upstream(detail)
            }
            AuthError::Crypto(e) => ApiError::Internal(e.to_string()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::InvalidRequest(rejection.body_text())
    }
}

/// Startup failures.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("metrics error: {0}")]
    Metrics(#[from] prometheus::Error),

    #[error("store error: {0}")]
    Store(#[from] StoreError),
}
