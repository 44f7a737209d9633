use thiserror::Error;

#[derive(Debug, Error)]
pub enum WorldIdError {
    #[error("World ID API unreachable: {0}")]
    Unreachable(String),

    #[error("HTTP request to World ID failed: {0}")]
    RequestFailed(String),

    #[error("invalid response from World ID: {detail}")]
    InvalidResponse { detail: String, raw: String },

    #[error("action creation failed ({status}): {detail}")]
    ActionCreationFailed { status: u16, detail: String },

    #[error("proof source failed: {0}")]
    ProofSource(String),
}

impl WorldIdError {
    pub(crate) fn from_send(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            WorldIdError::Unreachable(format!("request timed out: {e}"))
        } else if e.is_connect() {
            WorldIdError::Unreachable(format!("connection failed: {e}"))
        } else {
            WorldIdError::RequestFailed(e.to_string())
        }
    }
}
