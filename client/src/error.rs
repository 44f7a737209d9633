use petition_types::Petition;
use petition_worldid::WorldIdError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("gateway unreachable: {0}")]
    Unreachable(String),

    #[error("HTTP request failed: {0}")]
    RequestFailed(String),

    /// The gateway answered with its JSON error body.
    #[error("gateway returned {status} {code}: {detail}")]
    Api {
        status: u16,
        code: String,
        detail: String,
    },

    #[error("invalid response from gateway: {0}")]
    InvalidResponse(String),
}

impl ClientError {
    pub(crate) fn from_send(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ClientError::Unreachable(format!("request timed out: {e}"))
        } else if e.is_connect() {
            ClientError::Unreachable(format!("connection failed: {e}"))
        } else {
            ClientError::RequestFailed(e.to_string())
        }
    }

    /// Gateway error code, if the gateway produced one.
    pub fn code(&self) -> Option<&str> {
        match self {
            ClientError::Api { code, .. } => Some(code),
            _ => None,
        }
    }
}

/// Why a create or sign flow ended in `Failed` (or never started).
#[derive(Debug, Error)]
pub enum FlowError {
    #[error("another operation is still pending")]
    Busy,

    #[error("proof request failed: {0}")]
    ProofSource(#[from] WorldIdError),

    /// The verify command itself reported an error; nothing was sent.
    #[error("verification failed on the device: {0}")]
    ClientProof(String),

    #[error("proof rejected: {}", .code.as_deref().unwrap_or("unknown"))]
    Rejected {
        code: Option<String>,
        detail: Option<String>,
    },

    #[error("gateway request failed: {0}")]
    Gateway(#[from] ClientError),

    /// The petition exists but its sign action is not registered yet. Retry
    /// with [`Orchestrator::register_sign_action`](crate::Orchestrator::register_sign_action).
    #[error("petition {} created but its sign action was not registered: {source}", .petition.id)]
    ActionRegistration {
        petition: Box<Petition>,
        source: ClientError,
    },
}
