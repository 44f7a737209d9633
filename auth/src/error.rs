use petition_utils::Retryable;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid signed nonce")]
    InvalidNonce,

    #[error("invalid wallet payload: {0}")]
    InvalidPayload(String),

    #[error("wallet signature rejected")]
    InvalidSignature,

    #[error("rate limited by upstream: {0}")]
    RateLimited(String),

    #[error("upstream error: {0}")]
    Upstream(String),

    #[error("crypto error: {0}")]
    Crypto(#[from] petition_crypto::CryptoError),
}

impl Retryable for AuthError {
    fn is_retryable(&self) -> bool {
        matches!(self, AuthError::RateLimited(_))
    }
}
