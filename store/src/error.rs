use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("petition not found: {0}")]
    NotFound(String),

    #[error("duplicate key: {0}")]
    Duplicate(String),

    #[error("storage backend error: {0}")]
    Backend(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("store is corrupted: {0}")]
    Corruption(String),
}

impl From<petition_crypto::CryptoError> for StoreError {
    fn from(e: petition_crypto::CryptoError) -> Self {
        StoreError::Backend(format!("id generation failed: {e}"))
    }
}
