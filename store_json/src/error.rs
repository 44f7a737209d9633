use thiserror::Error;

#[derive(Debug, Error)]
pub enum JsonStoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed petitions file: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("cannot encode petitions: {0}")]
    Encode(serde_json::Error),

    #[error("store lock poisoned")]
    Poisoned,
}

impl From<JsonStoreError> for petition_store::StoreError {
    fn from(e: JsonStoreError) -> Self {
        match e {
            JsonStoreError::Malformed(inner) => {
                petition_store::StoreError::Corruption(inner.to_string())
            }
            JsonStoreError::Encode(inner) => {
                petition_store::StoreError::Serialization(inner.to_string())
            }
            other => petition_store::StoreError::Backend(other.to_string()),
        }
    }
}
