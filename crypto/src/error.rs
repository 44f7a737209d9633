use thiserror::Error;

#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("OS random source unavailable: {0}")]
    Random(String),

    #[error("invalid key: {0}")]
    InvalidKey(String),
}
