//! Errors raised while constructing core types.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypesError {
    #[error("petition id must not be empty")]
    EmptyId,

    #[error("petition id contains whitespace: {0:?}")]
    InvalidId(String),
}
