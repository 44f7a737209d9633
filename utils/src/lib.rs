//! Shared utilities for the petitions service.

pub mod logging;
pub mod retry;

pub use logging::{init_tracing, LogFormat};
pub use retry::{retry_with_backoff, Retryable, RetryPolicy};
