//! HTTP gateway of the petitions service.
//!
//! Routes:
//! - `GET|POST|PUT /petitions`: list, create and sign petitions
//! - `POST /verify-proof`: check a World ID proof before a mutation
//! - `POST /actions`: register a World ID action (API key required)
//! - `GET /auth/nonce`, `POST /auth/wallet`: wallet sign-in, when wired
//! - `GET /health`, `GET /metrics`

pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod server;
pub mod shutdown;
pub mod state;
pub mod validation;

pub use config::{GatewayConfig, StoreBackend};
pub use error::{ApiError, GatewayError};
pub use metrics::GatewayMetrics;
pub use server::{router, GatewayServer};
pub use shutdown::ShutdownController;
pub use state::AppState;
pub use validation::FieldErrors;
