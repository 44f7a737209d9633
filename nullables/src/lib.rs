//! Nullable infrastructure for deterministic testing.
//!
//! Every external dependency of the service (clock, storage, the World ID
//! portal, the in-app verify command, wallet signature checks) sits behind a
//! trait. This crate provides implementations that:
//! - Return deterministic values
//! - Can be controlled programmatically
//! - Record how they were called
//! - Never touch the filesystem or network
//!
//! `NullStore` doubles as the service's in-memory backend.

pub mod auth;
pub mod clock;
pub mod registry;
pub mod source;
pub mod store;
pub mod verifier;

pub use auth::{NullSiweVerifier, NullUserDirectory};
pub use clock::NullClock;
pub use registry::NullActionRegistry;
pub use source::NullProofSource;
pub use store::NullStore;
pub use verifier::NullVerifier;
