//! Client side of the petitions mini-app.
//!
//! [`GatewayClient`] speaks to the gateway's HTTP routes. [`Orchestrator`]
//! sequences each user action as verify → submit proof → mutate and exposes
//! the resulting [`FlowState`].

pub mod client;
pub mod error;
pub mod orchestrator;

pub use client::{GatewayClient, VerifyOutcome};
pub use error::{ClientError, FlowError};
pub use orchestrator::{sign_action_request, FlowState, Orchestrator, FAILURE_DISPLAY};
