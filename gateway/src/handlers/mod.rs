//! Route handlers. Each returns `Result<_, ApiError>`, so every failure is
//! converted to the JSON error body at the request boundary.

pub mod actions;
pub mod auth;
pub mod health;
pub mod petitions;
pub mod verify;

pub use actions::create_action;
pub use auth::{issue_nonce, wallet_login};
pub use health::{health, metrics};
pub use petitions::{create_petition, list_petitions, sign_petition};
pub use verify::verify_proof;
