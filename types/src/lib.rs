//! Fundamental types for the petitions service.
//!
//! Defines the petition record shared by every other crate in the workspace,
//! its identifier, timestamps, the clock abstraction and the naming scheme
//! for World ID actions.

pub mod action;
pub mod error;
pub mod id;
pub mod petition;
pub mod time;

pub use action::{sign_action_name, CREATE_PETITION_ACTION, SIGN_ACTION_PREFIX};
pub use error::TypesError;
pub use id::PetitionId;
pub use petition::Petition;
pub use time::{Clock, SystemClock, Timestamp};
