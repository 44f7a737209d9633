//! Abstract storage traits for the petitions service.
//!
//! Every backend (JSON file, in-memory for testing) implements
//! [`PetitionStore`]. The gateway depends only on the trait.

pub mod error;
pub mod factory;
pub mod petition;

pub use error::StoreError;
pub use factory::{PetitionFactory, MAX_ID_ATTEMPTS};
pub use petition::PetitionStore;
