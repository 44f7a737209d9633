//! JSON file storage backend for the petitions service.
//!
//! Implements [`petition_store::PetitionStore`] over a single file holding a
//! JSON array of every petition.

pub mod error;
pub mod file;

pub use error::JsonStoreError;
pub use file::JsonFileStore;
