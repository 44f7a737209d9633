//! Petition storage trait.

use crate::StoreError;
use petition_types::{Petition, PetitionId};

/// Trait for petition storage operations.
///
/// Implementations must make `create` and `increment_signature` atomic with
/// respect to each other within one process: two concurrent increments of the
/// same petition add exactly two.
pub trait PetitionStore: Send + Sync {
    /// All petitions in creation order.
    fn list(&self) -> Result<Vec<Petition>, StoreError>;

    /// Store a new petition with a freshly generated id and no signatures.
    fn create(&self, title: &str, description: &str) -> Result<Petition, StoreError>;

    /// Add one signature. Fails with [`StoreError::NotFound`] and leaves the
    /// store untouched if `id` is unknown.
    fn increment_signature(&self, id: &PetitionId) -> Result<Petition, StoreError>;

    /// Look up a single petition.
    fn get(&self, id: &PetitionId) -> Result<Petition, StoreError> {
        self.list()?
            .into_iter()
            .find(|p| &p.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    /// Number of stored petitions.
    fn count(&self) -> Result<u64, StoreError> {
        self.list().map(|v| v.len() as u64)
    }
}
