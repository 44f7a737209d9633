//! Nullable store: thread-safe in-memory petition storage.

use petition_crypto::IdGenerator;
use petition_store::{PetitionFactory, PetitionStore, StoreError};
use petition_types::{Clock, Petition, PetitionId, SystemClock};
use std::sync::{Arc, Mutex, MutexGuard};

/// An in-memory petition store.
/// Thread-safe for use with tokio's multi-threaded runtime.
pub struct NullStore {
    petitions: Mutex<Vec<Petition>>,
    factory: PetitionFactory,
}

impl NullStore {
    pub fn new(factory: PetitionFactory) -> Self {
        Self {
            petitions: Mutex::new(Vec::new()),
            factory,
        }
    }

    /// A store with a fixed id key and the given clock.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self::new(PetitionFactory::new(IdGenerator::new("null-store"), clock))
    }

    /// Seed a petition directly, bypassing id generation.
    pub fn insert(&self, petition: Petition) -> Result<(), StoreError> {
        self.lock()?.push(petition);
        Ok(())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Vec<Petition>>, StoreError> {
        self.petitions
            .lock()
            .map_err(|_| StoreError::Backend("null store lock poisoned".into()))
    }
}

impl Default for NullStore {
    fn default() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }
}

impl PetitionStore for NullStore {
    fn list(&self) -> Result<Vec<Petition>, StoreError> {
        Ok(self.lock()?.clone())
    }

    fn create(&self, title: &str, description: &str) -> Result<Petition, StoreError> {
        let mut petitions = self.lock()?;
        let petition = self.factory.mint(&petitions, title, description)?;
        petitions.push(petition.clone());
        Ok(petition)
    }

    fn increment_signature(&self, id: &PetitionId) -> Result<Petition, StoreError> {
        let mut petitions = self.lock()?;
        let petition = petitions
            .iter_mut()
            .find(|p| &p.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        petition.record_signature();
        Ok(petition.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::NullClock;

    #[test]
    fn create_then_list() {
        let store = NullStore::with_clock(Arc::new(NullClock::new(42)));
        let p = store.create("t", "d").unwrap();
        assert_eq!(p.created_at.as_millis(), 42);
        assert_eq!(store.list().unwrap(), vec![p]);
    }

    #[test]
    fn increment_unknown_is_not_found() {
        let store = NullStore::default();
        let err = store
            .increment_signature(&PetitionId::new("x").unwrap())
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[test]
    fn seeded_petitions_can_be_signed() {
        let store = NullStore::default();
        let id = PetitionId::new("p1").unwrap();
        store
            .insert(Petition::new(id.clone(), "t", "d", petition_types::Timestamp::from_millis(0)))
            .unwrap();
        assert_eq!(store.increment_signature(&id).unwrap().signature_count, 1);
        assert_eq!(store.get(&id).unwrap().signature_count, 1);
    }
}
