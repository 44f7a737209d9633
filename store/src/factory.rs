//! Construction of new petition records, shared by all backends.

use crate::StoreError;
use petition_crypto::IdGenerator;
use petition_types::{Clock, Petition};
use std::sync::Arc;

/// How many ids are drawn before a collision is reported as an error.
pub const MAX_ID_ATTEMPTS: usize = 3;

/// Mints petitions: a generated id, the current time, zero signatures.
#[derive(Clone)]
pub struct PetitionFactory {
    ids: IdGenerator,
    clock: Arc<dyn Clock>,
}

impl PetitionFactory {
    pub fn new(ids: IdGenerator, clock: Arc<dyn Clock>) -> Self {
        Self { ids, clock }
    }

    /// Build a petition whose id does not appear in `existing`.
    pub fn mint(
        &self,
        existing: &[Petition],
        title: &str,
        description: &str,
    ) -> Result<Petition, StoreError> {
        for _ in 0..MAX_ID_ATTEMPTS {
            let id = self.ids.generate()?;
            if existing.iter().any(|p| p.id == id) {
                tracing::warn!(petition_id = %id, "generated id collides with a stored petition");
                continue;
            }
            return Ok(Petition::new(id, title, description, self.clock.now()));
        }
        Err(StoreError::Duplicate(format!(
            "no unique id after {MAX_ID_ATTEMPTS} attempts"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use petition_types::{PetitionId, SystemClock, Timestamp};

    struct FixedClock(Timestamp);

    impl Clock for FixedClock {
        fn now(&self) -> Timestamp {
            self.0
        }
    }

    #[test]
    fn mint_uses_clock_and_zero_count() {
        let at = Timestamp::from_millis(1_000);
        let factory = PetitionFactory::new(IdGenerator::new("k"), Arc::new(FixedClock(at)));
        let p = factory.mint(&[], "Title", "Body").unwrap();
        assert_eq!(p.created_at, at);
        assert_eq!(p.signature_count, 0);
        assert_eq!(p.title, "Title");
        assert!(p.id.is_generated_form());
    }

    #[test]
    fn mint_avoids_existing_ids() {
        let factory = PetitionFactory::new(IdGenerator::new("k"), Arc::new(SystemClock));
        let first = factory.mint(&[], "a", "b").unwrap();
        let second = factory.mint(std::slice::from_ref(&first), "a", "b").unwrap();
        assert_ne!(first.id, second.id);
        assert!(PetitionId::new(second.id.as_str()).is_ok());
    }
}
