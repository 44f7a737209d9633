//! Behavioural properties of the JSON file store: fresh petitions start
//! unsigned with unique ids, signing adds exactly one, reads are stable, and
//! concurrent signers never lose an increment.

use std::sync::Arc;

use petition_crypto::IdGenerator;
use petition_store::{PetitionFactory, PetitionStore, StoreError};
use petition_store_json::JsonFileStore;
use petition_types::{PetitionId, SystemClock};
use proptest::prelude::*;

fn temp_store() -> (tempfile::TempDir, Arc<JsonFileStore>) {
    let dir = tempfile::tempdir().expect("temp dir");
    let factory = PetitionFactory::new(IdGenerator::new("props"), Arc::new(SystemClock));
    let store = JsonFileStore::open(dir.path().join("petitions.json"), factory).expect("open");
    (dir, Arc::new(store))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn created_petitions_are_unsigned_and_unique(
        entries in prop::collection::vec(("[a-zA-Z ]{1,30}", "[a-zA-Z .]{1,80}"), 1..8)
    ) {
        let (_dir, store) = temp_store();
        let mut seen = std::collections::HashSet::new();
        for (title, description) in &entries {
            let p = store.create(title, description).unwrap();
            prop_assert_eq!(p.signature_count, 0);
            prop_assert!(seen.insert(p.id.clone()));
        }

        let listed = store.list().unwrap();
        prop_assert_eq!(listed.len(), entries.len());
        for (p, (title, description)) in listed.iter().zip(&entries) {
            prop_assert_eq!(&p.title, title);
            prop_assert_eq!(&p.description, description);
            prop_assert_eq!(p.signature_count, 0);
        }
    }

    #[test]
    fn each_signature_adds_exactly_one(signs in 1usize..10) {
        let (_dir, store) = temp_store();
        let original = store.create("Bike lanes", "On every street").unwrap();
        let other = store.create("Other", "Untouched").unwrap();

        for i in 1..=signs {
            let p = store.increment_signature(&original.id).unwrap();
            prop_assert_eq!(p.signature_count, i as u64);
            prop_assert_eq!(&p.title, &original.title);
            prop_assert_eq!(&p.description, &original.description);
            prop_assert_eq!(p.created_at, original.created_at);
        }
        prop_assert_eq!(store.get(&other.id).unwrap().signature_count, 0);
    }
}

#[test]
fn list_is_idempotent() {
    let (_dir, store) = temp_store();
    store.create("a", "b").unwrap();
    store.create("c", "d").unwrap();
    assert_eq!(store.list().unwrap(), store.list().unwrap());
}

#[test]
fn signing_unknown_petition_mutates_nothing() {
    let (_dir, store) = temp_store();
    let p = store.create("a", "b").unwrap();
    let before = store.list().unwrap();
    let err = store
        .increment_signature(&PetitionId::new("missing").unwrap())
        .unwrap_err();
    assert!(matches!(err, StoreError::NotFound(_)));
    assert_eq!(store.list().unwrap(), before);
    assert_eq!(store.get(&p.id).unwrap().signature_count, 0);
}

#[test]
fn concurrent_signatures_are_not_lost() {
    let (_dir, store) = temp_store();
    let p = store.create("p1", "contended").unwrap();

    let threads: Vec<_> = (0..8)
        .map(|_| {
            let store = Arc::clone(&store);
            let id = p.id.clone();
            std::thread::spawn(move || {
                for _ in 0..10 {
                    store.increment_signature(&id).unwrap();
                }
            })
        })
        .collect();
    for t in threads {
        t.join().expect("signer thread panicked");
    }

    assert_eq!(store.get(&p.id).unwrap().signature_count, 80);
}
