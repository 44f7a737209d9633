use proptest::prelude::*;

use petition_types::{sign_action_name, Petition, PetitionId, Timestamp};

proptest! {
    /// Any non-empty, whitespace-free string is a valid id and displays unchanged.
    #[test]
    fn petition_id_preserves_input(s in "[A-Za-z0-9_-]{1,80}") {
        let id = PetitionId::new(s.clone()).unwrap();
        prop_assert_eq!(id.to_string(), s);
    }

    /// Generated-form detection matches exactly 64 lowercase hex characters.
    #[test]
    fn generated_form_matches_hex64(s in "[0-9a-f]{64}") {
        prop_assert!(PetitionId::new(s).unwrap().is_generated_form());
    }

    /// Recording signatures only changes the counter.
    #[test]
    fn record_signature_touches_only_count(
        title in ".{1,40}",
        description in ".{1,200}",
        millis in 0i64..4_000_000_000_000,
        n in 0u64..50,
    ) {
        let original = Petition::new(
            PetitionId::new("p1").unwrap(),
            title,
            description,
            Timestamp::from_millis(millis),
        );
        let mut p = original.clone();
        for _ in 0..n {
            p.record_signature();
        }
        prop_assert_eq!(p.signature_count, n);
        prop_assert_eq!(&p.title, &original.title);
        prop_assert_eq!(&p.description, &original.description);
        prop_assert_eq!(p.created_at, original.created_at);
    }

    /// Petition JSON survives a round trip through the camelCase wire form.
    #[test]
    fn petition_json_roundtrip(count in 0u64..u64::MAX, millis in 0i64..4_000_000_000_000) {
        let mut p = Petition::new(
            PetitionId::new("abc").unwrap(),
            "t",
            "d",
            Timestamp::from_millis(millis),
        );
        p.signature_count = count;
        let json = serde_json::to_string(&p).unwrap();
        let back: Petition = serde_json::from_str(&json).unwrap();
        prop_assert_eq!(back, p);
    }

    #[test]
    fn sign_action_has_prefix(s in "[a-z0-9]{1,64}") {
        let id = PetitionId::new(s.clone()).unwrap();
        prop_assert_eq!(sign_action_name(&id), format!("sign-petition-{}", s));
    }
}
