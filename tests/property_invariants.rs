mod common;

use proptest::prelude::*;

use callparser::{call::normalize, engine::LookupEngine};

fn call_like() -> impl Strategy<Value = String> {
    "/?[A-Za-z0-9]{1,3}[0-9][A-Za-z0-9]{0,4}(/[A-Za-z0-9]{1,6}){0,2}/?"
}

fn engine() -> &'static LookupEngine {
    use std::sync::OnceLock;
    static ENGINE: OnceLock<LookupEngine> = OnceLock::new();
    ENGINE.get_or_init(common::fixture_engine)
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        .. ProptestConfig::default()
    })]

    #[test]
    fn prop_lookup_accepts_any_input(raw in any::<String>()) {
        let _ = engine().lookup(&raw);
    }

    #[test]
    fn prop_lookup_is_deterministic(call in call_like()) {
        prop_assert_eq!(engine().lookup(&call), engine().lookup(&call));
    }

    #[test]
    fn prop_case_and_outer_slashes_do_not_matter(call in call_like()) {
        let lower = call.to_ascii_lowercase();
        let padded = format!("  /{call}/ ");
        let expected = engine().lookup(&call);
        prop_assert_eq!(engine().lookup(&lower), expected.clone());
        prop_assert_eq!(engine().lookup(&padded), expected);
    }

    #[test]
    fn prop_survivors_share_the_best_rank(call in call_like()) {
        let structure = engine().classify(&call);
        let ranked = engine().ranked(&structure);
        if let Some(best) = ranked.iter().map(|r| r.rank).max() {
            for r in &ranked {
                prop_assert_eq!(r.rank, best, "{}: survivor below max rank", call);
            }
        }
    }

    #[test]
    fn prop_hits_have_no_duplicate_entities(call in call_like()) {
        let hits = engine().lookup(&call);
        let mut seen = std::collections::BTreeSet::new();
        for hit in &hits {
            prop_assert!(seen.insert((hit.dxcc, hit.country.clone(), hit.province.clone())));
        }
    }

    #[test]
    fn prop_normalize_is_idempotent(raw in "[ a-zA-Z0-9/]{0,16}") {
        if let Some(once) = normalize(&raw) {
            prop_assert_eq!(normalize(&once), Some(once.clone()));
            prop_assert!(!once.starts_with('/') && !once.ends_with('/'));
            prop_assert!(!once.contains("//"));
        }
    }
}
