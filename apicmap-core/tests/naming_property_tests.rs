//! Property-Based Tests for APIC Name Synthesis
//!
//! Truncation, hyphen collapsing and both naming strategies must hold for
//! arbitrary (including non-ASCII) input.

use apicmap_core::{
    collapse_hyphens, synthesize, truncate, NamingStrategy, MAX_NAME_LENGTH,
};
use proptest::prelude::*;

fn char_len(s: &str) -> usize {
    s.chars().count()
}

fn arb_text() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-z0-9 -]{0,80}",
        "[a-f0-9]{8}-[a-f0-9]{4}-[a-f0-9]{4}-[a-f0-9]{4}-[a-f0-9]{12}",
        any::<String>(),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// Truncation length is min(len, max(n, 0)).
    #[test]
    fn prop_truncate_length(s in arb_text(), n in -20i64..100) {
        let out = truncate(&s, n);
        prop_assert_eq!(char_len(out), char_len(&s).min(n.max(0) as usize));
    }

    /// Truncation always yields a prefix, and negative budgets yield "".
    #[test]
    fn prop_truncate_prefix(s in arb_text(), n in -20i64..100) {
        let out = truncate(&s, n);
        prop_assert!(s.starts_with(out));
        if n < 0 {
            prop_assert_eq!(out, "");
        }
    }

    /// Collapsed strings contain no "--" and collapsing is idempotent.
    #[test]
    fn prop_collapse_hyphens_idempotent(s in arb_text()) {
        let once = collapse_hyphens(&s).into_owned();
        prop_assert!(!once.contains("--"));
        let twice = collapse_hyphens(&once).into_owned();
        prop_assert_eq!(once, twice);
    }

    /// use_uuid names end with "_<normalized id>" whenever the suffix fits,
    /// and never exceed the APIC limit.
    #[test]
    fn prop_uuid_strategy_suffix(name in arb_text(), id in arb_text()) {
        let result = synthesize(Some(&name), &id, NamingStrategy::UseUuid);
        prop_assert!(char_len(&result) <= MAX_NAME_LENGTH);

        let suffix = format!("_{}", collapse_hyphens(&id));
        if !name.is_empty() && char_len(&suffix) <= MAX_NAME_LENGTH {
            prop_assert!(result.ends_with(&suffix), "{:?} should end with {:?}", result, suffix);
        }
    }

    /// use_name yields the truncated, normalized canonical name (or id).
    #[test]
    fn prop_name_strategy(name in proptest::option::of(arb_text()), id in arb_text()) {
        let result = synthesize(name.as_deref(), &id, NamingStrategy::UseName);
        let source = match name.as_deref() {
            Some(n) if !n.is_empty() => n,
            _ => id.as_str(),
        };
        let expected = truncate(&collapse_hyphens(source), MAX_NAME_LENGTH as i64).to_string();
        prop_assert_eq!(result, expected);
    }

    /// Synthesis is deterministic.
    #[test]
    fn prop_synthesize_deterministic(name in arb_text(), id in arb_text()) {
        for strategy in [NamingStrategy::UseUuid, NamingStrategy::UseName] {
            prop_assert_eq!(
                synthesize(Some(&name), &id, strategy),
                synthesize(Some(&name), &id, strategy)
            );
        }
    }
}
