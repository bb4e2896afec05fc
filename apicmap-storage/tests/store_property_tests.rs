//! Property-Based Tests for Name Stores
//!
//! Both backends must keep at most one name per (resource id, name type),
//! let the last write win, and honor single-type versus whole-id deletes.

use apicmap_core::NameType;
use apicmap_storage::{InMemoryNameStore, LmdbNameStore, NameStore};
use proptest::prelude::*;
use tempfile::TempDir;
use uuid::Uuid;

fn arb_name_type() -> impl Strategy<Value = NameType> {
    proptest::sample::select(NameType::ALL.to_vec())
}

fn arb_writes() -> impl Strategy<Value = Vec<(usize, NameType, String)>> {
    prop::collection::vec((0usize..4, arb_name_type(), "[a-z_-]{1,20}"), 1..30)
}

fn check_last_write_wins(
    store: &dyn NameStore,
    ids: &[String],
    writes: &[(usize, NameType, String)],
) -> Result<(), TestCaseError> {
    let mut expected = std::collections::HashMap::new();
    for (idx, name_type, name) in writes {
        store
            .update_name(&ids[*idx], *name_type, name)
            .map_err(|e| TestCaseError::fail(e.to_string()))?;
        expected.insert((ids[*idx].clone(), *name_type), name.clone());
    }

    for ((id, name_type), name) in &expected {
        let stored = store
            .get_name(id, *name_type)
            .map_err(|e| TestCaseError::fail(e.to_string()))?;
        prop_assert_eq!(stored.as_deref(), Some(name.as_str()));
    }

    let stats = store.stats().map_err(|e| TestCaseError::fail(e.to_string()))?;
    prop_assert_eq!(stats.entry_count, expected.len() as u64);
    Ok(())
}

fn fresh_ids() -> Vec<String> {
    (0..4).map(|_| Uuid::now_v7().to_string()).collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(50))]

    /// Property: last write wins and there is one entry per key (in-memory).
    #[test]
    fn prop_in_memory_last_write_wins(writes in arb_writes()) {
        let store = InMemoryNameStore::new();
        check_last_write_wins(&store, &fresh_ids(), &writes)?;
    }

    /// Property: last write wins and there is one entry per key (LMDB).
    #[test]
    fn prop_lmdb_last_write_wins(writes in arb_writes()) {
        let dir = TempDir::new().map_err(|e| TestCaseError::fail(e.to_string()))?;
        let store = LmdbNameStore::new(dir.path(), 10)
            .map_err(|e| TestCaseError::fail(e.to_string()))?;
        check_last_write_wins(&store, &fresh_ids(), &writes)?;
    }

    /// Property: deleting all types for an id leaves other ids untouched.
    #[test]
    fn prop_delete_by_id_is_scoped(
        types in prop::collection::hash_set(arb_name_type(), 1..6),
    ) {
        let store = InMemoryNameStore::new();
        let target = Uuid::now_v7().to_string();
        let bystander = Uuid::now_v7().to_string();

        for name_type in &types {
            store.update_name(&target, *name_type, "gone").unwrap();
            store.update_name(&bystander, *name_type, "kept").unwrap();
        }

        let deleted = store.delete_name(&target, None).unwrap();
        prop_assert_eq!(deleted, types.len() as u64);

        for name_type in &types {
            prop_assert_eq!(store.get_name(&target, *name_type).unwrap(), None);
            prop_assert_eq!(
                store.get_name(&bystander, *name_type).unwrap(),
                Some("kept".to_string())
            );
        }
    }
}
