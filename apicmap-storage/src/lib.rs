//! APICMAP Storage - Name Store Trait and Backends
//!
//! Defines the persistence contract for mapped APIC names plus two
//! implementations: an in-memory store for tests and embedding, and an
//! LMDB store for names that must survive restarts.

pub mod key;
pub mod lmdb_backend;
pub mod traits;

pub use key::NameKey;
pub use lmdb_backend::{LmdbNameStore, LmdbStoreError};
pub use traits::{NameStore, StoreStats, StoredName};

use apicmap_core::{MapperResult, NameType, StoreError};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;

// ============================================================================
// IN-MEMORY STORE
// ============================================================================

/// In-memory name store.
#[derive(Debug, Default)]
pub struct InMemoryNameStore {
    names: RwLock<HashMap<NameKey, StoredName>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl InMemoryNameStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the full stored record, including when it was written.
    pub fn entry(&self, resource_id: &str, name_type: NameType) -> MapperResult<Option<StoredName>> {
        let names = self.names.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(names.get(&NameKey::new(resource_id, name_type)).cloned())
    }

    /// Number of stored names.
    pub fn len(&self) -> usize {
        self.names.read().map(|names| names.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remove every stored name.
    pub fn clear(&self) -> MapperResult<()> {
        self.names
            .write()
            .map_err(|_| StoreError::LockPoisoned)?
            .clear();
        Ok(())
    }
}

impl NameStore for InMemoryNameStore {
    fn get_name(&self, resource_id: &str, name_type: NameType) -> MapperResult<Option<String>> {
        let name = self
            .entry(resource_id, name_type)?
            .map(|stored| stored.name);
        let counter = if name.is_some() { &self.hits } else { &self.misses };
        counter.fetch_add(1, Ordering::Relaxed);
        Ok(name)
    }

    fn update_name(&self, resource_id: &str, name_type: NameType, name: &str) -> MapperResult<()> {
        let mut names = self.names.write().map_err(|_| StoreError::LockPoisoned)?;
        names.insert(NameKey::new(resource_id, name_type), StoredName::new(name));
        Ok(())
    }

    fn delete_name(&self, resource_id: &str, name_type: Option<NameType>) -> MapperResult<u64> {
        let mut names = self.names.write().map_err(|_| StoreError::LockPoisoned)?;
        let deleted = match name_type {
            Some(name_type) => names
                .remove(&NameKey::new(resource_id, name_type))
                .map_or(0, |_| 1),
            None => {
                let before = names.len();
                names.retain(|key, _| key.resource_id() != resource_id);
                (before - names.len()) as u64
            }
        };
        Ok(deleted)
    }

    fn stats(&self) -> MapperResult<StoreStats> {
        Ok(StoreStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entry_count: self.len() as u64,
        })
    }
}
