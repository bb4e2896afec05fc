//! Name store trait and statistics.

use std::sync::Arc;

use apicmap_core::{MapperResult, NameType};
use chrono::{DateTime, Utc};

/// A cached APIC name and when it was written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredName {
    pub name: String,
    pub mapped_at: DateTime<Utc>,
}

impl StoredName {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            mapped_at: Utc::now(),
        }
    }
}

/// Persistent mapping from (resource id, name type) to an APIC name.
///
/// Implementations hold at most one name per key; `update_name` always
/// overwrites. No cross-call atomicity is promised: two callers racing on the
/// same key both write and the last write wins.
pub trait NameStore: Send + Sync {
    /// Get the cached name, or `None` if the key was never mapped.
    fn get_name(&self, resource_id: &str, name_type: NameType) -> MapperResult<Option<String>>;

    /// Insert or overwrite the cached name.
    fn update_name(&self, resource_id: &str, name_type: NameType, name: &str) -> MapperResult<()>;

    /// Delete cached names for a resource id.
    ///
    /// With `Some(name_type)` only that entry is removed; with `None` every
    /// entry for the id is removed. Returns the number of deleted entries.
    fn delete_name(&self, resource_id: &str, name_type: Option<NameType>) -> MapperResult<u64>;

    /// Get store statistics.
    fn stats(&self) -> MapperResult<StoreStats>;
}

impl<S: NameStore + ?Sized> NameStore for Arc<S> {
    fn get_name(&self, resource_id: &str, name_type: NameType) -> MapperResult<Option<String>> {
        (**self).get_name(resource_id, name_type)
    }

    fn update_name(&self, resource_id: &str, name_type: NameType, name: &str) -> MapperResult<()> {
        (**self).update_name(resource_id, name_type, name)
    }

    fn delete_name(&self, resource_id: &str, name_type: Option<NameType>) -> MapperResult<u64> {
        (**self).delete_name(resource_id, name_type)
    }

    fn stats(&self) -> MapperResult<StoreStats> {
        (**self).stats()
    }
}

/// Statistics about name store usage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreStats {
    /// Number of lookups that found a name.
    pub hits: u64,
    /// Number of lookups that found nothing.
    pub misses: u64,
    /// Number of entries currently stored.
    pub entry_count: u64,
}

impl StoreStats {
    /// Calculate the hit rate (0.0 to 1.0).
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}
