//! LMDB-backed name store.
//!
//! Uses the heed crate (Rust bindings for LMDB) so that mapped names survive
//! process restarts. Keys are [`NameKey`] encodings; values are
//! `[mapped_at millis: 8 bytes LE][name: UTF-8]`.
//!
//! # Thread Safety
//!
//! LMDB provides ACID transactions. The backend uses:
//! - Read transactions for `get_name`, `entry` and `stats`
//! - Write transactions for `update_name` and `delete_name`; deleting every
//!   name of an id scans and deletes the id prefix in one write transaction
//! - Hit/miss counters are atomics, bumped by `get_name` only

use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

use apicmap_core::{MapperError, MapperResult, NameType, StoreError};
use chrono::{DateTime, Utc};
use heed::types::Bytes;
use heed::{Database, Env, EnvOpenOptions};

use super::key::NameKey;
use super::traits::{NameStore, StoreStats, StoredName};

/// Error type for LMDB store operations.
#[derive(Debug, thiserror::Error)]
pub enum LmdbStoreError {
    /// Failed to open or create the LMDB environment.
    #[error("Failed to open LMDB environment: {0}")]
    EnvOpen(String),

    /// Failed to open the database within the environment.
    #[error("Failed to open database: {0}")]
    DbOpen(String),

    /// Transaction error.
    #[error("Transaction error: {0}")]
    Transaction(String),

    /// Stored value could not be decoded.
    #[error("Corrupt record: {0}")]
    Corrupt(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convert LmdbStoreError to MapperError.
impl From<LmdbStoreError> for MapperError {
    fn from(e: LmdbStoreError) -> Self {
        MapperError::Store(StoreError::Backend {
            reason: e.to_string(),
        })
    }
}

fn txn_err(e: heed::Error) -> LmdbStoreError {
    LmdbStoreError::Transaction(e.to_string())
}

/// LMDB-backed name store.
///
/// # Example
///
/// ```ignore
/// use apicmap_storage::{LmdbNameStore, NameStore};
/// use apicmap_core::NameType;
///
/// let store = LmdbNameStore::new("/var/lib/apicmap", 16)?;
/// store.update_name("net-1", NameType::Network, "web_net-1")?;
/// assert_eq!(store.get_name("net-1", NameType::Network)?, Some("web_net-1".into()));
/// ```
pub struct LmdbNameStore {
    /// The LMDB environment.
    env: Env,
    /// The main database (single unnamed database).
    db: Database<Bytes, Bytes>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl LmdbNameStore {
    /// Create a new LMDB name store.
    ///
    /// # Arguments
    ///
    /// * `path` - Directory where LMDB files will be stored
    /// * `max_size_mb` - Maximum size of the database in megabytes
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The directory cannot be created
    /// - LMDB environment cannot be opened
    /// - Database cannot be created
    pub fn new<P: AsRef<Path>>(path: P, max_size_mb: usize) -> Result<Self, LmdbStoreError> {
        std::fs::create_dir_all(&path)?;

        // SAFETY: the environment is opened once per directory by this store
        // and not reopened elsewhere in the process.
        let env = unsafe {
            EnvOpenOptions::new()
                .map_size(max_size_mb * 1024 * 1024)
                .max_dbs(1)
                .open(path.as_ref())
        }
        .map_err(|e| LmdbStoreError::EnvOpen(e.to_string()))?;

        let mut wtxn = env.write_txn().map_err(txn_err)?;

        let db: Database<Bytes, Bytes> = env
            .create_database(&mut wtxn, None)
            .map_err(|e| LmdbStoreError::DbOpen(e.to_string()))?;

        wtxn.commit().map_err(txn_err)?;

        tracing::debug!(path = %path.as_ref().display(), max_size_mb, "Opened LMDB name store");

        Ok(Self {
            env,
            db,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        })
    }

    /// Get the full stored record, including when it was written.
    ///
    /// Does not touch the hit/miss counters.
    pub fn entry(&self, resource_id: &str, name_type: NameType) -> MapperResult<Option<StoredName>> {
        let key = NameKey::new(resource_id, name_type).encode();
        let rtxn = self.env.read_txn().map_err(txn_err)?;

        match self.db.get(&rtxn, &key).map_err(txn_err)? {
            Some(bytes) => Ok(Some(decode_value(bytes)?)),
            None => Ok(None),
        }
    }

    /// Collect the keys under `prefix` within an open transaction.
    fn keys_with_prefix(
        &self,
        txn: &heed::RoTxn,
        prefix: &[u8],
    ) -> Result<Vec<Vec<u8>>, LmdbStoreError> {
        let mut keys = Vec::new();
        for result in self.db.prefix_iter(txn, prefix).map_err(txn_err)? {
            let (key, _) = result.map_err(txn_err)?;
            keys.push(key.to_vec());
        }

        Ok(keys)
    }
}

fn encode_value(stored: &StoredName) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(8 + stored.name.len());
    bytes.extend_from_slice(&stored.mapped_at.timestamp_millis().to_le_bytes());
    bytes.extend_from_slice(stored.name.as_bytes());
    bytes
}

fn decode_value(bytes: &[u8]) -> Result<StoredName, LmdbStoreError> {
    if bytes.len() < 8 {
        return Err(LmdbStoreError::Corrupt(format!(
            "value is {} bytes, expected at least 8",
            bytes.len()
        )));
    }
    let (stamp, name) = bytes.split_at(8);
    let millis = i64::from_le_bytes(
        stamp
            .try_into()
            .map_err(|_| LmdbStoreError::Corrupt("invalid timestamp".into()))?,
    );
    let mapped_at = DateTime::from_timestamp_millis(millis).unwrap_or_else(Utc::now);
    let name = String::from_utf8(name.to_vec())
        .map_err(|e| LmdbStoreError::Corrupt(e.to_string()))?;

    Ok(StoredName { name, mapped_at })
}

impl NameStore for LmdbNameStore {
    fn get_name(&self, resource_id: &str, name_type: NameType) -> MapperResult<Option<String>> {
        let name = self
            .entry(resource_id, name_type)?
            .map(|stored| stored.name);
        let counter = if name.is_some() { &self.hits } else { &self.misses };
        counter.fetch_add(1, Ordering::Relaxed);
        Ok(name)
    }

    fn update_name(&self, resource_id: &str, name_type: NameType, name: &str) -> MapperResult<()> {
        let key = NameKey::new(resource_id, name_type).encode();
        let value = encode_value(&StoredName::new(name));

        let mut wtxn = self.env.write_txn().map_err(txn_err)?;
        self.db.put(&mut wtxn, &key, &value).map_err(txn_err)?;
        wtxn.commit().map_err(txn_err)?;

        Ok(())
    }

    fn delete_name(&self, resource_id: &str, name_type: Option<NameType>) -> MapperResult<u64> {
        let mut wtxn = self.env.write_txn().map_err(txn_err)?;
        let keys = match name_type {
            Some(name_type) => vec![NameKey::new(resource_id, name_type).encode()],
            None => self.keys_with_prefix(&wtxn, &NameKey::id_prefix(resource_id))?,
        };

        let mut deleted = 0u64;
        for key in &keys {
            if self.db.delete(&mut wtxn, key).map_err(txn_err)? {
                deleted += 1;
            }
        }
        wtxn.commit().map_err(txn_err)?;

        Ok(deleted)
    }

    fn stats(&self) -> MapperResult<StoreStats> {
        let rtxn = self.env.read_txn().map_err(txn_err)?;
        let entry_count = self.db.len(&rtxn).map_err(txn_err)?;

        Ok(StoreStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entry_count,
        })
    }
}
