//! In-memory collection.
//!
//! Same semantics as the RocksDB backend, but nothing survives a restart.

use std::collections::BTreeMap;
use std::sync::RwLock;

use crate::collection::{Collection, Record};
use crate::error::{StoreError, StoreResult};

/// In-memory collection ordered by id. Thread-safe via RwLock.
pub struct MemoryCollection<T> {
    records: RwLock<BTreeMap<String, T>>,
}

impl<T> MemoryCollection<T> {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(BTreeMap::new()),
        }
    }
}

impl<T> Default for MemoryCollection<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Record> Collection<T> for MemoryCollection<T> {
    fn insert(&self, record: &T) -> StoreResult<()> {
        let mut records = self.records.write().map_err(|_| StoreError::Poisoned)?;
        records.insert(record.id().to_string(), record.clone());
        tracing::debug!(collection = T::COLLECTION, id = record.id(), "record stored");
        Ok(())
    }

    fn get(&self, id: &str) -> StoreResult<Option<T>> {
        let records = self.records.read().map_err(|_| StoreError::Poisoned)?;
        Ok(records.get(id).cloned())
    }

    fn values(&self) -> StoreResult<Vec<T>> {
        let records = self.records.read().map_err(|_| StoreError::Poisoned)?;
        Ok(records.values().cloned().collect())
    }

    fn len(&self) -> StoreResult<usize> {
        let records = self.records.read().map_err(|_| StoreError::Poisoned)?;
        Ok(records.len())
    }
}
