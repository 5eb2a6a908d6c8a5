//! RocksDB storage backend.
//!
//! One column family per record type; values are JSON-encoded records and
//! keys are the record ids.

use rocksdb::{ColumnFamily, ColumnFamilyDescriptor, IteratorMode, Options, DB};
use std::marker::PhantomData;
use std::path::Path;
use std::sync::Arc;

use diploma_core::{Credential, CredentialShare, Institution, Notification, Student};

use crate::collection::{Collection, Record};
use crate::error::{StoreError, StoreResult};

/// Column family names for every record type.
const COLUMN_FAMILIES: [&str; 5] = [
    Credential::COLLECTION,
    Institution::COLLECTION,
    Student::COLLECTION,
    CredentialShare::COLLECTION,
    Notification::COLLECTION,
];

/// RocksDB-backed storage shared by the collections it hands out.
pub struct RocksStorage {
    db: Arc<DB>,
}

impl RocksStorage {
    /// Open or create a RocksDB database at the given path with column families.
    pub fn open(path: &Path) -> StoreResult<Self> {
        std::fs::create_dir_all(path)?;

        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cf_descriptors = COLUMN_FAMILIES
            .iter()
            .map(|name| ColumnFamilyDescriptor::new(*name, Options::default()));

        let db = DB::open_cf_descriptors(&opts, path, cf_descriptors)?;

        Ok(Self { db: Arc::new(db) })
    }

    /// A typed view over the column family for `T`.
    pub fn collection<T: Record>(&self) -> RocksCollection<T> {
        RocksCollection {
            db: self.db.clone(),
            _record: PhantomData,
        }
    }
}

/// A collection stored in one RocksDB column family.
pub struct RocksCollection<T> {
    db: Arc<DB>,
    _record: PhantomData<fn() -> T>,
}

impl<T: Record> RocksCollection<T> {
    fn cf(&self) -> StoreResult<&ColumnFamily> {
        self.db
            .cf_handle(T::COLLECTION)
            .ok_or_else(|| StoreError::MissingColumnFamily(T::COLLECTION.to_string()))
    }
}

impl<T: Record> Collection<T> for RocksCollection<T> {
    fn insert(&self, record: &T) -> StoreResult<()> {
        let value = serde_json::to_vec(record)?;
        self.db.put_cf(self.cf()?, record.id().as_bytes(), value)?;
        tracing::debug!(collection = T::COLLECTION, id = record.id(), "record stored");
        Ok(())
    }

    fn get(&self, id: &str) -> StoreResult<Option<T>> {
        match self.db.get_cf(self.cf()?, id.as_bytes())? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    fn values(&self) -> StoreResult<Vec<T>> {
        let mut records = Vec::new();
        for item in self.db.iterator_cf(self.cf()?, IteratorMode::Start) {
            let (_key, value) = item?;
            records.push(serde_json::from_slice(&value)?);
        }
        Ok(records)
    }
}
