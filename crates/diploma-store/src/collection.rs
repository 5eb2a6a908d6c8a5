//! The collection trait and the set of collections the registry runs on.

use serde::{de::DeserializeOwned, Serialize};
use std::path::Path;
use std::sync::Arc;

use diploma_core::{Credential, CredentialShare, EntityKind, Institution, Notification, Student};

use crate::error::StoreResult;
use crate::memory::MemoryCollection;
use crate::rocks::RocksStorage;

/// A record that can be kept in a collection.
pub trait Record: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Collection (column family) name.
    const COLLECTION: &'static str;

    fn id(&self) -> &str;
}

impl Record for Credential {
    const COLLECTION: &'static str = "credentials";

    fn id(&self) -> &str {
        &self.id
    }
}

impl Record for Institution {
    const COLLECTION: &'static str = "institutions";

    fn id(&self) -> &str {
        &self.id
    }
}

impl Record for Student {
    const COLLECTION: &'static str = "students";

    fn id(&self) -> &str {
        &self.id
    }
}

impl Record for CredentialShare {
    const COLLECTION: &'static str = "credential_shares";

    fn id(&self) -> &str {
        &self.id
    }
}

impl Record for Notification {
    const COLLECTION: &'static str = "notifications";

    fn id(&self) -> &str {
        &self.id
    }
}

/// Map an entity kind to its collection name.
pub fn collection_name(kind: EntityKind) -> &'static str {
    match kind {
        EntityKind::Credential => Credential::COLLECTION,
        EntityKind::Institution => Institution::COLLECTION,
        EntityKind::Student => Student::COLLECTION,
        EntityKind::CredentialShare => CredentialShare::COLLECTION,
    }
}

/// A key-value collection of records keyed by id.
///
/// `insert` overwrites any record already stored under the same id, which is
/// how updated credentials are persisted.
pub trait Collection<T: Record>: Send + Sync {
    /// Store `record` under its id.
    fn insert(&self, record: &T) -> StoreResult<()>;

    /// Point lookup by id.
    fn get(&self, id: &str) -> StoreResult<Option<T>>;

    /// Every record, in key order.
    fn values(&self) -> StoreResult<Vec<T>>;

    fn len(&self) -> StoreResult<usize> {
        Ok(self.values()?.len())
    }

    fn is_empty(&self) -> StoreResult<bool> {
        Ok(self.len()? == 0)
    }
}

/// The collections a registry and its notification log run on. Built once
/// at start-up and handed to the components that need them.
#[derive(Clone)]
pub struct Stores {
    pub credentials: Arc<dyn Collection<Credential>>,
    pub institutions: Arc<dyn Collection<Institution>>,
    pub students: Arc<dyn Collection<Student>>,
    pub shares: Arc<dyn Collection<CredentialShare>>,
    pub notifications: Arc<dyn Collection<Notification>>,
}

impl Stores {
    /// Fresh in-memory collections. Contents are lost on drop.
    pub fn in_memory() -> Self {
        Self {
            credentials: Arc::new(MemoryCollection::<Credential>::new()),
            institutions: Arc::new(MemoryCollection::<Institution>::new()),
            students: Arc::new(MemoryCollection::<Student>::new()),
            shares: Arc::new(MemoryCollection::<CredentialShare>::new()),
            notifications: Arc::new(MemoryCollection::<Notification>::new()),
        }
    }

    /// Collections backed by a RocksDB database at `path`, one column family
    /// each.
    pub fn rocksdb(path: &Path) -> StoreResult<Self> {
        let storage = RocksStorage::open(path)?;
        tracing::info!(path = %path.display(), "rocksdb storage opened");
        Ok(Self {
            credentials: Arc::new(storage.collection::<Credential>()),
            institutions: Arc::new(storage.collection::<Institution>()),
            students: Arc::new(storage.collection::<Student>()),
            shares: Arc::new(storage.collection::<CredentialShare>()),
            notifications: Arc::new(storage.collection::<Notification>()),
        })
    }
}
