use std::sync::Arc;

use diploma_core::Clock;
use diploma_notify::NotificationSink;
use diploma_store::Stores;

use crate::directory::Directory;
use crate::lifecycle::LifecycleEngine;
use crate::query::QueryEngine;
use crate::sharing::SharingEngine;

/// All registry engines wired to one set of stores, one notification sink,
/// and one clock.
pub struct Registry {
    directory: Directory,
    lifecycle: LifecycleEngine,
    sharing: SharingEngine,
    query: QueryEngine,
}

impl Registry {
    pub fn new(stores: &Stores, sink: Arc<dyn NotificationSink>, clock: Arc<dyn Clock>) -> Self {
        Self {
            directory: Directory::new(
                stores.students.clone(),
                stores.institutions.clone(),
                clock.clone(),
            ),
            lifecycle: LifecycleEngine::new(
                stores.credentials.clone(),
                stores.students.clone(),
                stores.institutions.clone(),
                sink,
                clock.clone(),
            ),
            sharing: SharingEngine::new(stores.credentials.clone(), stores.shares.clone()),
            query: QueryEngine::new(stores.credentials.clone(), clock),
        }
    }

    /// Students and institutions.
    pub fn directory(&self) -> &Directory {
        &self.directory
    }

    /// Issue, renew, revoke, and point lookup of credentials.
    pub fn lifecycle(&self) -> &LifecycleEngine {
        &self.lifecycle
    }

    pub fn sharing(&self) -> &SharingEngine {
        &self.sharing
    }

    /// Verification, search, and listing.
    pub fn query(&self) -> &QueryEngine {
        &self.query
    }
}
