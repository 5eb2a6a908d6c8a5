//! Fixtures shared by the cross-crate scenario tests.

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use diploma_core::{Clock, Institution, ManualClock, Student};
use diploma_notify::RecordingSink;
use diploma_registry::Registry;
use diploma_store::Stores;

/// A registry over the given stores with a recording sink and a manual clock
/// starting at 2024-06-01T00:00:00Z.
pub struct Harness {
    pub registry: Registry,
    pub stores: Stores,
    pub sink: Arc<RecordingSink>,
    pub clock: Arc<ManualClock>,
}

impl Harness {
    pub fn in_memory() -> Self {
        Self::with_stores(Stores::in_memory())
    }

    pub fn with_stores(stores: Stores) -> Self {
        let start = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        Self::with_stores_at(stores, Arc::new(ManualClock::new(start)))
    }

    /// Reuse a clock, e.g. across a store reopen.
    pub fn with_stores_at(stores: Stores, clock: Arc<ManualClock>) -> Self {
        let sink = Arc::new(RecordingSink::new());
        let registry = Registry::new(&stores, sink.clone(), clock.clone());
        Self {
            registry,
            stores,
            sink,
            clock,
        }
    }

    pub fn student(&self, name: &str) -> Student {
        let email = format!("{}@example.edu", name.to_lowercase());
        self.registry
            .directory()
            .create_student(name, &email)
            .unwrap()
    }

    pub fn institution(&self, name: &str) -> Institution {
        self.registry
            .directory()
            .create_institution(name, "1 University Ave")
            .unwrap()
    }

    pub fn now(&self) -> chrono::DateTime<Utc> {
        self.clock.now()
    }
}
