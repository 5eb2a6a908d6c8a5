use dashmap::DashMap;
use std::sync::{Arc, Mutex};

/// Per-id mutual exclusion for read-modify-write sequences on a record.
///
/// Two callers holding the same id run one after the other; different ids
/// never contend.
#[derive(Default)]
pub struct LockTable {
    locks: DashMap<String, Arc<Mutex<()>>>,
}

impl LockTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `f` while holding the lock for `id`.
    pub fn with_lock<R>(&self, id: &str, f: impl FnOnce() -> R) -> R {
        // Clone the handle out so the shard guard is released before blocking.
        let lock = self
            .locks
            .entry(id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();

        let result = {
            let _guard = lock.lock().unwrap_or_else(|e| e.into_inner());
            f()
        };

        drop(lock);
        self.locks
            .remove_if(id, |_, held| Arc::strong_count(held) == 1);
        result
    }

    /// Number of ids with an outstanding lock entry.
    pub fn len(&self) -> usize {
        self.locks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}
