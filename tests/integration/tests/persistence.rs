//! Integration test: the registry over RocksDB survives a reopen.

use std::sync::Arc;

use diploma_core::{Clock, CoreError, InvalidState, SystemClock};
use diploma_integration_tests::Harness;
use diploma_notify::{NotificationSink, QueueSink};
use diploma_registry::Registry;
use diploma_store::Stores;

#[test]
fn test_state_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("registry");

    let (student_id, credential_id, clock) = {
        let h = Harness::with_stores(Stores::rocksdb(&path).unwrap());
        let s = h.student("Ada");
        let i = h.institution("MIT");
        let c = h
            .registry
            .lifecycle()
            .issue(&s.id, &i.id, "CS", "BSc", 2024)
            .unwrap();
        h.registry.lifecycle().revoke(&c.id, "fraud").unwrap();
        (s.id, c.id, h.clock.clone())
    };

    let h = Harness::with_stores_at(Stores::rocksdb(&path).unwrap(), clock);
    let stored = h.registry.lifecycle().get(&credential_id).unwrap();
    assert!(stored.revoked);
    assert_eq!(stored.student_id, student_id);
    assert_eq!(
        h.registry.lifecycle().revoke(&credential_id, "fraud").unwrap_err(),
        CoreError::InvalidState(InvalidState::AlreadyRevoked)
    );
    assert_eq!(h.registry.directory().list_students().unwrap().len(), 1);
    assert_eq!(h.registry.directory().list_institutions().unwrap().len(), 1);
}

#[test]
fn test_notification_log_is_persisted() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("registry");
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    let student_id = {
        let stores = Stores::rocksdb(&path).unwrap();
        let queue = Arc::new(QueueSink::new(stores.notifications.clone(), clock.clone()));
        let registry = Registry::new(&stores, queue.clone(), clock.clone());

        let s = registry
            .directory()
            .create_student("Ada", "ada@example.edu")
            .unwrap();
        let i = registry
            .directory()
            .create_institution("MIT", "Cambridge, MA")
            .unwrap();
        let c = registry
            .lifecycle()
            .issue(&s.id, &i.id, "CS", "BSc", 2024)
            .unwrap();
        registry.lifecycle().renew(&c.id).unwrap();
        registry.lifecycle().revoke(&c.id, "fraud").unwrap();
        s.id
    };

    let stores = Stores::rocksdb(&path).unwrap();
    let queue = QueueSink::new(stores.notifications.clone(), clock);
    let messages: Vec<String> = queue
        .notifications_for(&student_id)
        .unwrap()
        .into_iter()
        .map(|n| n.message)
        .collect();
    assert_eq!(messages.len(), 2);
    assert!(messages[0].starts_with("Your credential has been renewed."));
    assert_eq!(messages[1], "Your credential has been revoked: fraud");

    // Direct sends land in the same log.
    queue.send("someone-else", "hello");
    assert_eq!(queue.notifications_for("someone-else").unwrap().len(), 1);
    assert!(queue.notifications_for("nobody").unwrap().is_empty());
}
