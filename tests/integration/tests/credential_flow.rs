//! Integration test: credential lifecycle across the registry, stores, and
//! notification sink.

use chrono::Duration;
use diploma_core::{validity_window, CoreError, CredentialState, EntityKind, InvalidState};
use diploma_integration_tests::Harness;

// =========================================================================
// Issue
// =========================================================================

#[test]
fn test_issue_sets_initial_fields() {
    let h = Harness::in_memory();
    let s = h.student("Ada");
    let i = h.institution("MIT");

    let c = h
        .registry
        .lifecycle()
        .issue(&s.id, &i.id, "CS", "BSc", 2024)
        .expect("issue should succeed");

    assert!(!c.revoked);
    assert_eq!(c.renewal_count, 0);
    assert_eq!(c.issued_at, h.now());
    assert_eq!(c.expiration_date, c.issued_at + validity_window());
    assert_eq!(c.state_at(h.now()), CredentialState::Active);
    assert_eq!(h.registry.lifecycle().get(&c.id).unwrap(), c);

    // Issuing notifies nobody.
    assert_eq!(h.sink.count(), 0);
}

#[test]
fn test_issue_rejects_dangling_references() {
    let h = Harness::in_memory();
    let s = h.student("Ada");
    let i = h.institution("MIT");
    let lifecycle = h.registry.lifecycle();

    assert_eq!(
        lifecycle.issue("ghost", &i.id, "CS", "BSc", 2024).unwrap_err(),
        CoreError::not_found(EntityKind::Student, "ghost")
    );
    assert_eq!(
        lifecycle.issue(&s.id, "ghost", "CS", "BSc", 2024).unwrap_err(),
        CoreError::not_found(EntityKind::Institution, "ghost")
    );
    assert!(h.registry.query().list_all().unwrap_err().is_not_found());
}

#[test]
fn test_issue_requires_course_and_degree() {
    let h = Harness::in_memory();
    let s = h.student("Ada");
    let i = h.institution("MIT");
    let lifecycle = h.registry.lifecycle();

    assert_eq!(
        lifecycle.issue(&s.id, &i.id, "", "BSc", 2024).unwrap_err(),
        CoreError::missing("course")
    );
    assert_eq!(
        lifecycle.issue(&s.id, &i.id, "CS", "", 2024).unwrap_err(),
        CoreError::missing("degree")
    );
}

// =========================================================================
// Revoke / renew scenario
// =========================================================================

#[test]
fn test_revoke_scenario() {
    let h = Harness::in_memory();
    let s1 = h.student("S1");
    let i1 = h.institution("I1");
    let lifecycle = h.registry.lifecycle();

    let c1 = lifecycle.issue(&s1.id, &i1.id, "CS", "BSc", 2024).unwrap();

    // Revoke(C1, "fraud") -> revoked, S1 notified
    let revoked = lifecycle.revoke(&c1.id, "fraud").unwrap();
    assert!(revoked.revoked);
    assert_eq!(
        h.sink.sent_to(&s1.id),
        vec!["Your credential has been revoked: fraud".to_string()]
    );

    // Revoke again -> AlreadyRevoked, still revoked
    assert_eq!(
        lifecycle.revoke(&c1.id, "fraud").unwrap_err(),
        CoreError::InvalidState(InvalidState::AlreadyRevoked)
    );
    assert!(lifecycle.get(&c1.id).unwrap().revoked);

    // Renew -> AlreadyRevoked, expiration and count unchanged
    assert_eq!(
        lifecycle.renew(&c1.id).unwrap_err(),
        CoreError::InvalidState(InvalidState::AlreadyRevoked)
    );
    let stored = lifecycle.get(&c1.id).unwrap();
    assert_eq!(stored.expiration_date, c1.expiration_date);
    assert_eq!(stored.renewal_count, 0);

    // Failed calls sent nothing further.
    assert_eq!(h.sink.count(), 1);

    // Sharing a revoked credential is still allowed.
    let share = h
        .registry
        .sharing()
        .share(&c1.id, "employer-1", h.now() + Duration::days(30), vec!["view".into()])
        .unwrap();
    assert_eq!(share.credential_id, c1.id);
}

#[test]
fn test_revoke_requires_reason_before_lookup() {
    let h = Harness::in_memory();
    assert_eq!(
        h.registry.lifecycle().revoke("ghost", "").unwrap_err(),
        CoreError::missing("reason")
    );
    assert!(h
        .registry
        .lifecycle()
        .revoke("ghost", "fraud")
        .unwrap_err()
        .is_not_found());
}

#[test]
fn test_renew_restarts_window_and_notifies() {
    let h = Harness::in_memory();
    let s = h.student("Ada");
    let i = h.institution("MIT");
    let lifecycle = h.registry.lifecycle();
    let c = lifecycle.issue(&s.id, &i.id, "CS", "BSc", 2024).unwrap();

    h.clock.advance(Duration::days(400));
    let renewed = lifecycle.renew(&c.id).unwrap();
    assert_eq!(renewed.renewal_count, 1);
    assert_eq!(renewed.expiration_date, h.now() + validity_window());
    assert!(renewed.expiration_date > c.expiration_date);

    let sent = h.sink.sent_to(&s.id);
    assert_eq!(sent.len(), 1);
    assert!(sent[0].starts_with("Your credential has been renewed. New expiration date: "));
    assert!(sent[0].ends_with(&renewed.expiration_date.format("%Y-%m-%d").to_string()));
}

#[test]
fn test_expired_credential_cannot_renew_but_can_revoke() {
    let h = Harness::in_memory();
    let s = h.student("Ada");
    let i = h.institution("MIT");
    let lifecycle = h.registry.lifecycle();
    let c = lifecycle.issue(&s.id, &i.id, "CS", "BSc", 2024).unwrap();

    h.clock.advance(validity_window() + Duration::days(1));
    assert_eq!(
        lifecycle.get(&c.id).unwrap().state_at(h.now()),
        CredentialState::Expired
    );
    assert_eq!(
        lifecycle.renew(&c.id).unwrap_err(),
        CoreError::InvalidState(InvalidState::Expired)
    );
    assert_eq!(lifecycle.get(&c.id).unwrap().renewal_count, 0);

    let revoked = lifecycle.revoke(&c.id, "records audit").unwrap();
    assert_eq!(revoked.state_at(h.now()), CredentialState::Revoked);
}

// =========================================================================
// Shares
// =========================================================================

#[test]
fn test_shares_are_listed_per_credential() {
    let h = Harness::in_memory();
    let s = h.student("Ada");
    let i = h.institution("MIT");
    let lifecycle = h.registry.lifecycle();
    let sharing = h.registry.sharing();
    let a = lifecycle.issue(&s.id, &i.id, "CS", "BSc", 2024).unwrap();
    let b = lifecycle.issue(&s.id, &i.id, "Math", "MSc", 2026).unwrap();

    assert!(sharing.shares_for(&a.id).unwrap_err().is_not_found());

    let expires = h.now() + Duration::days(7);
    let first = sharing.share(&a.id, "r-1", expires, vec!["view".into()]).unwrap();
    let second = sharing
        .share(&a.id, "r-2", expires, vec!["view".into(), "download".into()])
        .unwrap();
    sharing.share(&b.id, "r-1", expires, vec![]).unwrap();

    assert_eq!(sharing.shares_for(&a.id).unwrap(), vec![first, second]);
    assert_eq!(sharing.shares_for(&b.id).unwrap().len(), 1);
    assert!(sharing
        .share("ghost", "r-1", expires, vec![])
        .unwrap_err()
        .is_not_found());
}
