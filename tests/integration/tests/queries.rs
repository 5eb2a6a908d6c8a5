//! Integration test: verification and search over a populated registry.

use chrono::Duration;
use diploma_core::{validity_window, Credential};
use diploma_integration_tests::Harness;
use diploma_registry::SearchFilter;

/// Helper: a registry with two students at two institutions and four
/// credentials between them.
fn populated() -> (Harness, Vec<Credential>) {
    let h = Harness::in_memory();
    let ada = h.student("Ada");
    let alan = h.student("Alan");
    let mit = h.institution("MIT");
    let eth = h.institution("ETH");
    let lifecycle = h.registry.lifecycle();

    let credentials = vec![
        lifecycle
            .issue(&ada.id, &mit.id, "Computer Science", "BSc", 2022)
            .unwrap(),
        lifecycle
            .issue(&ada.id, &eth.id, "Computer Science", "MSc", 2024)
            .unwrap(),
        lifecycle
            .issue(&alan.id, &mit.id, "Mathematics", "BSc Honours", 2024)
            .unwrap(),
        lifecycle
            .issue(&alan.id, &eth.id, "Theoretical Physics", "PhD", 2028)
            .unwrap(),
    ];
    (h, credentials)
}

#[test]
fn test_verify_finds_current_credential() {
    let (h, creds) = populated();
    let query = h.registry.query();

    let found = query
        .verify(&creds[0].student_id, &creds[0].institution_id)
        .unwrap();
    assert_eq!(found, creds[0]);

    // Course and degree play no part in verification.
    let found = query
        .verify(&creds[2].student_id, &creds[2].institution_id)
        .unwrap();
    assert_eq!(found.course, "Mathematics");
}

#[test]
fn test_verify_never_returns_revoked_or_expired() {
    let (h, creds) = populated();
    let query = h.registry.query();
    let c = &creds[1];

    h.registry.lifecycle().revoke(&c.id, "fraud").unwrap();
    assert!(query
        .verify(&c.student_id, &c.institution_id)
        .unwrap_err()
        .is_not_found());

    // Everything else still verifies until the window closes.
    let other = &creds[3];
    assert!(query.verify(&other.student_id, &other.institution_id).is_ok());
    h.clock.advance(validity_window() + Duration::seconds(1));
    for c in &creds {
        assert!(query.verify(&c.student_id, &c.institution_id).is_err());
    }
}

#[test]
fn test_renewal_keeps_credential_verifiable() {
    let (h, creds) = populated();
    let c = &creds[0];

    h.clock.advance(validity_window() - Duration::days(1));
    h.registry.lifecycle().renew(&c.id).unwrap();
    h.clock.advance(Duration::days(30));

    let query = h.registry.query();
    assert_eq!(
        query.verify(&c.student_id, &c.institution_id).unwrap().id,
        c.id
    );
    assert!(query
        .verify(&creds[1].student_id, &creds[1].institution_id)
        .is_err());
}

#[test]
fn test_search_without_filters_returns_everything() {
    let (h, creds) = populated();
    assert_eq!(
        h.registry.query().search(&SearchFilter::default()).unwrap(),
        creds
    );
}

#[test]
fn test_search_filters_are_conjunctive() {
    let (h, creds) = populated();
    let query = h.registry.query();

    let by_course = SearchFilter {
        course: Some("Science".into()),
        ..Default::default()
    };
    assert_eq!(query.search(&by_course).unwrap(), creds[..2].to_vec());

    let by_degree_and_year = SearchFilter {
        degree: Some("BSc".into()),
        graduation_year: Some(2024),
        ..Default::default()
    };
    assert_eq!(
        query.search(&by_degree_and_year).unwrap(),
        vec![creds[2].clone()]
    );

    let nothing = SearchFilter {
        course: Some("Physics".into()),
        degree: Some("BSc".into()),
        graduation_year: None,
    };
    assert!(query.search(&nothing).unwrap_err().is_not_found());
}

#[test]
fn test_search_includes_revoked_credentials() {
    let (h, creds) = populated();
    h.registry.lifecycle().revoke(&creds[3].id, "withdrawn").unwrap();

    let filter = SearchFilter {
        degree: Some("PhD".into()),
        ..Default::default()
    };
    let found = h.registry.query().search(&filter).unwrap();
    assert_eq!(found.len(), 1);
    assert!(found[0].revoked);
}
