use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::credential_state::{CredentialEvent, CredentialState, CredentialStateMachine};
use crate::error::CoreError;

/// Length of the validity window in days (five 365-day years).
pub const VALIDITY_WINDOW_DAYS: i64 = 5 * 365;

/// The fixed period a credential stays current after issuance or renewal.
pub fn validity_window() -> Duration {
    Duration::days(VALIDITY_WINDOW_DAYS)
}

/// Generate a new opaque record identifier.
///
/// UUID v7 is time-ordered, so ordered stores enumerate records in
/// creation order.
pub fn new_id() -> String {
    uuid::Uuid::now_v7().to_string()
}

/// A record asserting that a student completed a course and degree at an
/// institution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credential {
    pub id: String,
    pub student_id: String,
    pub institution_id: String,
    pub course: String,
    pub degree: String,
    /// Stored as given; has no effect on expiration.
    pub graduation_year: i32,
    pub issued_at: DateTime<Utc>,
    /// Issue or last renewal time plus the validity window.
    pub expiration_date: DateTime<Utc>,
    pub renewal_count: u32,
    /// Monotonic: never reset once set.
    pub revoked: bool,
}

impl Credential {
    /// Create a fresh, active credential issued at `now`.
    pub fn issue(
        student_id: impl Into<String>,
        institution_id: impl Into<String>,
        course: impl Into<String>,
        degree: impl Into<String>,
        graduation_year: i32,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: new_id(),
            student_id: student_id.into(),
            institution_id: institution_id.into(),
            course: course.into(),
            degree: degree.into(),
            graduation_year,
            issued_at: now,
            expiration_date: now + validity_window(),
            renewal_count: 0,
            revoked: false,
        }
    }

    /// The lifecycle state at `now`.
    pub fn state_at(&self, now: DateTime<Utc>) -> CredentialState {
        CredentialState::at(self.revoked, self.expiration_date, now)
    }

    /// Whether verification should accept this credential at `now`.
    ///
    /// Stricter than `state_at(now) == Active`: a credential expiring exactly
    /// at `now` can still be renewed but no longer verifies.
    pub fn is_verifiable_at(&self, now: DateTime<Utc>) -> bool {
        !self.revoked && self.expiration_date > now
    }

    /// Restart the validity window at `now` and bump the renewal counter.
    /// Leaves the record untouched on error.
    pub fn renew(&mut self, now: DateTime<Utc>) -> Result<(), CoreError> {
        CredentialStateMachine::transition(self.state_at(now), CredentialEvent::Renew)?;
        self.expiration_date = now + validity_window();
        self.renewal_count += 1;
        Ok(())
    }

    /// Mark the credential revoked. Leaves the record untouched on error.
    pub fn revoke(&mut self, now: DateTime<Utc>) -> Result<(), CoreError> {
        CredentialStateMachine::transition(self.state_at(now), CredentialEvent::Revoke)?;
        self.revoked = true;
        Ok(())
    }
}

/// An institution that issues credentials. Immutable after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Institution {
    pub id: String,
    pub name: String,
    pub address: String,
    pub created_at: DateTime<Utc>,
}

impl Institution {
    pub fn new(name: impl Into<String>, address: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            id: new_id(),
            name: name.into(),
            address: address.into(),
            created_at: now,
        }
    }
}

/// A student who holds credentials. Immutable after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: String,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl Student {
    pub fn new(name: impl Into<String>, email: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            id: new_id(),
            name: name.into(),
            email: email.into(),
            created_at: now,
        }
    }
}

/// A time-bounded, permission-scoped grant that lets a third party reference
/// a credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialShare {
    pub id: String,
    pub credential_id: String,
    pub recipient_id: String,
    /// Stored only; not enforced by the registry.
    pub expiration_date: DateTime<Utc>,
    pub permissions: Vec<String>,
}

impl CredentialShare {
    pub fn new(
        credential_id: impl Into<String>,
        recipient_id: impl Into<String>,
        expiration_date: DateTime<Utc>,
        permissions: Vec<String>,
    ) -> Self {
        Self {
            id: new_id(),
            credential_id: credential_id.into(),
            recipient_id: recipient_id.into(),
            expiration_date,
            permissions,
        }
    }
}

/// An entry in the append-only notification log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: String,
    pub recipient_id: String,
    pub message: String,
    pub sent_at: DateTime<Utc>,
}

impl Notification {
    pub fn new(
        recipient_id: impl Into<String>,
        message: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: new_id(),
            recipient_id: recipient_id.into(),
            message: message.into(),
            sent_at: now,
        }
    }
}
