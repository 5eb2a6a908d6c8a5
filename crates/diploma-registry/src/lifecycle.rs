use chrono::{DateTime, Utc};
use std::sync::Arc;

use diploma_core::error::require;
use diploma_core::{Clock, CoreError, Credential, EntityKind, Institution, Student};
use diploma_notify::NotificationSink;
use diploma_store::Collection;

use crate::locks::LockTable;

/// Owns the credential state machine: issue, renew, revoke.
///
/// Renew and revoke hold the credential's lock from the initial read until
/// the updated record is written back. The owning student is notified after
/// a successful renew or revoke; a failed call mutates nothing and sends
/// nothing.
pub struct LifecycleEngine {
    credentials: Arc<dyn Collection<Credential>>,
    students: Arc<dyn Collection<Student>>,
    institutions: Arc<dyn Collection<Institution>>,
    sink: Arc<dyn NotificationSink>,
    clock: Arc<dyn Clock>,
    locks: LockTable,
}

impl LifecycleEngine {
    pub fn new(
        credentials: Arc<dyn Collection<Credential>>,
        students: Arc<dyn Collection<Student>>,
        institutions: Arc<dyn Collection<Institution>>,
        sink: Arc<dyn NotificationSink>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            credentials,
            students,
            institutions,
            sink,
            clock,
            locks: LockTable::new(),
        }
    }

    /// Issue a new credential valid for the standard window from now.
    ///
    /// `course` and `degree` must be non-empty; the student and institution
    /// must already be registered.
    pub fn issue(
        &self,
        student_id: &str,
        institution_id: &str,
        course: &str,
        degree: &str,
        graduation_year: i32,
    ) -> Result<Credential, CoreError> {
        require("course", course)?;
        require("degree", degree)?;

        if self.students.get(student_id)?.is_none() {
            return Err(CoreError::not_found(EntityKind::Student, student_id));
        }
        if self.institutions.get(institution_id)?.is_none() {
            return Err(CoreError::not_found(EntityKind::Institution, institution_id));
        }

        let credential = Credential::issue(
            student_id,
            institution_id,
            course,
            degree,
            graduation_year,
            self.clock.now(),
        );
        self.credentials.insert(&credential)?;

        tracing::info!(
            credential_id = %credential.id,
            student_id,
            institution_id,
            expires = %credential.expiration_date,
            "credential issued"
        );

        Ok(credential)
    }

    /// Restart the validity window and bump the renewal counter.
    ///
    /// Fails with `AlreadyRevoked` for revoked credentials and `Expired` once
    /// the expiration date has passed.
    pub fn renew(&self, credential_id: &str) -> Result<Credential, CoreError> {
        let credential = self.locks.with_lock(credential_id, || {
            let mut credential = self.load(credential_id)?;
            credential.renew(self.clock.now())?;
            self.credentials.insert(&credential)?;
            Ok::<_, CoreError>(credential)
        })?;

        tracing::info!(
            credential_id,
            renewal_count = credential.renewal_count,
            expires = %credential.expiration_date,
            "credential renewed"
        );
        self.sink
            .send(&credential.student_id, &renewal_message(credential.expiration_date));

        Ok(credential)
    }

    /// Permanently revoke a credential. `reason` is required and is passed
    /// on to the student.
    ///
    /// Expired credentials can still be revoked.
    pub fn revoke(&self, credential_id: &str, reason: &str) -> Result<Credential, CoreError> {
        require("reason", reason)?;

        let credential = self.locks.with_lock(credential_id, || {
            let mut credential = self.load(credential_id)?;
            credential.revoke(self.clock.now())?;
            self.credentials.insert(&credential)?;
            Ok::<_, CoreError>(credential)
        })?;

        tracing::info!(credential_id, reason, "credential revoked");
        self.sink
            .send(&credential.student_id, &revocation_message(reason));

        Ok(credential)
    }

    /// Point lookup of a credential.
    pub fn get(&self, credential_id: &str) -> Result<Credential, CoreError> {
        self.load(credential_id)
    }

    fn load(&self, credential_id: &str) -> Result<Credential, CoreError> {
        self.credentials
            .get(credential_id)?
            .ok_or_else(|| CoreError::not_found(EntityKind::Credential, credential_id))
    }
}

fn renewal_message(expiration_date: DateTime<Utc>) -> String {
    format!(
        "Your credential has been renewed. New expiration date: {}",
        expiration_date.format("%Y-%m-%d")
    )
}

fn revocation_message(reason: &str) -> String {
    format!("Your credential has been revoked: {}", reason)
}
