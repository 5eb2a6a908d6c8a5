use chrono::{DateTime, Utc};
use std::sync::Arc;

use diploma_core::{CoreError, Credential, CredentialShare, EntityKind};
use diploma_store::Collection;

use crate::directory::non_empty;

/// Creates permission-scoped grants that reference a credential.
///
/// The credential only has to exist when the share is created. Permissions
/// are stored as given, duplicates are allowed, and neither revocation of the
/// credential nor the share's own expiration date invalidates a share.
pub struct SharingEngine {
    credentials: Arc<dyn Collection<Credential>>,
    shares: Arc<dyn Collection<CredentialShare>>,
}

impl SharingEngine {
    pub fn new(
        credentials: Arc<dyn Collection<Credential>>,
        shares: Arc<dyn Collection<CredentialShare>>,
    ) -> Self {
        Self {
            credentials,
            shares,
        }
    }

    /// Grant `recipient_id` access to a credential until `expiration_date`.
    pub fn share(
        &self,
        credential_id: &str,
        recipient_id: &str,
        expiration_date: DateTime<Utc>,
        permissions: Vec<String>,
    ) -> Result<CredentialShare, CoreError> {
        if self.credentials.get(credential_id)?.is_none() {
            return Err(CoreError::not_found(EntityKind::Credential, credential_id));
        }

        let share = CredentialShare::new(credential_id, recipient_id, expiration_date, permissions);
        self.shares.insert(&share)?;

        tracing::info!(
            share_id = %share.id,
            credential_id,
            recipient_id,
            permissions = ?share.permissions,
            "credential shared"
        );

        Ok(share)
    }

    /// Every share that references `credential_id`, oldest first.
    pub fn shares_for(&self, credential_id: &str) -> Result<Vec<CredentialShare>, CoreError> {
        let shares = self
            .shares
            .values()?
            .into_iter()
            .filter(|s| s.credential_id == credential_id)
            .collect();
        non_empty(shares, EntityKind::CredentialShare)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use diploma_store::MemoryCollection;

    fn engine_with_credential() -> (SharingEngine, Arc<MemoryCollection<Credential>>, Credential) {
        let credentials = Arc::new(MemoryCollection::<Credential>::new());
        let shares = Arc::new(MemoryCollection::<CredentialShare>::new());
        let c = Credential::issue("s-1", "i-1", "CS", "BSc", 2024, Utc::now());
        credentials.insert(&c).unwrap();
        (SharingEngine::new(credentials.clone(), shares), credentials, c)
    }

    #[test]
    fn test_share_credential() {
        let (engine, _, c) = engine_with_credential();
        let exp = Utc::now() + Duration::days(7);
        let share = engine
            .share(&c.id, "employer-1", exp, vec!["view".into()])
            .unwrap();
        assert_eq!(share.credential_id, c.id);
        assert_eq!(share.recipient_id, "employer-1");
        assert_eq!(share.expiration_date, exp);
        assert_eq!(share.permissions, vec!["view"]);
        assert_eq!(engine.shares_for(&c.id).unwrap(), vec![share]);
    }

    #[test]
    fn test_share_missing_credential() {
        let (engine, _, _) = engine_with_credential();
        let err = engine
            .share("ghost", "r", Utc::now(), vec![])
            .unwrap_err();
        assert_eq!(err, CoreError::not_found(EntityKind::Credential, "ghost"));
    }

    #[test]
    fn test_share_revoked_credential_allowed() {
        let (engine, credentials, mut c) = engine_with_credential();
        c.revoke(Utc::now()).unwrap();
        credentials.insert(&c).unwrap();

        assert!(engine
            .share(&c.id, "R1", Utc::now() + Duration::days(1), vec!["view".into()])
            .is_ok());
    }

    #[test]
    fn test_duplicate_shares_and_unknown_permissions() {
        let (engine, _, c) = engine_with_credential();
        let exp = Utc::now() - Duration::days(1);
        let perms = vec!["view".to_string(), "launch-missiles".to_string()];
        engine.share(&c.id, "R1", exp, perms.clone()).unwrap();
        engine.share(&c.id, "R1", exp, perms).unwrap();
        assert_eq!(engine.shares_for(&c.id).unwrap().len(), 2);
    }

    #[test]
    fn test_shares_for_none() {
        let (engine, _, c) = engine_with_credential();
        assert_eq!(
            engine.shares_for(&c.id).unwrap_err(),
            CoreError::none_found(EntityKind::CredentialShare)
        );
    }
}
