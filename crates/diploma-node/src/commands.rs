//! Commands dispatched from the HTTP API to the node event loop.

use chrono::{DateTime, Utc};
use tokio::sync::oneshot;

use diploma_core::{
    CoreError, Credential, CredentialShare, Institution, Notification, Student,
};
use diploma_registry::SearchFilter;

/// Channel on which the event loop answers a command.
pub type Reply<T> = oneshot::Sender<Result<T, CoreError>>;

/// A command sent from the HTTP API to the node's main event loop.
///
/// The loop runs commands one at a time, so every registry operation sees
/// the effects of the ones before it.
pub enum NodeCommand {
    CreateStudent {
        name: String,
        email: String,
        reply: Reply<Student>,
    },
    GetStudent {
        id: String,
        reply: Reply<Student>,
    },
    ListStudents {
        reply: Reply<Vec<Student>>,
    },
    CreateInstitution {
        name: String,
        address: String,
        reply: Reply<Institution>,
    },
    GetInstitution {
        id: String,
        reply: Reply<Institution>,
    },
    ListInstitutions {
        reply: Reply<Vec<Institution>>,
    },
    /// Issue a credential to a registered student.
    IssueCredential {
        student_id: String,
        institution_id: String,
        course: String,
        degree: String,
        graduation_year: i32,
        reply: Reply<Credential>,
    },
    GetCredential {
        id: String,
        reply: Reply<Credential>,
    },
    ListCredentials {
        reply: Reply<Vec<Credential>>,
    },
    RenewCredential {
        id: String,
        reply: Reply<Credential>,
    },
    RevokeCredential {
        id: String,
        reason: String,
        reply: Reply<Credential>,
    },
    /// Grant a recipient access to a credential.
    ShareCredential {
        id: String,
        recipient_id: String,
        expiration_date: DateTime<Utc>,
        permissions: Vec<String>,
        reply: Reply<CredentialShare>,
    },
    ListShares {
        id: String,
        reply: Reply<Vec<CredentialShare>>,
    },
    SearchCredentials {
        filter: SearchFilter,
        reply: Reply<Vec<Credential>>,
    },
    /// Find a current credential for a student at an institution.
    VerifyCredential {
        student_id: String,
        institution_id: String,
        reply: Reply<Credential>,
    },
    /// Read back the notification log for one recipient.
    Notifications {
        recipient_id: String,
        reply: Reply<Vec<Notification>>,
    },
}

impl NodeCommand {
    /// Short name for logging.
    pub fn name(&self) -> &'static str {
        match self {
            Self::CreateStudent { .. } => "create_student",
            Self::GetStudent { .. } => "get_student",
            Self::ListStudents { .. } => "list_students",
            Self::CreateInstitution { .. } => "create_institution",
            Self::GetInstitution { .. } => "get_institution",
            Self::ListInstitutions { .. } => "list_institutions",
            Self::IssueCredential { .. } => "issue_credential",
            Self::GetCredential { .. } => "get_credential",
            Self::ListCredentials { .. } => "list_credentials",
            Self::RenewCredential { .. } => "renew_credential",
            Self::RevokeCredential { .. } => "revoke_credential",
            Self::ShareCredential { .. } => "share_credential",
            Self::ListShares { .. } => "list_shares",
            Self::SearchCredentials { .. } => "search_credentials",
            Self::VerifyCredential { .. } => "verify_credential",
            Self::Notifications { .. } => "notifications",
        }
    }
}
