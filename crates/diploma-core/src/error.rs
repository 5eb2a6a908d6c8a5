use serde::{Deserialize, Serialize};
use std::fmt;

/// The kinds of records held by the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Credential,
    Student,
    Institution,
    CredentialShare,
}

impl EntityKind {
    fn plural(&self) -> &'static str {
        match self {
            Self::Credential => "credentials",
            Self::Student => "students",
            Self::Institution => "institutions",
            Self::CredentialShare => "credential shares",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Credential => write!(f, "credential"),
            Self::Student => write!(f, "student"),
            Self::Institution => write!(f, "institution"),
            Self::CredentialShare => write!(f, "credential share"),
        }
    }
}

/// Lifecycle states that forbid an operation on a credential.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, thiserror::Error)]
pub enum InvalidState {
    #[error("credential is already revoked")]
    AlreadyRevoked,

    #[error("credential has expired")]
    Expired,
}

/// Registry errors. Each one is terminal for the operation that raised it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoreError {
    #[error("validation error: '{field}' is required")]
    Validation { field: String },

    /// `id` is `None` when a collection or a filtered result set is empty.
    #[error("{}", not_found_message(.kind, .id))]
    NotFound {
        kind: EntityKind,
        id: Option<String>,
    },

    #[error("invalid state: {0}")]
    InvalidState(#[from] InvalidState),

    #[error("storage error: {0}")]
    Storage(String),
}

impl CoreError {
    /// A required field was missing or empty.
    pub fn missing(field: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
        }
    }

    /// No record of `kind` exists under `id`.
    pub fn not_found(kind: EntityKind, id: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            id: Some(id.into()),
        }
    }

    /// A listing or search of `kind` came back empty.
    pub fn none_found(kind: EntityKind) -> Self {
        Self::NotFound { kind, id: None }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

fn not_found_message(kind: &EntityKind, id: &Option<String>) -> String {
    match id {
        Some(id) => format!("{} not found: {}", kind, id),
        None => format!("no {} found", kind.plural()),
    }
}

/// Reject an empty value for a required field.
pub fn require(field: &str, value: &str) -> Result<(), CoreError> {
    if value.is_empty() {
        return Err(CoreError::missing(field));
    }
    Ok(())
}
