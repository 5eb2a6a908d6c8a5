use chrono::{DateTime, Utc};
use std::fmt;

use crate::error::{CoreError, InvalidState};

/// The states of a credential lifecycle.
///
/// Only `revoked` is stored on the record. `Expired` is derived from the
/// expiration date and the current time every time it is asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum CredentialState {
    /// Credential is current and can be renewed, revoked, and verified.
    Active,
    /// The validity window has passed. Can still be revoked.
    Expired,
    /// Credential has been permanently revoked. Final state.
    Revoked,
}

impl CredentialState {
    /// Derive the state from the stored flag, the expiration date, and `now`.
    ///
    /// A credential whose expiration date equals `now` is still `Active`.
    pub fn at(revoked: bool, expiration_date: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        if revoked {
            Self::Revoked
        } else if expiration_date < now {
            Self::Expired
        } else {
            Self::Active
        }
    }

    /// Whether this is a final (terminal) state.
    pub fn is_final(&self) -> bool {
        matches!(self, Self::Revoked)
    }
}

impl fmt::Display for CredentialState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Active => write!(f, "Active"),
            Self::Expired => write!(f, "Expired"),
            Self::Revoked => write!(f, "Revoked"),
        }
    }
}

/// Events that trigger credential state transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialEvent {
    /// Issuer extends the validity window.
    Renew,
    /// Issuer permanently revokes the credential.
    Revoke,
}

/// Manages credential state transitions.
///
/// Valid transitions:
/// - Active → Active (Renew)
/// - Active → Revoked (Revoke)
/// - Expired → Revoked (Revoke)
///
/// Revoked rejects every event with `AlreadyRevoked`; Expired rejects Renew
/// with `Expired`.
pub struct CredentialStateMachine;

impl CredentialStateMachine {
    /// Attempt a state transition based on an event.
    /// Returns the new state on success, or an error for invalid transitions.
    pub fn transition(
        current: CredentialState,
        event: CredentialEvent,
    ) -> Result<CredentialState, CoreError> {
        let new_state = match (current, event) {
            (CredentialState::Active, CredentialEvent::Renew) => CredentialState::Active,
            (CredentialState::Active, CredentialEvent::Revoke) => CredentialState::Revoked,
            (CredentialState::Expired, CredentialEvent::Revoke) => CredentialState::Revoked,

            (CredentialState::Expired, CredentialEvent::Renew) => {
                return Err(InvalidState::Expired.into());
            }
            (CredentialState::Revoked, _) => {
                return Err(InvalidState::AlreadyRevoked.into());
            }
        };

        tracing::debug!(
            from = %current,
            to = %new_state,
            event = ?event,
            "credential state transition"
        );

        Ok(new_state)
    }

    /// Check if a transition is valid without performing it.
    pub fn can_transition(current: CredentialState, event: CredentialEvent) -> bool {
        Self::transition(current, event).is_ok()
    }
}
