//! Diploma Core: Records, errors, and the credential state machine for the
//! Diploma academic credential registry.

pub mod clock;
pub mod credential_state;
pub mod error;
pub mod types;

pub use clock::{Clock, ManualClock, SystemClock};
pub use credential_state::{CredentialEvent, CredentialState, CredentialStateMachine};
pub use error::{CoreError, EntityKind, InvalidState};
pub use types::{
    new_id, validity_window, Credential, CredentialShare, Institution, Notification, Student,
    VALIDITY_WINDOW_DAYS,
};
