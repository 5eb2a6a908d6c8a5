use serde::{Deserialize, Serialize};
use std::sync::Arc;

use diploma_core::{Clock, CoreError, Credential, EntityKind};
use diploma_store::Collection;

use crate::directory::non_empty;

/// Optional, conjunctive search filters.
///
/// `course` and `degree` match by case-sensitive substring; `graduation_year`
/// by equality. An empty string or a year of 0 counts as no filter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchFilter {
    #[serde(default)]
    pub course: Option<String>,
    #[serde(default)]
    pub degree: Option<String>,
    #[serde(default)]
    pub graduation_year: Option<i32>,
}

impl SearchFilter {
    pub fn matches(&self, credential: &Credential) -> bool {
        contains(&credential.course, self.course.as_deref())
            && contains(&credential.degree, self.degree.as_deref())
            && match self.graduation_year {
                Some(year) if year != 0 => credential.graduation_year == year,
                _ => true,
            }
    }
}

fn contains(haystack: &str, needle: Option<&str>) -> bool {
    match needle {
        Some(needle) if !needle.is_empty() => haystack.contains(needle),
        _ => true,
    }
}

/// Read-only queries over the credential collection. Results come back in
/// store order.
pub struct QueryEngine {
    credentials: Arc<dyn Collection<Credential>>,
    clock: Arc<dyn Clock>,
}

impl QueryEngine {
    pub fn new(credentials: Arc<dyn Collection<Credential>>, clock: Arc<dyn Clock>) -> Self {
        Self { credentials, clock }
    }

    /// The first credential held by `student_id` from `institution_id` that is
    /// neither revoked nor past its expiration date.
    pub fn verify(&self, student_id: &str, institution_id: &str) -> Result<Credential, CoreError> {
        let now = self.clock.now();
        let found = self.credentials.values()?.into_iter().find(|c| {
            c.student_id == student_id
                && c.institution_id == institution_id
                && c.is_verifiable_at(now)
        });

        match found {
            Some(credential) => {
                tracing::debug!(
                    credential_id = %credential.id,
                    student_id,
                    institution_id,
                    "credential verified"
                );
                Ok(credential)
            }
            None => Err(CoreError::none_found(EntityKind::Credential)),
        }
    }

    /// Credentials matching every filter that is set. No matches is
    /// `NotFound`.
    pub fn search(&self, filter: &SearchFilter) -> Result<Vec<Credential>, CoreError> {
        let matches = self
            .credentials
            .values()?
            .into_iter()
            .filter(|c| filter.matches(c))
            .collect();
        non_empty(matches, EntityKind::Credential)
    }

    /// Every credential. An empty store is `NotFound`.
    pub fn list_all(&self) -> Result<Vec<Credential>, CoreError> {
        non_empty(self.credentials.values()?, EntityKind::Credential)
    }
}
