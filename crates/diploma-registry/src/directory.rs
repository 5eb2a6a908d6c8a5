use std::sync::Arc;

use diploma_core::error::require;
use diploma_core::{Clock, CoreError, EntityKind, Institution, Student};
use diploma_store::Collection;

/// Registration and lookup of students and institutions.
///
/// Both record types are immutable once created, so nothing here needs the
/// lock table.
pub struct Directory {
    students: Arc<dyn Collection<Student>>,
    institutions: Arc<dyn Collection<Institution>>,
    clock: Arc<dyn Clock>,
}

impl Directory {
    pub fn new(
        students: Arc<dyn Collection<Student>>,
        institutions: Arc<dyn Collection<Institution>>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            students,
            institutions,
            clock,
        }
    }

    /// Register a student. Both `name` and `email` are required.
    pub fn create_student(&self, name: &str, email: &str) -> Result<Student, CoreError> {
        require("name", name)?;
        require("email", email)?;

        let student = Student::new(name, email, self.clock.now());
        self.students.insert(&student)?;
        tracing::info!(student_id = %student.id, "student registered");
        Ok(student)
    }

    pub fn get_student(&self, id: &str) -> Result<Student, CoreError> {
        self.students
            .get(id)?
            .ok_or_else(|| CoreError::not_found(EntityKind::Student, id))
    }

    /// All students. An empty directory is reported as `NotFound`.
    pub fn list_students(&self) -> Result<Vec<Student>, CoreError> {
        non_empty(self.students.values()?, EntityKind::Student)
    }

    /// Register an institution. Both `name` and `address` are required.
    pub fn create_institution(&self, name: &str, address: &str) -> Result<Institution, CoreError> {
        require("name", name)?;
        require("address", address)?;

        let institution = Institution::new(name, address, self.clock.now());
        self.institutions.insert(&institution)?;
        tracing::info!(institution_id = %institution.id, "institution registered");
        Ok(institution)
    }

    pub fn get_institution(&self, id: &str) -> Result<Institution, CoreError> {
        self.institutions
            .get(id)?
            .ok_or_else(|| CoreError::not_found(EntityKind::Institution, id))
    }

    /// All institutions. An empty directory is reported as `NotFound`.
    pub fn list_institutions(&self) -> Result<Vec<Institution>, CoreError> {
        non_empty(self.institutions.values()?, EntityKind::Institution)
    }
}

/// Empty listings and empty search results are errors, not empty successes.
pub(crate) fn non_empty<T>(items: Vec<T>, kind: EntityKind) -> Result<Vec<T>, CoreError> {
    if items.is_empty() {
        return Err(CoreError::none_found(kind));
    }
    Ok(items)
}
