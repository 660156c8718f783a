use shared::FieldError;

use crate::upstream::UpstreamError;

/// Errors surfaced by the domain services. The REST layer maps each variant to a status code.
#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    #[error("Validation failed: {}", describe(.0))]
    Validation(Vec<FieldError>),

    #[error("{resource} not found: {id}")]
    NotFound { resource: &'static str, id: String },

    #[error("Category with this name already exists: {0}")]
    DuplicateCategory(String),

    #[error("Cannot delete category '{id}' while {count} expense(s) reference it. Please reassign or delete related expenses first.")]
    CategoryInUse { id: String, count: u64 },

    #[error(transparent)]
    Upstream(#[from] UpstreamError),

    #[error("Storage error: {0}")]
    Storage(#[from] anyhow::Error),
}

impl DomainError {
    pub fn invalid(field: &str, message: &str) -> Self {
        DomainError::Validation(vec![FieldError::new(field, message)])
    }

    pub fn expense_not_found(id: &str) -> Self {
        DomainError::NotFound {
            resource: "Expense",
            id: id.to_string(),
        }
    }

    pub fn category_not_found(id: &str) -> Self {
        DomainError::NotFound {
            resource: "Category",
            id: id.to_string(),
        }
    }
}

fn describe(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

pub type DomainResult<T> = Result<T, DomainError>;

/// Collects field errors so a request is rejected as a whole rather than one field at a time
#[derive(Debug, Default)]
pub struct FieldErrors {
    errors: Vec<FieldError>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep the value on success, record the error otherwise
    pub fn check<T>(&mut self, result: Result<T, FieldError>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(e) => {
                self.errors.push(e);
                None
            }
        }
    }

    pub fn push(&mut self, error: FieldError) {
        self.errors.push(error);
    }

    pub fn extend(&mut self, errors: impl IntoIterator<Item = FieldError>) {
        self.errors.extend(errors);
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn into_result(self) -> DomainResult<()> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(DomainError::Validation(self.errors))
        }
    }
}
