use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use shared::ErrorResponse;
use tracing::{error, warn};

use crate::domain::DomainError;

/// A domain error on its way out as an HTTP response
#[derive(Debug)]
pub struct ApiError(pub DomainError);

impl From<DomainError> for ApiError {
    fn from(e: DomainError) -> Self {
        ApiError(e)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            DomainError::Validation(_) => StatusCode::BAD_REQUEST,
            DomainError::NotFound { .. } => StatusCode::NOT_FOUND,
            DomainError::DuplicateCategory(_) | DomainError::CategoryInUse { .. } => StatusCode::CONFLICT,
            DomainError::Upstream(_) => StatusCode::BAD_GATEWAY,
            DomainError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn body(&self) -> ErrorResponse {
        match &self.0 {
            DomainError::Validation(errors) => ErrorResponse {
                message: "Validation failed".to_string(),
                errors: Some(errors.clone()),
                error: None,
            },
            DomainError::NotFound { resource, .. } => message(format!("{} not found", resource)),
            DomainError::DuplicateCategory(_) => message("Category with this name already exists".to_string()),
            DomainError::CategoryInUse { .. } => message(
                "Cannot delete category with existing expenses. Please reassign or delete related expenses first."
                    .to_string(),
            ),
            DomainError::Upstream(e) => ErrorResponse {
                message: "Upstream service error".to_string(),
                errors: None,
                error: Some(e.to_string()),
            },
            DomainError::Storage(e) => ErrorResponse {
                message: "Internal server error".to_string(),
                errors: None,
                error: Some(format!("{:#}", e)),
            },
        }
    }
}

fn message(message: String) -> ErrorResponse {
    ErrorResponse {
        message,
        errors: None,
        error: None,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("Request failed with {}: {}", status, self.0);
        } else {
            warn!("Request rejected with {}: {}", status, self.0);
        }
        (status, Json(self.body())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::upstream::UpstreamError;
    use shared::FieldError;

    #[test]
    fn test_status_mapping() {
        let cases = vec![
            (DomainError::invalid("title", "Title is required"), StatusCode::BAD_REQUEST),
            (DomainError::expense_not_found("e1"), StatusCode::NOT_FOUND),
            (DomainError::DuplicateCategory("food".into()), StatusCode::CONFLICT),
            (
                DomainError::CategoryInUse {
                    id: "food".into(),
                    count: 2,
                },
                StatusCode::CONFLICT,
            ),
            (
                DomainError::Upstream(UpstreamError::MissingCredentials {
                    service: "News API",
                    setting: "NEWS_API_KEY",
                }),
                StatusCode::BAD_GATEWAY,
            ),
            (
                DomainError::Storage(anyhow::anyhow!("disk full")),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, expected) in cases {
            assert_eq!(ApiError(err).status(), expected);
        }
    }

    #[test]
    fn test_validation_body_lists_field_errors() {
        let body = ApiError(DomainError::Validation(vec![
            FieldError::new("title", "Title is required"),
            FieldError::new("amount", "Amount must be a positive number"),
        ]))
        .body();

        assert_eq!(body.message, "Validation failed");
        assert_eq!(body.errors.as_ref().map(Vec::len), Some(2));
        assert!(body.error.is_none());
    }

    #[test]
    fn test_storage_body_carries_detail() {
        let body = ApiError(DomainError::Storage(anyhow::anyhow!("database is locked"))).body();
        assert_eq!(body.message, "Internal server error");
        assert_eq!(body.error.as_deref(), Some("database is locked"));
    }

    #[test]
    fn test_not_found_names_resource() {
        let body = ApiError(DomainError::category_not_found("ghost")).body();
        assert_eq!(body.message, "Category not found");
    }
}
