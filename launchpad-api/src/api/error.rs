//! API Error Handling
//!
//! Unified error types and conversion for API responses. Every error is
//! rendered as the `{ "success": false, "error": ... }` envelope.

use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use launchpad_core::dto::ErrorResponse;

use crate::service::{category_service, task_service};

/// Failure of a request, rendered with the status it maps to
#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
    BadRequest(String),
    Conflict(String),
    DatabaseError(sqlx::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let error = match self {
            ApiError::NotFound(msg) | ApiError::BadRequest(msg) | ApiError::Conflict(msg) => msg,
            ApiError::DatabaseError(err) => {
                // Details stay in the log
                tracing::error!("Database error: {:?}", err);
                "Internal server error".to_string()
            }
        };

        (
            status,
            Json(ErrorResponse {
                success: false,
                error,
            }),
        )
            .into_response()
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        ApiError::DatabaseError(err)
    }
}

impl From<task_service::TaskError> for ApiError {
    fn from(err: task_service::TaskError) -> Self {
        match err {
            task_service::TaskError::NotFound(id) => {
                ApiError::NotFound(format!("Task {} not found", id))
            }
            task_service::TaskError::ValidationError(msg) => ApiError::BadRequest(msg),
            task_service::TaskError::DatabaseError(err) => ApiError::DatabaseError(err),
        }
    }
}

impl From<category_service::CategoryError> for ApiError {
    fn from(err: category_service::CategoryError) -> Self {
        match err {
            category_service::CategoryError::AlreadyExists(name) => {
                ApiError::Conflict(format!("Category '{}' already exists", name))
            }
            category_service::CategoryError::ValidationError(msg) => ApiError::BadRequest(msg),
            category_service::CategoryError::DatabaseError(err) => ApiError::DatabaseError(err),
        }
    }
}

/// Malformed or missing JSON bodies
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

/// Non-numeric ids address nothing
impl From<PathRejection> for ApiError {
    fn from(_: PathRejection) -> Self {
        ApiError::NotFound("Resource not found".to_string())
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

/// Fallback for unknown routes
pub async fn not_found() -> ApiError {
    ApiError::NotFound("Resource not found".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_errors_map_to_statuses() {
        let missing: ApiError = task_service::TaskError::NotFound(9).into();
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);
        assert!(matches!(missing, ApiError::NotFound(ref msg) if msg == "Task 9 not found"));

        let duplicate: ApiError =
            category_service::CategoryError::AlreadyExists("Work".into()).into();
        assert_eq!(duplicate.status(), StatusCode::CONFLICT);

        let db: ApiError = sqlx::Error::PoolClosed.into();
        assert_eq!(db.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
