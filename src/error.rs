//! Error types for the catalog service
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::auth::AuthError;
use crate::catalog::CatalogError;

// == Cache Error Enum ==
/// Failures of the response cache itself.
///
/// None of these may fail a read or a write: reads fail open and compute
/// directly, writes log and carry on.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// The store could not be operated (e.g. its lock was poisoned)
    #[error("Cache store unavailable: {0}")]
    StoreUnavailable(String),

    /// Nothing could be evicted to make room
    #[error("Cache full: {0}")]
    CacheFull(String),

    /// Clearing or sweeping the store failed
    #[error("Cache invalidation failed: {0}")]
    Invalidation(String),
}

// == App Error Enum ==
/// Unified error type for HTTP handlers.
#[derive(Error, Debug)]
pub enum AppError {
    /// Requested resource does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Malformed request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Field-level validation failures
    #[error("Validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),

    /// Missing or invalid credentials
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Authenticated but not allowed
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Cache failure surfaced to an admin caller
    #[error(transparent)]
    Cache(#[from] CacheError),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InvalidRequest(_) | AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::Cache(CacheError::StoreUnavailable(_)) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Cache(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<CatalogError> for AppError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::NotFound(id) => AppError::NotFound(format!("vehicle {id} not found")),
            CatalogError::Validation(errors) => AppError::Validation(errors),
            CatalogError::Backend(msg) => AppError::Internal(msg),
        }
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Forbidden => AppError::Forbidden(err.to_string()),
            other => AppError::Unauthorized(other.to_string()),
        }
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }

        let body = match &self {
            AppError::Validation(errors) => json!({
                "error": self.to_string(),
                "errors": errors,
            }),
            _ => json!({ "error": self.to_string() }),
        };

        (status, Json(body)).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for HTTP handlers.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[test]
    fn test_error_status_codes() {
        let cases = vec![
            (AppError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (AppError::InvalidRequest("x".into()), StatusCode::BAD_REQUEST),
            (AppError::Validation(vec!["x".into()]), StatusCode::BAD_REQUEST),
            (AppError::Unauthorized("x".into()), StatusCode::UNAUTHORIZED),
            (AppError::Forbidden("x".into()), StatusCode::FORBIDDEN),
            (
                AppError::Cache(CacheError::StoreUnavailable("x".into())),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (
                AppError::Cache(CacheError::Invalidation("x".into())),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (AppError::Internal("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (error, expected) in cases {
            assert_eq!(error.into_response().status(), expected);
        }
    }

    #[test]
    fn test_catalog_error_mapping() {
        assert!(matches!(
            AppError::from(CatalogError::NotFound(3)),
            AppError::NotFound(msg) if msg.contains('3')
        ));
        assert!(matches!(
            AppError::from(CatalogError::Backend("db".into())),
            AppError::Internal(_)
        ));
    }

    #[test]
    fn test_auth_error_mapping() {
        assert!(matches!(
            AppError::from(AuthError::Forbidden),
            AppError::Forbidden(_)
        ));
        assert!(matches!(
            AppError::from(AuthError::InvalidToken),
            AppError::Unauthorized(_)
        ));
    }

    #[tokio::test]
    async fn test_validation_body_lists_errors() {
        let response =
            AppError::Validation(vec!["year out of range".into(), "brand too short".into()])
                .into_response();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

        assert!(json["error"].is_string());
        assert_eq!(json["errors"].as_array().unwrap().len(), 2);
    }
}
