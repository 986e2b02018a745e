//! Unified API error handling
//!
//! This module provides a consistent error response format across all API
//! endpoints.

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde::Serialize;
use uuid::Uuid;

/// Standard error response format
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error type/code
    pub error: String,
    /// Human-readable error message
    pub message: String,
    /// Unique request ID for tracing
    pub request_id: String,
}

/// Unified API error type
///
/// All API endpoints should return `Result<T, ApiError>` for consistent
/// error handling.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ApiError {
    /// Route not found (404)
    #[error("Route not found: {0}")]
    RouteNotFound(String),

    /// Bad request / validation error (400)
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Internal server error (500)
    #[error("Internal server error: {0}")]
    #[allow(dead_code)] // Reserved for non-database internal failures
    Internal(String),

    /// Database error (500)
    #[error("Database error: {0}")]
    Database(String),
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::RouteNotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) | ApiError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let error_type = match self {
            ApiError::RouteNotFound(_) => "route_not_found",
            ApiError::BadRequest(_) => "bad_request",
            ApiError::Internal(_) => "internal_error",
            ApiError::Database(_) => "database_error",
        };

        tracing::error!(
            error_type = error_type,
            status = status.as_u16(),
            message = %self,
            "API error"
        );

        HttpResponse::build(status).json(ErrorResponse {
            error: error_type.to_string(),
            message: self.to_string(),
            request_id: Uuid::new_v4().to_string(),
        })
    }
}

// ============================================================================
// From conversions for service errors
// ============================================================================

impl From<crate::service::EligibilityError> for ApiError {
    fn from(err: crate::service::EligibilityError) -> Self {
        match err {
            crate::service::EligibilityError::Validation(msg) => ApiError::BadRequest(msg),
            crate::service::EligibilityError::Persistence(e) => ApiError::Database(e.to_string()),
        }
    }
}

impl From<crate::service::KnowledgeError> for ApiError {
    fn from(err: crate::service::KnowledgeError) -> Self {
        match err {
            crate::service::KnowledgeError::InvalidRoute { route_key, reason } => {
                ApiError::BadRequest(format!("route {}: {}", route_key, reason))
            }
            crate::service::KnowledgeError::Db(e) => ApiError::Database(e.to_string()),
        }
    }
}

impl From<crate::db::DbError> for ApiError {
    fn from(err: crate::db::DbError) -> Self {
        ApiError::Database(err.to_string())
    }
}
