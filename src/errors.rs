// src/errors.rs
// DOCUMENTATION: Custom error types and HTTP responses
// PURPOSE: Centralized error handling for entire application

use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use serde_json::json;
use thiserror::Error;

/// Application-specific error types
/// DOCUMENTATION: Each variant maps to an HTTP status code and a JSON error body
#[derive(Error, Debug)]
pub enum DirectoryError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Already exists: {0}")]
    AlreadyExists(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Unauthorized access")]
    Unauthorized,

    #[error("Forbidden access")]
    Forbidden,

    #[error("Internal server error")]
    InternalError,

    #[error("External API error: {0}")]
    ExternalApiError(String),

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("Service temporarily unavailable")]
    ServiceUnavailable,
}

impl DirectoryError {
    fn error_code(&self) -> &'static str {
        match self {
            DirectoryError::NotFound(_) => "NOT_FOUND",
            DirectoryError::AlreadyExists(_) => "ALREADY_EXISTS",
            DirectoryError::DatabaseError(_) => "DATABASE_ERROR",
            DirectoryError::InvalidInput(_) => "INVALID_INPUT",
            DirectoryError::ValidationError(_) => "VALIDATION_ERROR",
            DirectoryError::Unauthorized => "UNAUTHORIZED",
            DirectoryError::Forbidden => "FORBIDDEN",
            DirectoryError::InternalError => "INTERNAL_ERROR",
            DirectoryError::ExternalApiError(_) => "EXTERNAL_API_ERROR",
            DirectoryError::RateLimitExceeded => "RATE_LIMIT_EXCEEDED",
            DirectoryError::ServiceUnavailable => "SERVICE_UNAVAILABLE",
        }
    }
}

impl From<validator::ValidationErrors> for DirectoryError {
    fn from(e: validator::ValidationErrors) -> Self {
        DirectoryError::ValidationError(e.to_string())
    }
}

/// Convert DirectoryError to HTTP response
/// DOCUMENTATION: Maps error types to HTTP status codes and JSON responses
impl ResponseError for DirectoryError {
    fn error_response(&self) -> HttpResponse {
        // Database details stay in the logs, not in the response
        let message = match self {
            DirectoryError::DatabaseError(_) => "Database error".to_string(),
            other => other.to_string(),
        };

        let body = json!({
            "error": {
                "code": self.error_code(),
                "message": message,
                "timestamp": chrono::Utc::now().to_rfc3339()
            }
        });

        HttpResponse::build(self.status_code()).json(body)
    }

    fn status_code(&self) -> StatusCode {
        match self {
            DirectoryError::NotFound(_) => StatusCode::NOT_FOUND,
            DirectoryError::AlreadyExists(_) => StatusCode::CONFLICT,
            DirectoryError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            DirectoryError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            DirectoryError::ValidationError(_) => StatusCode::BAD_REQUEST,
            DirectoryError::Unauthorized => StatusCode::UNAUTHORIZED,
            DirectoryError::Forbidden => StatusCode::FORBIDDEN,
            DirectoryError::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
            DirectoryError::ExternalApiError(_) => StatusCode::BAD_GATEWAY,
            DirectoryError::RateLimitExceeded => StatusCode::TOO_MANY_REQUESTS,
            DirectoryError::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            DirectoryError::NotFound("x".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            DirectoryError::AlreadyExists("x".into()).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(DirectoryError::Unauthorized.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(DirectoryError::Forbidden.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(
            DirectoryError::ExternalApiError("x".into()).status_code(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            DirectoryError::RateLimitExceeded.status_code(),
            StatusCode::TOO_MANY_REQUESTS
        );
    }

    #[actix_rt::test]
    async fn test_error_body_hides_database_details() {
        let response =
            DirectoryError::DatabaseError("relation users does not exist".into()).error_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let bytes = to_bytes(response.into_body()).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"]["code"], "DATABASE_ERROR");
        assert_eq!(body["error"]["message"], "Database error");
    }
}
