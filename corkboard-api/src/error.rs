/// Error handling for the API server
///
/// This module provides a unified error type that maps to HTTP responses.
/// All handlers return `Result<T, ApiError>` which automatically converts
/// to the appropriate status code; store errors are converted locally and
/// never propagate unhandled to the transport layer.
///
/// # Example
///
/// ```
/// use corkboard_api::error::{ApiError, ApiResult};
/// use axum::Json;
///
/// async fn handler() -> ApiResult<Json<serde_json::Value>> {
///     Err(ApiError::NotFound("Card not found".to_string()))
/// }
/// ```

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// API result type alias
pub type ApiResult<T> = Result<T, ApiError>;

/// Unified API error type
#[derive(Debug)]
pub enum ApiError {
    /// Bad request (400)
    BadRequest(String),

    /// Unauthorized (401)
    Unauthorized(String),

    /// Forbidden (403)
    Forbidden(String),

    /// Not found (404)
    NotFound(String),

    /// Conflict (409) - e.g., duplicate email, used invitation
    Conflict(String),

    /// Unprocessable entity (422) - validation errors
    ValidationError(Vec<ValidationErrorDetail>),

    /// Internal server error (500)
    InternalError(String),

    /// Service unavailable (503)
    ServiceUnavailable(String),
}

/// Validation error detail
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationErrorDetail {
    /// Field that failed validation
    pub field: String,

    /// Error message
    pub message: String,
}

/// Error response format
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code (e.g., "bad_request", "unauthorized")
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// Optional validation errors
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<ValidationErrorDetail>>,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            ApiError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            ApiError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            ApiError::ValidationError(errors) => {
                write!(f, "Validation failed: {} errors", errors.len())
            }
            ApiError::InternalError(msg) => write!(f, "Internal error: {}", msg),
            ApiError::ServiceUnavailable(msg) => write!(f, "Service unavailable: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message, details) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg, None),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "unauthorized", msg, None),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, "forbidden", msg, None),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg, None),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, "conflict", msg, None),
            ApiError::ValidationError(errors) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "validation_error",
                "Request validation failed".to_string(),
                Some(errors),
            ),
            ApiError::InternalError(msg) => {
                // Log internal errors but don't expose details to clients
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                    None,
                )
            }
            ApiError::ServiceUnavailable(msg) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "service_unavailable",
                msg,
                None,
            ),
        };

        let body = Json(ErrorResponse {
            error: error_code.to_string(),
            message,
            details,
        });

        (status, body).into_response()
    }
}

/// Convert sqlx errors to API errors
impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => ApiError::NotFound("Resource not found".to_string()),
            sqlx::Error::Database(db_err) => {
                // Check for unique constraint violations
                if let Some(constraint) = db_err.constraint() {
                    if constraint.contains("users_email") {
                        return ApiError::Conflict("Email already exists".to_string());
                    }
                    if constraint.contains("invitations") {
                        return ApiError::Conflict(
                            "An invitation for this email already exists".to_string(),
                        );
                    }
                    if constraint.contains("kanban_members") {
                        return ApiError::Conflict("User is already a member".to_string());
                    }
                    return ApiError::Conflict(format!("Constraint violation: {}", constraint));
                }

                // Other database errors are internal
                ApiError::InternalError(format!("Database error: {}", db_err))
            }
            _ => ApiError::InternalError(format!("Database error: {}", err)),
        }
    }
}

/// Convert validator errors to 422 responses with per-field details
impl From<validator::ValidationErrors> for ApiError {
    fn from(e: validator::ValidationErrors) -> Self {
        let errors: Vec<ValidationErrorDetail> = e
            .field_errors()
            .iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |error| ValidationErrorDetail {
                    field: field.to_string(),
                    message: error
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| "Validation failed".to_string()),
                })
            })
            .collect();

        ApiError::ValidationError(errors)
    }
}

/// Convert authorization errors to API errors
///
/// Self-deletion is a client error (400), not a permissions problem.
impl From<corkboard_shared::auth::authorization::AuthzError> for ApiError {
    fn from(err: corkboard_shared::auth::authorization::AuthzError) -> Self {
        use corkboard_shared::auth::authorization::AuthzError;

        match err {
            AuthzError::NotMember(_) => {
                ApiError::Forbidden("Not a member of this kanban".to_string())
            }
            AuthzError::NotAdmin => ApiError::Forbidden("Requires admin role".to_string()),
            AuthzError::SelfDeletion => {
                ApiError::BadRequest("A user cannot delete their own account".to_string())
            }
            AuthzError::NotAuthorized => {
                ApiError::Forbidden("Not authorized to access this resource".to_string())
            }
            AuthzError::DatabaseError(err) => {
                ApiError::InternalError(format!("Database error: {}", err))
            }
        }
    }
}

/// Convert password errors to API errors
impl From<corkboard_shared::auth::password::PasswordError> for ApiError {
    fn from(err: corkboard_shared::auth::password::PasswordError) -> Self {
        ApiError::InternalError(format!("Password operation failed: {}", err))
    }
}

/// Convert JWT errors to API errors
impl From<corkboard_shared::auth::jwt::JwtError> for ApiError {
    fn from(err: corkboard_shared::auth::jwt::JwtError) -> Self {
        use corkboard_shared::auth::jwt::JwtError;

        match err {
            JwtError::Expired => ApiError::Unauthorized("Token expired".to_string()),
            JwtError::InvalidIssuer { .. } => {
                ApiError::Unauthorized("Invalid token issuer".to_string())
            }
            _ => ApiError::Unauthorized(format!("Invalid token: {}", err)),
        }
    }
}

/// Convert reorder batch errors to API errors
///
/// A malformed batch is always the client's mistake.
impl From<corkboard_shared::reorder::ReorderError> for ApiError {
    fn from(err: corkboard_shared::reorder::ReorderError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ApiError::BadRequest("Invalid input".to_string());
        assert_eq!(err.to_string(), "Bad request: Invalid input");

        let err = ApiError::NotFound("User not found".to_string());
        assert_eq!(err.to_string(), "Not found: User not found");
    }

    #[test]
    fn test_validation_error() {
        let errors = vec![
            ValidationErrorDetail {
                field: "email".to_string(),
                message: "Invalid email format".to_string(),
            },
            ValidationErrorDetail {
                field: "password".to_string(),
                message: "Password too short".to_string(),
            },
        ];

        let err = ApiError::ValidationError(errors);
        assert_eq!(err.to_string(), "Validation failed: 2 errors");
    }

    #[test]
    fn test_self_deletion_maps_to_bad_request() {
        use corkboard_shared::auth::authorization::AuthzError;

        let err: ApiError = AuthzError::SelfDeletion.into();
        assert!(matches!(err, ApiError::BadRequest(_)));
    }

    #[test]
    fn test_reorder_error_maps_to_bad_request() {
        use corkboard_shared::reorder::ReorderError;
        use uuid::Uuid;

        let err: ApiError = ReorderError::DuplicateCard(Uuid::new_v4()).into();
        assert!(matches!(err, ApiError::BadRequest(_)));
    }
}
