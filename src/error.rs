/// Unified error types for the QuickCart API
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Main error type for the API
#[derive(Error, Debug)]
pub enum ApiError {
    /// Database errors
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Missing or malformed input
    #[error("{0}")]
    Validation(String),

    /// Duplicate email at registration; clients receive this as a 400
    #[error("Email is already registered")]
    DuplicateEmail,

    /// Duplicate catalog entries or entities still referenced elsewhere
    #[error("{0}")]
    Conflict(String),

    /// Lookup misses
    #[error("{0}")]
    NotFound(String),

    /// Missing token or missing session context
    #[error("{0}")]
    Unauthorized(String),

    /// Access token past its expiry
    #[error("Token has expired. Please login again.")]
    TokenExpired,

    /// Access token failed signature or claims validation
    #[error("Invalid token. Unauthorized access.")]
    TokenInvalid,

    /// Password-reset OTP past its expiry
    #[error("OTP has expired")]
    OtpExpired,

    /// External collaborator (mail provider, storage) failures
    #[error("{0}")]
    Dependency(String),

    /// Internal server errors
    #[error("{0}")]
    Internal(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::DuplicateEmail | ApiError::OtpExpired => {
                StatusCode::BAD_REQUEST
            }
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Unauthorized(_) | ApiError::TokenExpired | ApiError::TokenInvalid => {
                StatusCode::UNAUTHORIZED
            }
            ApiError::Database(_)
            | ApiError::Dependency(_)
            | ApiError::Internal(_)
            | ApiError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Convert ApiError to the HTTP response envelope
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = Json(json!({
            "message": self.to_string(),
            "error": true,
            "success": false,
        }));

        (status, body).into_response()
    }
}

/// Result type alias for API operations
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_errors_carry_distinct_messages() {
        assert_eq!(
            ApiError::TokenExpired.to_string(),
            "Token has expired. Please login again."
        );
        assert_eq!(
            ApiError::TokenInvalid.to_string(),
            "Invalid token. Unauthorized access."
        );
    }

    #[test]
    fn statuses_follow_the_taxonomy() {
        assert_eq!(
            ApiError::Validation("x".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ApiError::DuplicateEmail.status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::Conflict("x".into()).status(), StatusCode::CONFLICT);
        assert_eq!(ApiError::NotFound("x".into()).status(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::TokenExpired.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::OtpExpired.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError::Dependency("mail".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
