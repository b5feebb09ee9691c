//! # Error Handling
//!
//! This module defines the application error type and converts it into HTTP
//! responses. Every failure leaves the server as a status code plus a JSON
//! body of the form:
//!
//! ```json
//! { "message": "Session 'abc' not found", "error": "not_found" }
//! ```
//!
//! `message` is safe to show to a user; `error` is a stable machine-readable kind.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Application-wide error type
///
/// Store and serialization errors convert automatically through `#[from]`,
/// so `?` works directly on `sqlx` and `serde_json` results.
#[derive(Error, Debug)]
pub enum AppError {
    /// Any failing operation against the database
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Embedded migrations could not be applied
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// JSON payload stored in, or read from, the database was unusable
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Request carried no `Authorization` header (401)
    #[error("Missing bearer token")]
    MissingToken,

    /// Token was malformed, expired, or signed with another secret (401)
    #[error("Invalid token: {0}")]
    InvalidToken(String),

    /// Caller is authenticated but their stored role does not allow the route (403)
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Requested record does not exist (404)
    #[error("Not found: {0}")]
    NotFound(String),

    /// Client sent invalid data (400)
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Session status change not allowed from the current status (409)
    #[error("Invalid transition: {0}")]
    InvalidTransition(String),

    /// Unexpected failures that shouldn't normally occur (500)
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    /// Stable identifier of the error category, sent as the `error` field.
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::Database(_) | AppError::Migration(_) => "internal_store_error",
            AppError::Serialization(_) | AppError::Internal(_) => "internal",
            AppError::MissingToken => "missing_token",
            AppError::InvalidToken(_) => "invalid_token",
            AppError::Forbidden(_) => "forbidden",
            AppError::NotFound(_) => "not_found",
            AppError::BadRequest(_) => "bad_request",
            AppError::InvalidTransition(_) => "invalid_transition",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Database(_)
            | AppError::Migration(_)
            | AppError::Serialization(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::MissingToken | AppError::InvalidToken(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::InvalidTransition(_) => StatusCode::CONFLICT,
        }
    }
}

/// Convert AppError into an HTTP response
///
/// Store and serialization details are logged and replaced with a generic
/// message; the remaining variants carry a message that is safe to return.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let message = match &self {
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                "Database error".to_string()
            }
            AppError::Migration(e) => {
                tracing::error!("Migration error: {:?}", e);
                "Database error".to_string()
            }
            AppError::Serialization(e) => {
                tracing::error!("Serialization error: {:?}", e);
                "Serialization error".to_string()
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {}", e);
                "Internal server error".to_string()
            }
            AppError::MissingToken | AppError::InvalidToken(_) | AppError::Forbidden(_) => {
                tracing::debug!("Rejected request: {}", self);
                self.to_string()
            }
            _ => self.to_string(),
        };

        let body = Json(json!({
            "message": message,
            "error": self.kind(),
        }));

        (self.status(), body).into_response()
    }
}

/// Convenience type alias for Results using AppError
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(AppError::MissingToken, StatusCode::UNAUTHORIZED, "missing_token")]
    #[case(AppError::InvalidToken("expired".into()), StatusCode::UNAUTHORIZED, "invalid_token")]
    #[case(AppError::Forbidden("admin only".into()), StatusCode::FORBIDDEN, "forbidden")]
    #[case(AppError::NotFound("session".into()), StatusCode::NOT_FOUND, "not_found")]
    #[case(AppError::BadRequest("price".into()), StatusCode::BAD_REQUEST, "bad_request")]
    #[case(AppError::InvalidTransition("rejected -> approved".into()), StatusCode::CONFLICT, "invalid_transition")]
    #[case(AppError::Database(sqlx::Error::RowNotFound), StatusCode::INTERNAL_SERVER_ERROR, "internal_store_error")]
    fn maps_variants_to_status_and_kind(
        #[case] error: AppError,
        #[case] status: StatusCode,
        #[case] kind: &str,
    ) {
        assert_eq!(error.status(), status);
        assert_eq!(error.kind(), kind);
        assert_eq!(error.into_response().status(), status);
    }

    #[tokio::test]
    async fn store_errors_do_not_leak_details() {
        let response = AppError::Database(sqlx::Error::PoolTimedOut).into_response();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(body["message"], "Database error");
        assert_eq!(body["error"], "internal_store_error");
    }
}
