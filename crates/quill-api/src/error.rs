//! API error type and HTTP status mapping.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use tracing::error;
use uuid::Uuid;

/// Errors surfaced by API handlers.
///
/// Every server-side failure is caught here and mapped to the wire
/// taxonomy; internal detail (sqlx messages, stack context) never reaches
/// the response body.
#[derive(Debug)]
pub enum ApiError {
    /// No token presented (401).
    Unauthenticated,
    /// Token presented but unverifiable or expired (403).
    InvalidToken(String),
    /// Registration username collision (400).
    UsernameTaken(String),
    /// Login failure; one message for unknown username and wrong password (400).
    InvalidCredentials,
    /// Nonexistent or non-owned note; deliberately one variant (404).
    NoteNotFound(Uuid),
    /// Malformed request (400).
    BadRequest(String),
    /// Catch-all persistence/internal failure (500).
    Internal(quill_core::Error),
}

impl From<quill_core::Error> for ApiError {
    fn from(err: quill_core::Error) -> Self {
        match err {
            quill_core::Error::NoteNotFound(id) => ApiError::NoteNotFound(id),
            quill_core::Error::UsernameTaken(name) => ApiError::UsernameTaken(name),
            quill_core::Error::InvalidCredentials => ApiError::InvalidCredentials,
            quill_core::Error::Unauthenticated => ApiError::Unauthenticated,
            quill_core::Error::Token(msg) => ApiError::InvalidToken(msg),
            quill_core::Error::InvalidInput(msg) => ApiError::BadRequest(msg),
            other => ApiError::Internal(other),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            ApiError::Unauthenticated => (
                StatusCode::UNAUTHORIZED,
                "Access denied. No token provided.".to_string(),
            ),
            ApiError::InvalidToken(_) => (
                StatusCode::FORBIDDEN,
                "Invalid or expired token.".to_string(),
            ),
            ApiError::UsernameTaken(name) => (
                StatusCode::BAD_REQUEST,
                format!("Username already taken: {}", name),
            ),
            ApiError::InvalidCredentials => (
                StatusCode::BAD_REQUEST,
                quill_core::Error::InvalidCredentials.to_string(),
            ),
            // Same body shape whether the id is unknown or owned by someone
            // else.
            ApiError::NoteNotFound(_) => (StatusCode::NOT_FOUND, "Note not found".to_string()),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Internal(err) => {
                error!(
                    subsystem = "api",
                    error = %err,
                    "Request failed with internal error"
                );
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(serde_json::json!({
            "error": message,
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(err: ApiError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(status_of(ApiError::Unauthenticated), StatusCode::UNAUTHORIZED);
        assert_eq!(
            status_of(ApiError::InvalidToken("expired".into())),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            status_of(ApiError::UsernameTaken("alice".into())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(ApiError::InvalidCredentials),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(ApiError::NoteNotFound(Uuid::nil())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(ApiError::Internal(quill_core::Error::Internal("x".into()))),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_not_found_body_carries_no_id() {
        // The body must not reveal whether the id exists for another owner.
        let response = ApiError::NoteNotFound(Uuid::new_v4()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_internal_error_hides_detail() {
        let err = quill_core::Error::Internal("connection refused on 10.0.0.3".into());
        let response = ApiError::Internal(err).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_core_error_conversion() {
        let api: ApiError = quill_core::Error::NoteNotFound(Uuid::nil()).into();
        assert!(matches!(api, ApiError::NoteNotFound(_)));

        let api: ApiError = quill_core::Error::InvalidCredentials.into();
        assert!(matches!(api, ApiError::InvalidCredentials));

        let api: ApiError = quill_core::Error::Token("bad".into()).into();
        assert!(matches!(api, ApiError::InvalidToken(_)));
    }
}
