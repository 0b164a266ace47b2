//! Authorization gate.
//!
//! Every note route resolves the caller's identity through this extractor
//! before its handler runs; no note operation is reachable without it.

use axum::extract::FromRequestParts;
use axum::http::header;
use axum::http::request::Parts;
use uuid::Uuid;

use quill_core::Role;

use crate::error::ApiError;
use crate::AppState;

/// The resolved owner identity attached to an authenticated request.
///
/// - Missing `Authorization: Bearer` header → 401.
/// - Present but unverifiable/expired token → 403.
#[derive(Debug, Clone, Copy)]
pub struct AuthOwner {
    pub id: Uuid,
    #[allow(dead_code)]
    pub role: Role,
}

#[axum::async_trait]
impl FromRequestParts<AppState> for AuthOwner {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok());

        let token = match auth_header {
            Some(header) if header.starts_with("Bearer ") => {
                header.trim_start_matches("Bearer ").trim()
            }
            _ => return Err(ApiError::Unauthenticated),
        };

        if token.is_empty() {
            return Err(ApiError::Unauthenticated);
        }

        let claims = state
            .tokens
            .verify(token)
            .map_err(|e| ApiError::InvalidToken(e.to_string()))?;

        Ok(AuthOwner {
            id: claims.sub,
            role: claims.role,
        })
    }
}
