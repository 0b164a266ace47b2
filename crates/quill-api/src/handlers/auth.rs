//! Registration and login handlers.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use quill_auth::{hash_password, verify_password};
use quill_core::{CreateAccountRequest, Role};

use crate::error::ApiError;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct RegisterBody {
    pub username: String,
    pub password: String,
    /// Honored as requested. There is no server-side elevation gate on
    /// registration; the role is stored but gates no note operation.
    #[serde(default)]
    pub role: Role,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    pub id: Uuid,
    pub username: String,
    pub role: Role,
}

#[derive(Debug, Deserialize)]
pub struct LoginBody {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub role: Role,
    pub username: String,
}

pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterBody>,
) -> Result<impl IntoResponse, ApiError> {
    if body.username.trim().is_empty() {
        return Err(ApiError::BadRequest("Username is required".to_string()));
    }
    if body.password.is_empty() {
        return Err(ApiError::BadRequest("Password is required".to_string()));
    }

    let password_hash = hash_password(&body.password)?;
    let account = state
        .accounts
        .insert(CreateAccountRequest {
            username: body.username,
            password_hash,
            role: body.role,
        })
        .await?;

    info!(
        subsystem = "api",
        op = "register",
        username = %account.username,
        "Account registered"
    );

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            id: account.id,
            username: account.username,
            role: account.role,
        }),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginBody>,
) -> Result<impl IntoResponse, ApiError> {
    // Unknown username and password mismatch take the same exit so the two
    // cases stay indistinguishable on the wire.
    let account = match state.accounts.find_by_username(&body.username).await? {
        Some(account) => account,
        None => {
            warn!(
                subsystem = "api",
                op = "login",
                username = %body.username,
                success = false,
                "Login rejected"
            );
            return Err(ApiError::InvalidCredentials);
        }
    };

    if !verify_password(&body.password, &account.password_hash) {
        warn!(
            subsystem = "api",
            op = "login",
            username = %body.username,
            success = false,
            "Login rejected"
        );
        return Err(ApiError::InvalidCredentials);
    }

    let token = state.tokens.issue(account.id, account.role)?;

    info!(
        subsystem = "api",
        op = "login",
        username = %account.username,
        success = true,
        "Login succeeded"
    );

    Ok(Json(LoginResponse {
        token,
        role: account.role,
        username: account.username,
    }))
}
