//! Domain models for quillbox.
//!
//! Wire names follow the REST surface (camelCase: `lastModified`,
//! `ownerId`); database columns stay snake_case via `sqlx::FromRow`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Account role flag.
///
/// Stored at registration and echoed back at login. The role is not used to
/// gate any note operation; notes are owner-exclusive regardless of role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "account_role", rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

impl Default for Role {
    fn default() -> Self {
        Role::User
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Admin => write!(f, "admin"),
        }
    }
}

/// A registered account.
///
/// Immutable after registration. The password hash never leaves the server;
/// it is skipped during serialization.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: Uuid,
    /// Unique, case-sensitive exact match.
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

/// A note owned by exactly one account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: Uuid,
    pub title: String,
    /// Rich-text markup, opaque to the server.
    pub content: String,
    pub tags: Vec<String>,
    pub pinned: bool,
    /// Epoch milliseconds of the last successful mutation. Secondary to
    /// `pinned` as the display ordering key.
    pub last_modified: i64,
    /// Set from the authenticated caller at creation, never from the
    /// payload, and immutable thereafter.
    pub owner_id: Uuid,
}
