//! Repository traits for quillbox storage backends.
//!
//! These traits define the interfaces that concrete implementations must
//! satisfy, enabling pluggable backends and testability. `quill-db`
//! provides the PostgreSQL implementations; test suites provide in-memory
//! ones.

use async_trait::async_trait;
use serde::Deserialize;
use uuid::Uuid;

use crate::error::Result;
use crate::models::{Account, Note, Role};

/// Request for registering a new account.
///
/// The password arrives pre-hashed; repositories never see plaintext.
#[derive(Debug, Clone)]
pub struct CreateAccountRequest {
    pub username: String,
    pub password_hash: String,
    pub role: Role,
}

/// Request for creating a new note.
///
/// Carries no owner field: the owner is always the resolved caller, passed
/// separately. Unknown JSON fields (including a client-supplied `ownerId`)
/// are dropped during deserialization.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateNoteRequest {
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub pinned: bool,
    /// Epoch millis; defaults to creation time when absent.
    pub last_modified: Option<i64>,
}

/// Partial field set for updating a note.
///
/// Only supplied fields are applied. `last_modified` is restamped
/// server-side on every successful update regardless of this payload.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateNoteRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub tags: Option<Vec<String>>,
    pub pinned: Option<bool>,
    pub last_modified: Option<i64>,
}

/// Repository for account storage.
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Insert a new account. Fails with [`crate::Error::UsernameTaken`] on
    /// an exact username collision.
    async fn insert(&self, req: CreateAccountRequest) -> Result<Account>;

    /// Look up an account by exact username.
    async fn find_by_username(&self, username: &str) -> Result<Option<Account>>;
}

/// Repository for note storage. Every operation is scoped to an owner;
/// no statement can reach another owner's notes.
#[async_trait]
pub trait NoteRepository: Send + Sync {
    /// All notes owned by `owner_id`, ordered pinned first, then
    /// `last_modified` descending, then id descending.
    async fn list(&self, owner_id: Uuid) -> Result<Vec<Note>>;

    /// Insert a new note owned by `owner_id`, returning the persisted note
    /// with its assigned id.
    async fn insert(&self, owner_id: Uuid, req: CreateNoteRequest) -> Result<Note>;

    /// Apply the supplied fields to the note, if it exists and is owned by
    /// `owner_id`; otherwise fail with [`crate::Error::NoteNotFound`].
    async fn update(&self, owner_id: Uuid, id: Uuid, req: UpdateNoteRequest) -> Result<Note>;

    /// Remove the note, under the same ownership predicate as `update`.
    async fn delete(&self, owner_id: Uuid, id: Uuid) -> Result<()>;
}
