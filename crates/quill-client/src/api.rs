//! HTTP transport to the quillbox REST API.
//!
//! The sync controller depends on the [`NotesApi`] trait, not on this
//! concrete client, so tests can drive it with a recording fake.

use async_trait::async_trait;
use serde::Deserialize;
use std::sync::RwLock;
use uuid::Uuid;

use quill_core::{CreateNoteRequest, Error, Note, Result, Role, UpdateNoteRequest};

/// Authenticated note operations used by the sync controller.
#[async_trait]
pub trait NotesApi: Send + Sync + 'static {
    async fn list_notes(&self) -> Result<Vec<Note>>;
    async fn create_note(&self, req: CreateNoteRequest) -> Result<Note>;
    async fn update_note(&self, id: Uuid, req: UpdateNoteRequest) -> Result<Note>;
    async fn delete_note(&self, id: Uuid) -> Result<()>;
}

/// Successful login payload.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginOutcome {
    pub token: String,
    pub role: Role,
    pub username: String,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// reqwest-backed API client carrying the bearer token.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token: RwLock<Option<String>>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            token: RwLock::new(None),
        }
    }

    /// Attach the bearer token used on every note request.
    pub fn set_token(&self, token: impl Into<String>) {
        *self.token.write().expect("token lock poisoned") = Some(token.into());
    }

    /// Drop the bearer token (logout).
    pub fn clear_token(&self) {
        *self.token.write().expect("token lock poisoned") = None;
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    fn bearer(&self) -> Result<String> {
        self.token
            .read()
            .expect("token lock poisoned")
            .clone()
            .ok_or(Error::Unauthenticated)
    }

    async fn error_message(response: reqwest::Response) -> String {
        response
            .json::<ErrorBody>()
            .await
            .map(|b| b.error)
            .unwrap_or_else(|e| e.to_string())
    }

    /// Map a non-success note-endpoint response to the error taxonomy.
    /// `id` is the note the request addressed; collection endpoints have
    /// none.
    async fn note_error(response: reqwest::Response, id: Option<Uuid>) -> Error {
        let status = response.status();
        let message = Self::error_message(response).await;
        match (status.as_u16(), id) {
            (401, _) => Error::Unauthenticated,
            (403, _) => Error::Token(message),
            (404, Some(id)) => Error::NoteNotFound(id),
            _ => Error::Request(message),
        }
    }

    pub async fn register(&self, username: &str, password: &str, role: Role) -> Result<()> {
        let response = self
            .http
            .post(self.url("/api/auth/register"))
            .json(&serde_json::json!({
                "username": username,
                "password": password,
                "role": role,
            }))
            .send()
            .await?;

        if response.status().is_success() {
            return Ok(());
        }
        let status = response.status();
        let message = Self::error_message(response).await;
        if status.as_u16() == 400 {
            Err(Error::UsernameTaken(message))
        } else {
            Err(Error::Request(message))
        }
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<LoginOutcome> {
        let response = self
            .http
            .post(self.url("/api/auth/login"))
            .json(&serde_json::json!({
                "username": username,
                "password": password,
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            return match response.status().as_u16() {
                400 => Err(Error::InvalidCredentials),
                _ => Err(Error::Request(Self::error_message(response).await)),
            };
        }

        let outcome: LoginOutcome = response.json().await?;
        self.set_token(outcome.token.clone());
        Ok(outcome)
    }
}

#[async_trait]
impl NotesApi for ApiClient {
    async fn list_notes(&self) -> Result<Vec<Note>> {
        let response = self
            .http
            .get(self.url("/api/notes"))
            .bearer_auth(self.bearer()?)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(Self::note_error(response, None).await);
        }
        Ok(response.json().await?)
    }

    async fn create_note(&self, req: CreateNoteRequest) -> Result<Note> {
        let response = self
            .http
            .post(self.url("/api/notes"))
            .bearer_auth(self.bearer()?)
            .json(&serde_json::json!({
                "title": req.title,
                "content": req.content,
                "tags": req.tags,
                "pinned": req.pinned,
                "lastModified": req.last_modified,
            }))
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(Self::note_error(response, None).await);
        }
        Ok(response.json().await?)
    }

    async fn update_note(&self, id: Uuid, req: UpdateNoteRequest) -> Result<Note> {
        let response = self
            .http
            .put(self.url(&format!("/api/notes/{}", id)))
            .bearer_auth(self.bearer()?)
            .json(&serde_json::json!({
                "title": req.title,
                "content": req.content,
                "tags": req.tags,
                "pinned": req.pinned,
                "lastModified": req.last_modified,
            }))
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(Self::note_error(response, Some(id)).await);
        }
        Ok(response.json().await?)
    }

    async fn delete_note(&self, id: Uuid) -> Result<()> {
        let response = self
            .http
            .delete(self.url(&format!("/api/notes/{}", id)))
            .bearer_auth(self.bearer()?)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(Self::note_error(response, Some(id)).await);
        }
        Ok(())
    }
}
