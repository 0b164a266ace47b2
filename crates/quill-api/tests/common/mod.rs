//! Shared test harness: in-memory repository backends behind the core
//! traits, plus request helpers for driving the full router without a
//! database.
#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, Response, StatusCode};
use axum::Router;
use chrono::Utc;
use http_body_util::BodyExt;
use tower::ServiceExt;
use uuid::Uuid;

use quill_api::{build_router, AppState};
use quill_auth::TokenService;
use quill_core::{
    Account, AccountRepository, CreateAccountRequest, CreateNoteRequest, Error, Note,
    NoteRepository, Result, UpdateNoteRequest,
};

pub const TEST_SECRET: &str = "integration-test-secret";

fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// In-memory [`AccountRepository`].
#[derive(Default)]
pub struct MemoryAccountRepository {
    accounts: Mutex<Vec<Account>>,
}

#[async_trait]
impl AccountRepository for MemoryAccountRepository {
    async fn insert(&self, req: CreateAccountRequest) -> Result<Account> {
        let mut accounts = self.accounts.lock().unwrap();
        if accounts.iter().any(|a| a.username == req.username) {
            return Err(Error::UsernameTaken(req.username));
        }
        let account = Account {
            id: Uuid::new_v4(),
            username: req.username,
            password_hash: req.password_hash,
            role: req.role,
            created_at: Utc::now(),
        };
        accounts.push(account.clone());
        Ok(account)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<Account>> {
        let accounts = self.accounts.lock().unwrap();
        Ok(accounts.iter().find(|a| a.username == username).cloned())
    }
}

/// In-memory [`NoteRepository`] with the same owner-scoping and ordering
/// semantics as the PostgreSQL implementation.
#[derive(Default)]
pub struct MemoryNoteRepository {
    notes: Mutex<Vec<Note>>,
}

#[async_trait]
impl NoteRepository for MemoryNoteRepository {
    async fn list(&self, owner_id: Uuid) -> Result<Vec<Note>> {
        let notes = self.notes.lock().unwrap();
        let mut owned: Vec<Note> = notes
            .iter()
            .filter(|n| n.owner_id == owner_id)
            .cloned()
            .collect();
        owned.sort_by(|a, b| {
            b.pinned
                .cmp(&a.pinned)
                .then(b.last_modified.cmp(&a.last_modified))
                .then(b.id.cmp(&a.id))
        });
        Ok(owned)
    }

    async fn insert(&self, owner_id: Uuid, req: CreateNoteRequest) -> Result<Note> {
        let note = Note {
            id: Uuid::now_v7(),
            title: req.title,
            content: req.content,
            tags: req.tags,
            pinned: req.pinned,
            last_modified: req.last_modified.unwrap_or_else(now_millis),
            owner_id,
        };
        self.notes.lock().unwrap().push(note.clone());
        Ok(note)
    }

    async fn update(&self, owner_id: Uuid, id: Uuid, req: UpdateNoteRequest) -> Result<Note> {
        let mut notes = self.notes.lock().unwrap();
        let note = notes
            .iter_mut()
            .find(|n| n.id == id && n.owner_id == owner_id)
            .ok_or(Error::NoteNotFound(id))?;
        if let Some(title) = req.title {
            note.title = title;
        }
        if let Some(content) = req.content {
            note.content = content;
        }
        if let Some(tags) = req.tags {
            note.tags = tags;
        }
        if let Some(pinned) = req.pinned {
            note.pinned = pinned;
        }
        note.last_modified = now_millis();
        Ok(note.clone())
    }

    async fn delete(&self, owner_id: Uuid, id: Uuid) -> Result<()> {
        let mut notes = self.notes.lock().unwrap();
        let before = notes.len();
        notes.retain(|n| !(n.id == id && n.owner_id == owner_id));
        if notes.len() == before {
            return Err(Error::NoteNotFound(id));
        }
        Ok(())
    }
}

/// Build a full router backed by in-memory repositories.
pub fn test_app() -> Router {
    let state = AppState::new(
        Arc::new(MemoryAccountRepository::default()),
        Arc::new(MemoryNoteRepository::default()),
        TokenService::new(TEST_SECRET),
    );
    build_router(state)
}

/// Issue a request and return (status, parsed JSON body).
pub async fn request(
    app: &Router,
    method: &str,
    path: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let mut builder = Request::builder().method(method).uri(path);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&json).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response: Response<_> = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null)
    };
    (status, json)
}

/// Register an account and log in, returning the session token and the
/// registered account id.
pub async fn register_and_login(app: &Router, username: &str, password: &str) -> (String, Uuid) {
    let (status, created) = request(
        app,
        "POST",
        "/api/auth/register",
        None,
        Some(serde_json::json!({
            "username": username,
            "password": password,
            "role": "user",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let account_id: Uuid = created["id"].as_str().unwrap().parse().unwrap();

    let (status, body) = request(
        app,
        "POST",
        "/api/auth/login",
        None,
        Some(serde_json::json!({
            "username": username,
            "password": password,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    (body["token"].as_str().unwrap().to_string(), account_id)
}
