//! # quill-api
//!
//! HTTP API server for quillbox.
//!
//! The router, state, and handlers live in the library so integration
//! tests can drive the full middleware + handler stack against in-memory
//! repository backends; the binary wires in PostgreSQL.

pub mod error;
pub mod extract;
pub mod handlers;

use std::num::NonZeroU32;
use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use governor::{Quota, RateLimiter};
use tower_http::cors::CorsLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::request_id::{
    MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer,
};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use quill_auth::TokenService;
use quill_core::{AccountRepository, NoteRepository};

pub use error::ApiError;
pub use extract::AuthOwner;

/// Maximum accepted request body size (1 MiB; notes are short documents).
const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Global rate limiter type (direct quota, no keyed bucketing for a
/// personal server).
pub type GlobalRateLimiter = RateLimiter<
    governor::state::NotKeyed,
    governor::state::InMemoryState,
    governor::clock::DefaultClock,
>;

/// Generates time-ordered UUIDv7 request correlation IDs.
///
/// UUIDv7 embeds a Unix timestamp, so IDs sort chronologically — useful
/// for log correlation and debugging.
#[derive(Clone, Default)]
pub struct MakeRequestUuidV7;

impl MakeRequestId for MakeRequestUuidV7 {
    fn make_request_id<B>(&mut self, _request: &axum::http::Request<B>) -> Option<RequestId> {
        let id = Uuid::now_v7().to_string().parse().ok()?;
        Some(RequestId::new(id))
    }
}

/// Application state shared across handlers.
///
/// Repositories are held as trait objects so tests can swap in in-memory
/// backends without a database.
#[derive(Clone)]
pub struct AppState {
    pub accounts: Arc<dyn AccountRepository>,
    pub notes: Arc<dyn NoteRepository>,
    pub tokens: TokenService,
    /// Global rate limiter (None disables rate limiting).
    pub rate_limiter: Option<Arc<GlobalRateLimiter>>,
}

impl AppState {
    /// Build state with rate limiting disabled (tests, embedded use).
    pub fn new(
        accounts: Arc<dyn AccountRepository>,
        notes: Arc<dyn NoteRepository>,
        tokens: TokenService,
    ) -> Self {
        Self {
            accounts,
            notes,
            tokens,
            rate_limiter: None,
        }
    }

    /// Enable a global requests-per-minute rate limit.
    pub fn with_rate_limit(mut self, per_minute: u32) -> Self {
        if let Some(quota) = NonZeroU32::new(per_minute) {
            self.rate_limiter = Some(Arc::new(RateLimiter::direct(Quota::per_minute(quota))));
        }
        self
    }
}

async fn rate_limit(State(state): State<AppState>, request: Request, next: Next) -> Response {
    if let Some(limiter) = &state.rate_limiter {
        if limiter.check().is_err() {
            return (
                StatusCode::TOO_MANY_REQUESTS,
                Json(serde_json::json!({ "error": "Too many requests" })),
            )
                .into_response();
        }
    }
    next.run(request).await
}

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

/// Build the full router: routes, authorization gate (via extractors in
/// the note handlers), and the middleware stack.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/auth/register", post(handlers::auth::register))
        .route("/api/auth/login", post(handlers::auth::login))
        .route(
            "/api/notes",
            get(handlers::notes::list_notes).post(handlers::notes::create_note),
        )
        .route(
            "/api/notes/:id",
            put(handlers::notes::update_note).delete(handlers::notes::delete_note),
        )
        .layer(middleware::from_fn_with_state(state.clone(), rate_limit))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV7))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .with_state(state)
}
