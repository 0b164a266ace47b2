//! # quill-client
//!
//! Client-side synchronization library for quillbox.
//!
//! This crate provides:
//! - [`ApiClient`], the reqwest transport to the REST API, behind the
//!   [`NotesApi`] trait so the controller can be tested against a fake
//! - [`SyncController`], which owns the working set and handles debounced
//!   autosave, confirmed pin/delete, and stale-response rejection
//! - [`view`], pure projection of the working set into display groups
//! - [`SessionStore`], file-backed persistence of login credentials

pub mod api;
pub mod session;
pub mod sync;
pub mod view;

pub use api::{ApiClient, LoginOutcome, NotesApi};
pub use session::{Session, SessionStore};
pub use sync::{Snapshot, SyncController, SyncState, WorkingNote, DEBOUNCE_WINDOW};
pub use view::{NoteCard, NoteFilter, Projection};
