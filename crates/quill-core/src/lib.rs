//! # quill-core
//!
//! Core types, traits, and abstractions for quillbox.
//!
//! This crate defines:
//! - The shared [`Error`] type and [`Result`] alias
//! - Domain models ([`Account`], [`Note`], [`Role`])
//! - Repository traits implemented by `quill-db`, enabling pluggable
//!   backends and testability
//! - Structured logging field constants

pub mod error;
pub mod logging;
pub mod models;
pub mod traits;

pub use error::{Error, Result};
pub use models::{Account, Note, Role};
pub use traits::{
    AccountRepository, CreateAccountRequest, CreateNoteRequest, NoteRepository, UpdateNoteRequest,
};
