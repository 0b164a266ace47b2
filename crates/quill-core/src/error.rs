//! Error types for quillbox.

use thiserror::Error;

/// Result type alias using quillbox's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for quillbox operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation failed (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Note not found for the requesting owner.
    ///
    /// This is deliberately the only variant for both "no note with this id
    /// exists" and "the note belongs to someone else", so a caller can never
    /// probe for the existence of other owners' notes.
    #[error("Note not found: {0}")]
    NoteNotFound(uuid::Uuid),

    /// Registration rejected: username already taken (exact, case-sensitive)
    #[error("Username already taken: {0}")]
    UsernameTaken(String),

    /// Login rejected. Unknown usernames and wrong passwords produce this
    /// same variant and message.
    #[error("Invalid username or password")]
    InvalidCredentials,

    /// No credential was presented
    #[error("Authentication required")]
    Unauthenticated,

    /// A credential was presented but could not be verified
    #[error("Invalid or expired token: {0}")]
    Token(String),

    /// Password hashing failed
    #[error("Credential error: {0}")]
    Hash(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// HTTP/network request failed
    #[error("Request error: {0}")]
    Request(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),

    /// File I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Error::Request(e.to_string())
    }
}
