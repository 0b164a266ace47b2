//! Persisted session credentials.
//!
//! The session survives restarts until explicit logout, mirroring the
//! server's stateless 24h tokens: clearing the store is the only logout
//! mechanism there is.

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use quill_core::{Result, Role};

/// Credentials held between runs: the signed token plus the display
/// identity it was issued for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub username: String,
    pub role: Role,
}

/// File-backed session persistence.
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Restore a saved session, if any. A corrupt file reads as no
    /// session rather than an error; the user just logs in again.
    pub fn load(&self) -> Option<Session> {
        let bytes = fs::read(&self.path).ok()?;
        serde_json::from_slice(&bytes).ok()
    }

    /// Persist the session across restarts.
    pub fn save(&self, session: &Session) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_vec_pretty(session)?)?;
        Ok(())
    }

    /// Forget the session (logout).
    pub fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> (tempfile::TempDir, SessionStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path().join("session.json"));
        (dir, store)
    }

    #[test]
    fn test_save_load_clear_roundtrip() {
        let (_dir, store) = store();
        assert!(store.load().is_none());

        let session = Session {
            token: "abc.def.ghi".to_string(),
            username: "alice".to_string(),
            role: Role::User,
        };
        store.save(&session).unwrap();
        assert_eq!(store.load(), Some(session));

        store.clear().unwrap();
        assert!(store.load().is_none());
    }

    #[test]
    fn test_clear_is_idempotent() {
        let (_dir, store) = store();
        store.clear().unwrap();
        store.clear().unwrap();
    }

    #[test]
    fn test_corrupt_file_reads_as_no_session() {
        let (_dir, store) = store();
        fs::write(
            store.path.as_path(),
            b"{ this is not a session",
        )
        .unwrap();
        assert!(store.load().is_none());
    }

    #[test]
    fn test_save_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path().join("nested/deep/session.json"));
        let session = Session {
            token: "t".to_string(),
            username: "alice".to_string(),
            role: Role::Admin,
        };
        store.save(&session).unwrap();
        assert_eq!(store.load(), Some(session));
    }
}
