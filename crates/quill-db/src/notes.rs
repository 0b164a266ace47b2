//! Note repository implementation.
//!
//! Every statement carries the owner id in its predicate, so a note that
//! exists but belongs to another account is indistinguishable from one
//! that does not exist at all.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Pool, Postgres};
use tracing::debug;
use uuid::Uuid;

use quill_core::{CreateNoteRequest, Error, Note, NoteRepository, Result, UpdateNoteRequest};

/// Display ordering shared by list and index: pinned first, most recently
/// modified first, id (time-ordered v7) as the deterministic tie-break.
const LIST_ORDER: &str = "pinned DESC, last_modified DESC, id DESC";

/// PostgreSQL implementation of [`NoteRepository`].
pub struct PgNoteRepository {
    pool: Pool<Postgres>,
}

impl PgNoteRepository {
    /// Create a new PgNoteRepository with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    fn now_millis() -> i64 {
        Utc::now().timestamp_millis()
    }
}

#[async_trait]
impl NoteRepository for PgNoteRepository {
    async fn list(&self, owner_id: Uuid) -> Result<Vec<Note>> {
        let notes = sqlx::query_as::<_, Note>(&format!(
            r#"
            SELECT id, title, content, tags, pinned, last_modified, owner_id
            FROM note
            WHERE owner_id = $1
            ORDER BY {LIST_ORDER}
            "#
        ))
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        debug!(
            subsystem = "db",
            component = "notes",
            op = "list",
            owner_id = %owner_id,
            result_count = notes.len(),
            "Listed notes"
        );
        Ok(notes)
    }

    async fn insert(&self, owner_id: Uuid, req: CreateNoteRequest) -> Result<Note> {
        let last_modified = req.last_modified.unwrap_or_else(Self::now_millis);

        let note = sqlx::query_as::<_, Note>(
            r#"
            INSERT INTO note (id, title, content, tags, pinned, last_modified, owner_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, title, content, tags, pinned, last_modified, owner_id
            "#,
        )
        .bind(Uuid::now_v7())
        .bind(&req.title)
        .bind(&req.content)
        .bind(&req.tags)
        .bind(req.pinned)
        .bind(last_modified)
        .bind(owner_id)
        .fetch_one(&self.pool)
        .await
        .map_err(Error::Database)?;

        debug!(
            subsystem = "db",
            component = "notes",
            op = "insert",
            owner_id = %owner_id,
            note_id = %note.id,
            "Inserted note"
        );
        Ok(note)
    }

    async fn update(&self, owner_id: Uuid, id: Uuid, req: UpdateNoteRequest) -> Result<Note> {
        // Single statement: the ownership check and the partial update are
        // one atomic read-modify-write. last_modified is always restamped.
        let note = sqlx::query_as::<_, Note>(
            r#"
            UPDATE note SET
                title = COALESCE($3, title),
                content = COALESCE($4, content),
                tags = COALESCE($5, tags),
                pinned = COALESCE($6, pinned),
                last_modified = $7
            WHERE id = $1 AND owner_id = $2
            RETURNING id, title, content, tags, pinned, last_modified, owner_id
            "#,
        )
        .bind(id)
        .bind(owner_id)
        .bind(req.title)
        .bind(req.content)
        .bind(req.tags)
        .bind(req.pinned)
        .bind(Self::now_millis())
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?
        .ok_or(Error::NoteNotFound(id))?;

        debug!(
            subsystem = "db",
            component = "notes",
            op = "update",
            owner_id = %owner_id,
            note_id = %id,
            "Updated note"
        );
        Ok(note)
    }

    async fn delete(&self, owner_id: Uuid, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM note WHERE id = $1 AND owner_id = $2")
            .bind(id)
            .bind(owner_id)
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;

        if result.rows_affected() == 0 {
            return Err(Error::NoteNotFound(id));
        }

        debug!(
            subsystem = "db",
            component = "notes",
            op = "delete",
            owner_id = %owner_id,
            note_id = %id,
            "Deleted note"
        );
        Ok(())
    }
}
