//! # quill-db
//!
//! PostgreSQL database layer for quillbox.
//!
//! This crate provides:
//! - Connection pool management
//! - Repository implementations for accounts and owner-scoped notes
//! - Schema migrations (behind the `migrations` feature)
//!
//! ## Example
//!
//! ```rust,ignore
//! use quill_db::Database;
//! use quill_core::NoteRepository;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::connect("postgres://localhost/quillbox").await?;
//!     let notes = db.notes.list(owner_id).await?;
//!     Ok(())
//! }
//! ```

pub mod accounts;
pub mod notes;
pub mod pool;

// Re-export core types
pub use quill_core::*;

pub use accounts::PgAccountRepository;
pub use notes::PgNoteRepository;
pub use pool::{create_pool, create_pool_with_config, PoolConfig};

/// Combined database context with all repositories.
pub struct Database {
    /// The underlying connection pool.
    pub pool: sqlx::Pool<sqlx::Postgres>,
    /// Account repository.
    pub accounts: PgAccountRepository,
    /// Note repository for owner-scoped CRUD.
    pub notes: PgNoteRepository,
}

impl Database {
    /// Connect with default pool configuration.
    pub async fn connect(database_url: &str) -> Result<Self> {
        Self::connect_with_config(database_url, PoolConfig::default()).await
    }

    /// Connect with custom pool configuration.
    pub async fn connect_with_config(database_url: &str, config: PoolConfig) -> Result<Self> {
        let pool = create_pool_with_config(database_url, config).await?;
        Ok(Self {
            accounts: PgAccountRepository::new(pool.clone()),
            notes: PgNoteRepository::new(pool.clone()),
            pool,
        })
    }

    /// Run pending schema migrations.
    #[cfg(feature = "migrations")]
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| Error::Internal(format!("Migration failed: {}", e)))?;
        Ok(())
    }
}
