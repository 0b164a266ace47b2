//! Account repository implementation.

use async_trait::async_trait;
use sqlx::{Pool, Postgres};
use tracing::info;
use uuid::Uuid;

use quill_core::{Account, AccountRepository, CreateAccountRequest, Error, Result};

/// PostgreSQL implementation of [`AccountRepository`].
pub struct PgAccountRepository {
    pool: Pool<Postgres>,
}

impl PgAccountRepository {
    /// Create a new PgAccountRepository with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccountRepository for PgAccountRepository {
    async fn insert(&self, req: CreateAccountRequest) -> Result<Account> {
        let result = sqlx::query_as::<_, Account>(
            r#"
            INSERT INTO account (id, username, password_hash, role)
            VALUES ($1, $2, $3, $4)
            RETURNING id, username, password_hash, role, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&req.username)
        .bind(&req.password_hash)
        .bind(req.role)
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(account) => {
                info!(
                    subsystem = "db",
                    component = "accounts",
                    op = "insert",
                    username = %account.username,
                    "Account registered"
                );
                Ok(account)
            }
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                Err(Error::UsernameTaken(req.username))
            }
            Err(e) => Err(Error::Database(e)),
        }
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<Account>> {
        let account = sqlx::query_as::<_, Account>(
            r#"
            SELECT id, username, password_hash, role, created_at
            FROM account
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(account)
    }
}
