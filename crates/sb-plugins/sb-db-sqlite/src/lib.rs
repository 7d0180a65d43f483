//! # sb-db-sqlite Implementation
//!
//! This module implements the data mapping between the SQLite relational model
//! and the `sb-core` domain models.

use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sb_core::error::{AppError, Result};
use sb_core::models::{NewSnippet, NewUser, Snippet, User};
use sb_core::traits::{SnippetRepo, UserRepo};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::Row;

/// Pool-backed repository for both snippets and users.
#[derive(Debug, Clone)]
pub struct SqliteRepo {
    pool: SqlitePool,
}

impl SqliteRepo {
    /// Opens (creating if needed) the database named by `dsn`,
    /// e.g. `sqlite://snippetbox.db`.
    pub async fn connect(dsn: &str) -> std::result::Result<Self, sqlx::Error> {
        let options = SqliteConnectOptions::from_str(dsn)?
            .create_if_missing(true)
            .foreign_keys(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5));
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;
        Ok(Self { pool })
    }

    /// A private in-memory database. Pinned to one connection that never
    /// recycles, since every SQLite connection gets its own `:memory:`.
    pub async fn in_memory() -> std::result::Result<Self, sqlx::Error> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await?;
        Ok(Self { pool })
    }

    /// Applies the embedded schema migrations.
    pub async fn migrate(&self) -> std::result::Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./migrations").run(&self.pool).await
    }

    /// Shared with the session store so both live in one database.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

fn storage_error(err: sqlx::Error) -> AppError {
    tracing::debug!(error = %err, "sqlite query failed");
    AppError::storage(err)
}

fn snippet_from_row(row: &SqliteRow) -> std::result::Result<Snippet, sqlx::Error> {
    Ok(Snippet {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        content: row.try_get("content")?,
        created: row.try_get("created")?,
        expires: row.try_get("expires")?,
    })
}

fn user_from_row(row: &SqliteRow) -> std::result::Result<User, sqlx::Error> {
    Ok(User {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        email: row.try_get("email")?,
        password_hash: row.try_get("hashed_password")?,
        created: row.try_get("created")?,
    })
}

#[async_trait]
impl SnippetRepo for SqliteRepo {
    async fn insert(&self, snippet: NewSnippet) -> Result<i64> {
        let result = sqlx::query(
            "INSERT INTO snippets (title, content, created, expires) VALUES (?, ?, ?, ?)",
        )
        .bind(snippet.title)
        .bind(snippet.content)
        .bind(snippet.created)
        .bind(snippet.expires)
        .execute(&self.pool)
        .await
        .map_err(storage_error)?;

        Ok(result.last_insert_rowid())
    }

    /// Expiry is compared through `julianday` so the stored RFC 3339 text
    /// orders correctly regardless of fractional-second width.
    async fn get(&self, id: i64, now: DateTime<Utc>) -> Result<Snippet> {
        let row = sqlx::query(
            "SELECT id, title, content, created, expires FROM snippets \
             WHERE id = ? AND julianday(expires) > julianday(?)",
        )
        .bind(id)
        .bind(now)
        .fetch_optional(&self.pool)
        .await
        .map_err(storage_error)?;

        match row {
            Some(row) => snippet_from_row(&row).map_err(storage_error),
            None => Err(AppError::NotFound),
        }
    }

    async fn latest(&self, now: DateTime<Utc>, limit: u32) -> Result<Vec<Snippet>> {
        let rows = sqlx::query(
            "SELECT id, title, content, created, expires FROM snippets \
             WHERE julianday(expires) > julianday(?) ORDER BY id DESC LIMIT ?",
        )
        .bind(now)
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(storage_error)?;

        rows.iter()
            .map(|row| snippet_from_row(row).map_err(storage_error))
            .collect()
    }
}

#[async_trait]
impl UserRepo for SqliteRepo {
    async fn insert(&self, user: NewUser) -> Result<i64> {
        let result = sqlx::query(
            "INSERT INTO users (name, email, hashed_password, created) VALUES (?, ?, ?, ?)",
        )
        .bind(user.name)
        .bind(user.email)
        .bind(user.password_hash)
        .bind(user.created)
        .execute(&self.pool)
        .await;

        match result {
            Ok(done) => Ok(done.last_insert_rowid()),
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                Err(AppError::DuplicateEmail)
            }
            Err(err) => Err(storage_error(err)),
        }
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let row = sqlx::query(
            "SELECT id, name, email, hashed_password, created FROM users WHERE email = ?",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(storage_error)?;

        row.as_ref()
            .map(user_from_row)
            .transpose()
            .map_err(storage_error)
    }

    async fn exists(&self, id: i64) -> Result<bool> {
        sqlx::query("SELECT EXISTS(SELECT 1 FROM users WHERE id = ?)")
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .and_then(|row| row.try_get::<bool, _>(0))
            .map_err(storage_error)
    }
}
