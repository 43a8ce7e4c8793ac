//! Tag store trait and SQLite implementation.

use crate::error::StoreResult;
use crate::models::{TagRow, count_column, rows_to_records};
use crate::repos::{TagRepo, order_by_clause};
use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use tagrank_core::{NewTag, PageRequest, TagRecord};

/// Combined tag store trait.
#[async_trait]
pub trait TagStore: TagRepo + Send + Sync {
    /// Create the schema if it does not exist yet.
    async fn migrate(&self) -> StoreResult<()>;

    /// Check backend connectivity and health.
    async fn health_check(&self) -> StoreResult<()>;
}

/// SQLite-based tag store.
pub struct SqliteStore {
    pool: Pool<Sqlite>,
}

impl SqliteStore {
    /// Open (creating if needed) a SQLite database and run migrations.
    pub async fn new(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let opts = SqliteConnectOptions::from_str(&format!("sqlite:{}?mode=rwc", path.display()))?
            .create_if_missing(true)
            .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
            .synchronous(sqlx::sqlite::SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(5));

        let pool = SqlitePoolOptions::new()
            // One connection serializes writers and avoids "database is locked".
            .max_connections(1)
            .connect_with(opts)
            .await?;

        let store = Self { pool };
        store.migrate().await?;

        tracing::debug!(path = %path.display(), "SQLite tag store opened");
        Ok(store)
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }
}

#[async_trait]
impl TagStore for SqliteStore {
    async fn migrate(&self) -> StoreResult<()> {
        sqlx::query(SCHEMA_SQL).execute(&self.pool).await?;
        Ok(())
    }

    async fn health_check(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl TagRepo for SqliteStore {
    async fn replace_all(&self, tags: &[NewTag]) -> StoreResult<()> {
        let mut tx = self.pool.begin().await?;

        let deleted = sqlx::query("DELETE FROM tags").execute(&mut *tx).await?;

        for tag in tags {
            sqlx::query("INSERT INTO tags (name, count, percentage) VALUES (?, ?, ?)")
                .bind(&tag.name)
                .bind(count_column(tag)?)
                .bind(tag.percentage)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        tracing::debug!(
            deleted = deleted.rows_affected(),
            inserted = tags.len(),
            "Tag batch replaced"
        );
        Ok(())
    }

    async fn query(&self, request: &PageRequest) -> StoreResult<Vec<TagRecord>> {
        let sql = format!(
            "SELECT id, name, count, percentage FROM tags ORDER BY {} LIMIT ? OFFSET ?",
            order_by_clause(request.sort_by(), "BINARY")
        );
        let rows = sqlx::query_as::<_, TagRow>(&sql)
            .bind(request.limit())
            .bind(request.offset())
            .fetch_all(&self.pool)
            .await?;
        rows_to_records(rows)
    }

    async fn count_tags(&self) -> StoreResult<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM tags")
            .fetch_one(&self.pool)
            .await?;
        Ok(count as u64)
    }
}

/// SQL schema for SQLite.
const SCHEMA_SQL: &str = r#"
-- AUTOINCREMENT keeps ids from ever being reused after a batch is deleted.
CREATE TABLE IF NOT EXISTS tags (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    count INTEGER NOT NULL CHECK (count >= 0),
    percentage REAL NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_tags_name ON tags(name COLLATE BINARY);
CREATE INDEX IF NOT EXISTS idx_tags_percentage ON tags(percentage);
"#;
