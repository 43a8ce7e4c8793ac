//! PostgreSQL-based tag store implementation.

use crate::error::StoreResult;
use crate::models::{TagRow, count_column, rows_to_records};
use crate::repos::{TagRepo, order_by_clause};
use crate::store::TagStore;
use async_trait::async_trait;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions, PgSslMode as SqlxPgSslMode};
use sqlx::{Pool, Postgres};
use std::str::FromStr;
use tagrank_core::config::PgSslMode;
use tagrank_core::{NewTag, PageRequest, TagRecord};

const POSTGRES_SCHEMA: &str = include_str!("postgres_schema.sql");

/// Split the schema into single statements, dropping chunks that hold only comments.
fn schema_statements(schema: &str) -> Vec<&str> {
    schema
        .split(';')
        .map(str::trim)
        .filter(|chunk| {
            chunk
                .lines()
                .map(str::trim)
                .any(|line| !line.is_empty() && !line.starts_with("--"))
        })
        .collect()
}

/// Pool sizing shared by both ways of connecting.
#[derive(Clone, Copy, Debug)]
pub struct PoolSettings {
    pub max_connections: u32,
    pub statement_timeout_ms: Option<u64>,
}

/// Connection fields used when no URL is configured.
pub struct ConnectParams<'a> {
    pub host: &'a str,
    pub port: u16,
    pub username: Option<&'a str>,
    pub password: Option<&'a str>,
    pub database: &'a str,
    pub ssl_mode: Option<PgSslMode>,
}

impl ConnectParams<'_> {
    fn to_options(&self) -> PgConnectOptions {
        let mut opts = PgConnectOptions::new()
            .host(self.host)
            .port(self.port)
            .database(self.database);
        if let Some(user) = self.username {
            opts = opts.username(user);
        }
        if let Some(pass) = self.password {
            opts = opts.password(pass);
        }
        if let Some(mode) = self.ssl_mode {
            opts = opts.ssl_mode(match mode {
                PgSslMode::Disable => SqlxPgSslMode::Disable,
                PgSslMode::Prefer => SqlxPgSslMode::Prefer,
                PgSslMode::Require => SqlxPgSslMode::Require,
            });
        }
        opts
    }
}

/// Tag store backed by a PostgreSQL `tags` table.
pub struct PostgresStore {
    pool: Pool<Postgres>,
}

impl PostgresStore {
    pub async fn from_url(url: &str, settings: PoolSettings) -> StoreResult<Self> {
        Self::open(PgConnectOptions::from_str(url)?, settings).await
    }

    pub async fn from_params(
        params: ConnectParams<'_>,
        settings: PoolSettings,
    ) -> StoreResult<Self> {
        // The password stays out of the log.
        tracing::info!(
            host = params.host,
            port = params.port,
            database = params.database,
            username = params.username.unwrap_or("<none>"),
            ssl_mode = ?params.ssl_mode,
            "Opening PostgreSQL tag store"
        );
        Self::open(params.to_options(), settings).await
    }

    async fn open(mut opts: PgConnectOptions, settings: PoolSettings) -> StoreResult<Self> {
        if let Some(ms) = settings.statement_timeout_ms {
            opts = opts.options([("statement_timeout", format!("{ms}ms"))]);
        }
        tracing::debug!(
            max_connections = settings.max_connections,
            statement_timeout_ms = ?settings.statement_timeout_ms,
            "PostgreSQL pool settings"
        );

        let pool = PgPoolOptions::new()
            .max_connections(settings.max_connections)
            .connect_with(opts)
            .await?;

        let store = Self { pool };
        store.migrate().await?;
        Ok(store)
    }

    pub fn pool(&self) -> &Pool<Postgres> {
        &self.pool
    }
}

#[async_trait]
impl TagStore for PostgresStore {
    async fn migrate(&self) -> StoreResult<()> {
        // One command per prepared statement.
        for statement in schema_statements(POSTGRES_SCHEMA) {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        Ok(())
    }

    async fn health_check(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl TagRepo for PostgresStore {
    async fn replace_all(&self, tags: &[NewTag]) -> StoreResult<()> {
        let mut tx = self.pool.begin().await?;

        // DELETE rather than TRUNCATE: TRUNCATE takes an ACCESS EXCLUSIVE lock
        // that would block concurrent readers until commit.
        let deleted = sqlx::query("DELETE FROM tags").execute(&mut *tx).await?;

        for tag in tags {
            sqlx::query("INSERT INTO tags (name, count, percentage) VALUES ($1, $2, $3)")
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
            "SELECT id, name, count, percentage FROM tags ORDER BY {} LIMIT $1 OFFSET $2",
            order_by_clause(request.sort_by(), "\"C\"")
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_statements_skip_comment_only_chunks() {
        let statements = schema_statements(
            "-- header\nCREATE TABLE a (id INT);\n-- trailing comment\n;\nCREATE INDEX i ON a(id);\n",
        );
        assert_eq!(statements.len(), 2);
        assert!(statements[0].ends_with("CREATE TABLE a (id INT)"));
        assert_eq!(statements[1], "CREATE INDEX i ON a(id)");
    }

    #[test]
    fn test_connect_params_build_options() {
        let params = ConnectParams {
            host: "db.internal",
            port: 6543,
            username: Some("tagrank"),
            password: Some("secret"),
            database: "tags",
            ssl_mode: Some(PgSslMode::Require),
        };
        let opts = params.to_options();
        assert_eq!(opts.get_host(), "db.internal");
        assert_eq!(opts.get_port(), 6543);
        assert_eq!(opts.get_database(), Some("tags"));
        assert_eq!(opts.get_username(), "tagrank");
    }

    #[test]
    fn test_embedded_schema_has_tags_table() {
        let statements = schema_statements(POSTGRES_SCHEMA);
        assert!(
            statements
                .iter()
                .any(|s| s.contains("CREATE TABLE IF NOT EXISTS tags"))
        );
    }
}
