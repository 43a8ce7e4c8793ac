//! Tag store test utilities.

use sqlx::{Pool, Postgres as SqlxPostgres, Sqlite};
use std::sync::Arc;
use tagrank_core::{NewTag, PageRequest, SortKey, TagRecord};
use tagrank_store::{
    MemoryStore, PoolSettings, PostgresStore, SqliteStore, StoreError, StoreResult, TagStore,
};
use tempfile::TempDir;
use testcontainers::{ContainerAsync, ImageExt, runners::AsyncRunner};
use testcontainers_modules::postgres::Postgres;

/// Stable prefix for Docker/container startup failures in Postgres test setup.
/// Tests use this marker to decide whether to skip due to unavailable Docker.
pub const POSTGRES_CONTAINER_START_ERR_PREFIX: &str = "postgres-container-start:";

/// A SQLite test store that removes its database on drop.
#[allow(dead_code)]
pub struct TestStore {
    pub store: Arc<dyn TagStore>,
    sqlite_store: Arc<SqliteStore>,
    _temp_dir: TempDir,
}

impl TestStore {
    pub async fn new() -> StoreResult<Self> {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");
        let store = SqliteStore::new(temp_dir.path().join("test.db")).await?;
        let arc_store = Arc::new(store);

        Ok(Self {
            store: arc_store.clone(),
            sqlite_store: arc_store,
            _temp_dir: temp_dir,
        })
    }

    pub fn store(&self) -> Arc<dyn TagStore> {
        self.store.clone()
    }

    /// SQLite pool for raw queries.
    #[allow(dead_code)]
    pub fn pool(&self) -> &Pool<Sqlite> {
        self.sqlite_store.pool()
    }
}

/// PostgreSQL test store backed by a testcontainer.
#[allow(dead_code)]
pub struct PostgresTestStore {
    pub store: Arc<dyn TagStore>,
    postgres_store: Arc<PostgresStore>,
    _container: ContainerAsync<Postgres>,
}

impl PostgresTestStore {
    pub async fn new() -> StoreResult<Self> {
        let container = Postgres::default()
            .with_tag("15-alpine")
            .start()
            .await
            .map_err(|e| {
                StoreError::Internal(format!(
                    "{} Failed to start PostgreSQL container: {e}",
                    POSTGRES_CONTAINER_START_ERR_PREFIX
                ))
            })?;

        let host = container.get_host().await.expect("Failed to get host");
        let port = container
            .get_host_port_ipv4(5432)
            .await
            .expect("Failed to get port");

        // Default credentials from testcontainers-modules postgres
        let url = format!("postgres://postgres:postgres@{}:{}/postgres", host, port);

        let settings = PoolSettings {
            max_connections: 5,
            statement_timeout_ms: None,
        };
        let store = PostgresStore::from_url(&url, settings).await?;
        let arc_store = Arc::new(store);

        Ok(Self {
            store: arc_store.clone(),
            postgres_store: arc_store,
            _container: container,
        })
    }

    pub fn store(&self) -> Arc<dyn TagStore> {
        self.store.clone()
    }

    #[allow(dead_code)]
    pub fn pool(&self) -> &Pool<SqlxPostgres> {
        self.postgres_store.pool()
    }
}

/// Run a test against the SQLite, memory and (when Docker is available)
/// PostgreSQL backends.
#[allow(dead_code)]
pub async fn run_store_test_all<F, Fut>(test_fn: F)
where
    F: Fn(Arc<dyn TagStore>) -> Fut + Clone,
    Fut: std::future::Future<Output = ()>,
{
    let sqlite = TestStore::new()
        .await
        .expect("Failed to create SQLite test store");
    test_fn.clone()(sqlite.store()).await;

    test_fn.clone()(Arc::new(MemoryStore::new())).await;

    if std::env::var("SKIP_POSTGRES_TESTS").is_err() {
        match PostgresTestStore::new().await {
            Ok(postgres) => {
                test_fn(postgres.store()).await;
            }
            Err(err) => {
                let msg = err.to_string();
                if msg.contains(POSTGRES_CONTAINER_START_ERR_PREFIX) {
                    eprintln!("Skipping PostgreSQL tag store tests: {msg}");
                } else {
                    panic!("PostgreSQL test setup failed: {msg}");
                }
            }
        }
    }
}

/// The two-tag batch used throughout the store tests.
#[allow(dead_code)]
pub fn sample_batch() -> Vec<NewTag> {
    vec![
        NewTag::new("C#", 200, 200.0 / 3.0),
        NewTag::new("ASP.NET", 100, 100.0 / 3.0),
    ]
}

#[allow(dead_code)]
pub fn page(page: i64, page_size: i64, sort_by: SortKey) -> PageRequest {
    PageRequest::new(page, page_size, sort_by, None).expect("valid page request")
}

#[allow(dead_code)]
pub fn names(records: &[TagRecord]) -> Vec<&str> {
    records.iter().map(|r| r.name.as_str()).collect()
}
