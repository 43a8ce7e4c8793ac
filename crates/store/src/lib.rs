//! Tag store abstraction and implementations for tagrank.
//!
//! The store holds exactly one batch of normalized tags at a time:
//! - `replace_all` swaps the whole batch atomically
//! - `query` ranks the batch and returns one page of it
//!
//! Backends: SQLite (default), PostgreSQL, and a process-local memory store.

pub mod error;
pub mod memory;
pub mod models;
pub mod postgres;
pub mod repos;
pub mod store;

pub use error::{StoreError, StoreResult};
pub use memory::MemoryStore;
pub use postgres::{ConnectParams, PoolSettings, PostgresStore};
pub use repos::TagRepo;
pub use store::{SqliteStore, TagStore};

use std::sync::Arc;
use tagrank_core::config::StoreConfig;

/// Create a tag store from configuration.
pub async fn from_config(config: &StoreConfig) -> StoreResult<Arc<dyn TagStore>> {
    config.validate().map_err(StoreError::Config)?;

    match config {
        StoreConfig::Sqlite { path } => {
            tracing::info!(path = %path.display(), "Opening SQLite tag store");
            let store = SqliteStore::new(path).await?;
            Ok(Arc::new(store) as Arc<dyn TagStore>)
        }
        StoreConfig::Postgres {
            url,
            host,
            port,
            username,
            password,
            database,
            ssl_mode,
            max_connections,
            statement_timeout_ms,
        } => {
            let settings = PoolSettings {
                max_connections: *max_connections,
                statement_timeout_ms: *statement_timeout_ms,
            };
            let store = if let Some(url) = url {
                // A URL wins over the individual fields.
                tracing::info!("Opening PostgreSQL tag store from connection URL");
                PostgresStore::from_url(url, settings).await?
            } else if let (Some(host), Some(database)) = (host.as_deref(), database.as_deref()) {
                let params = ConnectParams {
                    host,
                    port: port.unwrap_or(5432),
                    username: username.as_deref(),
                    password: password.as_deref(),
                    database,
                    ssl_mode: *ssl_mode,
                };
                PostgresStore::from_params(params, settings).await?
            } else {
                return Err(StoreError::Config(
                    "postgres config requires either 'url' or 'host' + 'database'".to_string(),
                ));
            };
            Ok(Arc::new(store) as Arc<dyn TagStore>)
        }
        StoreConfig::Memory => {
            tracing::warn!("Using in-memory tag store; tags are lost on restart");
            Ok(Arc::new(MemoryStore::new()) as Arc<dyn TagStore>)
        }
    }
}
