//! Application state shared across handlers.

use std::sync::Arc;
use tagrank_core::config::AppConfig;
use tagrank_source::TagSource;
use tagrank_store::TagStore;
use tokio::sync::Mutex;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// Tag store.
    pub store: Arc<dyn TagStore>,
    /// Remote tag source.
    pub source: Arc<dyn TagSource>,
    /// Held across fetch + replace so refreshes in this process never interleave.
    pub refresh_lock: Arc<Mutex<()>>,
}

impl AppState {
    pub fn new(config: AppConfig, store: Arc<dyn TagStore>, source: Arc<dyn TagSource>) -> Self {
        Self {
            config: Arc::new(config),
            store,
            source,
            refresh_lock: Arc::new(Mutex::new(())),
        }
    }
}
