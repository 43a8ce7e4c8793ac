//! Server test utilities.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::Value;
use std::sync::Arc;
use tagrank_core::config::{AppConfig, StoreConfig};
use tagrank_server::{AppState, create_router};
use tagrank_source::TagSource;
use tagrank_store::{MemoryStore, SqliteStore, TagStore};
use tempfile::TempDir;
use tower::ServiceExt;

/// A test server wrapper with all dependencies.
/// Note: #[allow(dead_code)] because each test file compiles common/ separately.
#[allow(dead_code)]
pub struct TestServer {
    pub router: axum::Router,
    pub state: AppState,
    _temp_dir: Option<TempDir>,
}

#[allow(dead_code)]
impl TestServer {
    /// Create a test server over an in-memory store.
    pub fn new(source: Arc<dyn TagSource>) -> Self {
        Self::with_config(source, |_| {})
    }

    /// Create an in-memory test server with custom config modifications.
    pub fn with_config<F>(source: Arc<dyn TagSource>, modifier: F) -> Self
    where
        F: FnOnce(&mut AppConfig),
    {
        let mut config = AppConfig::for_testing();
        modifier(&mut config);
        Self::with_store(config, Arc::new(MemoryStore::new()), source, None)
    }

    /// Create a test server over a SQLite store in a temporary directory.
    pub async fn sqlite(source: Arc<dyn TagSource>) -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");
        let db_path = temp_dir.path().join("tags.db");
        let store: Arc<dyn TagStore> = Arc::new(
            SqliteStore::new(&db_path)
                .await
                .expect("Failed to create tag store"),
        );

        let mut config = AppConfig::for_testing();
        config.store = StoreConfig::Sqlite { path: db_path };

        Self::with_store(config, store, source, Some(temp_dir))
    }

    /// Create a test server over an arbitrary store.
    pub fn with_store(
        config: AppConfig,
        store: Arc<dyn TagStore>,
        source: Arc<dyn TagSource>,
        temp_dir: Option<TempDir>,
    ) -> Self {
        tagrank_server::metrics::register_metrics();

        let state = AppState::new(config, store, source);
        let router = create_router(state.clone());

        Self {
            router,
            state,
            _temp_dir: temp_dir,
        }
    }

    /// Get access to the underlying store.
    pub fn store(&self) -> Arc<dyn TagStore> {
        self.state.store.clone()
    }

    /// Send a request with an empty body and return status and body text.
    pub async fn send(&self, method: &str, uri: &str) -> (StatusCode, String) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        let response = self.router.clone().oneshot(request).await.unwrap();

        let status = response.status();
        let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, String::from_utf8(body_bytes.to_vec()).unwrap())
    }

    /// GET `uri` and parse the body as JSON (`Null` when empty or not JSON).
    pub async fn get_json(&self, uri: &str) -> (StatusCode, Value) {
        let (status, body) = self.send("GET", uri).await;
        let json = if body.is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&body).unwrap_or(Value::Null)
        };
        (status, json)
    }

    /// GET `uri` and return the tag names in response order.
    pub async fn tag_names(&self, uri: &str) -> Vec<String> {
        let (status, json) = self.get_json(uri).await;
        assert_eq!(status, StatusCode::OK, "GET {uri} failed: {json}");
        json.as_array()
            .expect("tag listing should be a JSON array")
            .iter()
            .map(|tag| tag["name"].as_str().unwrap().to_string())
            .collect()
    }
}
