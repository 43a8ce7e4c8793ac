//! Test doubles for the tag source and tag store.

use async_trait::async_trait;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tagrank_core::{NewTag, PageRequest, RawTag, TagRecord, normalize};
use tagrank_source::{SourceError, SourceResult, TagSource};
use tagrank_store::{StoreError, StoreResult, TagRepo, TagStore};

/// Normalized batch built from `(name, count)` pairs.
#[allow(dead_code)]
pub fn batch(items: &[(&str, u64)]) -> Vec<NewTag> {
    normalize(
        items
            .iter()
            .map(|(name, count)| RawTag::new(*name, *count))
            .collect(),
    )
}

/// Source that returns queued batches in order, repeating the last one.
/// Note: #[allow(dead_code)] because each test file compiles common/ separately.
#[allow(dead_code)]
pub struct StubSource {
    batches: Mutex<Vec<Vec<NewTag>>>,
    delay: Option<Duration>,
    calls: AtomicUsize,
}

#[allow(dead_code)]
impl StubSource {
    pub fn new(batch: Vec<NewTag>) -> Self {
        Self::sequence(vec![batch])
    }

    pub fn sequence(batches: Vec<Vec<NewTag>>) -> Self {
        Self {
            batches: Mutex::new(batches),
            delay: None,
            calls: AtomicUsize::new(0),
        }
    }

    /// Sleep before answering, to widen race windows.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TagSource for StubSource {
    async fn fetch_tags(&self) -> SourceResult<Vec<NewTag>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        let mut batches = self.batches.lock().unwrap();
        let next = if batches.len() > 1 {
            batches.remove(0)
        } else {
            batches.first().cloned().unwrap_or_default()
        };
        Ok(next)
    }
}

/// Source whose every fetch fails with a remote 503.
#[allow(dead_code)]
pub struct FailingSource;

#[async_trait]
impl TagSource for FailingSource {
    async fn fetch_tags(&self) -> SourceResult<Vec<NewTag>> {
        Err(SourceError::remote(503, "upstream down"))
    }
}

/// Store whose every operation fails.
#[allow(dead_code)]
pub struct BrokenStore;

#[async_trait]
impl TagStore for BrokenStore {
    async fn migrate(&self) -> StoreResult<()> {
        Ok(())
    }

    async fn health_check(&self) -> StoreResult<()> {
        Err(StoreError::Internal("store offline".to_string()))
    }
}

#[async_trait]
impl TagRepo for BrokenStore {
    async fn replace_all(&self, _tags: &[NewTag]) -> StoreResult<()> {
        Err(StoreError::Internal("store offline".to_string()))
    }

    async fn query(&self, _request: &PageRequest) -> StoreResult<Vec<TagRecord>> {
        Err(StoreError::Internal("store offline".to_string()))
    }

    async fn count_tags(&self) -> StoreResult<u64> {
        Err(StoreError::Internal("store offline".to_string()))
    }
}
