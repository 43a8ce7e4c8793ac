//! In-memory tag store.

use crate::error::{StoreError, StoreResult};
use crate::repos::TagRepo;
use crate::store::TagStore;
use async_trait::async_trait;
use tagrank_core::{NewTag, PageRequest, TagRecord};
use tokio::sync::RwLock;

#[derive(Debug)]
struct Inner {
    /// Current batch in insertion order.
    records: Vec<TagRecord>,
    next_id: i64,
}

/// Process-local tag store. Contents do not survive a restart.
#[derive(Debug)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                records: Vec::new(),
                next_id: 1,
            }),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TagStore for MemoryStore {
    async fn migrate(&self) -> StoreResult<()> {
        Ok(())
    }

    async fn health_check(&self) -> StoreResult<()> {
        Ok(())
    }
}

#[async_trait]
impl TagRepo for MemoryStore {
    async fn replace_all(&self, tags: &[NewTag]) -> StoreResult<()> {
        // The swap happens under one write guard; readers see the old batch or the new one.
        let mut guard = self.inner.write().await;
        let first_id = guard.next_id;
        let records = tags
            .iter()
            .cloned()
            .enumerate()
            .map(|(offset, tag)| {
                let id = i64::try_from(offset)
                    .ok()
                    .and_then(|offset| first_id.checked_add(offset))
                    .ok_or_else(|| StoreError::Internal("tag id space exhausted".to_string()))?;
                Ok(TagRecord::from_new(id, tag))
            })
            .collect::<StoreResult<Vec<_>>>()?;

        let next_id = records.last().map_or(first_id, |record| record.id + 1);
        let deleted = std::mem::replace(&mut guard.records, records).len();
        guard.next_id = next_id;

        tracing::debug!(deleted, inserted = tags.len(), "Tag batch replaced");
        Ok(())
    }

    async fn query(&self, request: &PageRequest) -> StoreResult<Vec<TagRecord>> {
        let guard = self.inner.read().await;
        Ok(request.apply(&guard.records))
    }

    async fn count_tags(&self) -> StoreResult<u64> {
        let guard = self.inner.read().await;
        Ok(guard.records.len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tagrank_core::SortKey;

    fn request(page: i64, size: i64, sort_by: SortKey) -> PageRequest {
        PageRequest::new(page, size, sort_by, None).unwrap()
    }

    #[tokio::test]
    async fn test_ids_continue_across_batches() {
        let store = MemoryStore::new();
        store
            .replace_all(&[NewTag::new("a", 1, 50.0), NewTag::new("b", 1, 50.0)])
            .await
            .unwrap();
        store
            .replace_all(&[NewTag::new("c", 1, 100.0)])
            .await
            .unwrap();

        let records = store
            .query(&request(1, 10, SortKey::NameAscending))
            .await
            .unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, 3);
        assert_eq!(records[0].name, "c");
    }

    #[tokio::test]
    async fn test_empty_batch_clears_store() {
        let store = MemoryStore::new();
        store
            .replace_all(&[NewTag::new("a", 1, 100.0)])
            .await
            .unwrap();
        store.replace_all(&[]).await.unwrap();

        assert_eq!(store.count_tags().await.unwrap(), 0);
        assert!(
            store
                .query(&request(1, 10, SortKey::NameAscending))
                .await
                .unwrap()
                .is_empty()
        );
    }
}
