//! Tag repository: whole-batch replace and ranked reads.

use crate::error::StoreResult;
use async_trait::async_trait;
use tagrank_core::{NewTag, PageRequest, SortKey, TagRecord};

/// Repository for the tag batch.
#[async_trait]
pub trait TagRepo: Send + Sync {
    /// Replace every stored tag with `tags`, in order.
    ///
    /// Readers observe either the previous batch or the new one, never a mix.
    /// An empty slice leaves the store empty. Identities are freshly assigned
    /// and never reused from a previous batch.
    async fn replace_all(&self, tags: &[NewTag]) -> StoreResult<()>;

    /// Sort the whole stored set by `request.sort_by()` and return one page.
    ///
    /// Ties keep insertion order. A window past the end returns fewer
    /// records, possibly none.
    async fn query(&self, request: &PageRequest) -> StoreResult<Vec<TagRecord>>;

    /// Number of stored tags.
    async fn count_tags(&self) -> StoreResult<u64>;
}

/// SQL `ORDER BY` body for a sort key.
///
/// `name_collation` must make name comparison byte-wise on the target engine
/// (`BINARY` on SQLite, `"C"` on PostgreSQL). The trailing `id ASC` keeps
/// insertion order for ties in both directions.
pub fn order_by_clause(sort_by: SortKey, name_collation: &str) -> String {
    match sort_by {
        SortKey::NameAscending => format!("name COLLATE {name_collation} ASC, id ASC"),
        SortKey::NameDescending => format!("name COLLATE {name_collation} DESC, id ASC"),
        SortKey::PercentageAscending => "percentage ASC, id ASC".to_string(),
        SortKey::PercentageDescending => "percentage DESC, id ASC".to_string(),
    }
}
