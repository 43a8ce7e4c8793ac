//! Remote tag source for tagrank.
//!
//! A [`TagSource`] fetches one batch of popular tags and hands it back
//! normalized: each tag carries its share of the batch total as a percentage.

pub mod error;
pub mod stack_exchange;

pub use error::{SourceError, SourceResult};
pub use stack_exchange::StackExchangeSource;

use async_trait::async_trait;
use tagrank_core::NewTag;

/// Provider of tag-popularity batches.
#[async_trait]
pub trait TagSource: Send + Sync {
    /// Fetch one batch and normalize it, preserving source order.
    ///
    /// Exactly one outbound request per call. An empty listing is an empty
    /// batch, not an error.
    async fn fetch_tags(&self) -> SourceResult<Vec<NewTag>>;
}
