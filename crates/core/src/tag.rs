//! Tag records and batch normalization.
//!
//! A batch starts life as a list of [`RawTag`]s (name plus absolute count, as
//! reported by the remote source), is normalized into [`NewTag`]s carrying a
//! relative-frequency percentage, and becomes [`TagRecord`]s once the store
//! has assigned identities.

use serde::{Deserialize, Serialize};

/// Absolute popularity count for one tag, as received from the source.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawTag {
    pub name: String,
    pub count: u64,
}

impl RawTag {
    pub fn new(name: impl Into<String>, count: u64) -> Self {
        Self {
            name: name.into(),
            count,
        }
    }
}

/// A normalized tag that has not been persisted yet.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NewTag {
    pub name: String,
    pub count: u64,
    /// Share of the batch total, in `[0, 100]`.
    pub percentage: f64,
}

impl NewTag {
    pub fn new(name: impl Into<String>, count: u64, percentage: f64) -> Self {
        Self {
            name: name.into(),
            count,
            percentage,
        }
    }
}

/// A persisted tag record.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TagRecord {
    /// Store-assigned identity, increasing in insertion order.
    pub id: i64,
    pub name: String,
    pub count: u64,
    pub percentage: f64,
}

impl TagRecord {
    /// Attach a store-assigned identity to a normalized tag.
    pub fn from_new(id: i64, tag: NewTag) -> Self {
        Self {
            id,
            name: tag.name,
            count: tag.count,
            percentage: tag.percentage,
        }
    }
}

/// Compute relative-frequency percentages for one fetched batch.
///
/// Source order is preserved. When the batch total is zero every tag gets a
/// percentage of `0.0` instead of dividing by zero.
pub fn normalize(items: Vec<RawTag>) -> Vec<NewTag> {
    let total: u128 = items.iter().map(|item| u128::from(item.count)).sum();

    items
        .into_iter()
        .map(|item| {
            let percentage = if total == 0 {
                0.0
            } else {
                item.count as f64 / total as f64 * 100.0
            };
            NewTag {
                name: item.name,
                count: item.count,
                percentage,
            }
        })
        .collect()
}
