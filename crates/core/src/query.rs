//! Sort keys and page windows for ranked tag reads.

use crate::error::{Error, Result};
use crate::tag::TagRecord;
use serde::{Deserialize, Deserializer, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Ordering selector for paged reads.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
pub enum SortKey {
    #[default]
    NameAscending,
    NameDescending,
    PercentageAscending,
    PercentageDescending,
}

impl SortKey {
    /// All sort keys in wire ordinal order.
    pub const ALL: [SortKey; 4] = [
        SortKey::NameAscending,
        SortKey::NameDescending,
        SortKey::PercentageAscending,
        SortKey::PercentageDescending,
    ];

    /// Wire name of this sort key.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NameAscending => "NameAscending",
            Self::NameDescending => "NameDescending",
            Self::PercentageAscending => "PercentageAscending",
            Self::PercentageDescending => "PercentageDescending",
        }
    }

    /// Parse a wire value, accepting enumerator names (any case) or ordinals.
    ///
    /// Unrecognized values fall back to [`SortKey::NameAscending`].
    pub fn from_wire(value: &str) -> Self {
        let value = value.trim();
        if let Ok(ordinal) = value.parse::<usize>() {
            return Self::ALL.get(ordinal).copied().unwrap_or_default();
        }
        Self::ALL
            .into_iter()
            .find(|key| key.as_str().eq_ignore_ascii_case(value))
            .unwrap_or_default()
    }

    /// Compare two records under this key.
    ///
    /// Names compare byte-wise. Equal keys compare as `Equal` so a stable sort
    /// keeps insertion order for ties, in both directions.
    pub fn compare(self, a: &TagRecord, b: &TagRecord) -> Ordering {
        match self {
            Self::NameAscending => a.name.as_bytes().cmp(b.name.as_bytes()),
            Self::NameDescending => b.name.as_bytes().cmp(a.name.as_bytes()),
            Self::PercentageAscending => a.percentage.total_cmp(&b.percentage),
            Self::PercentageDescending => b.percentage.total_cmp(&a.percentage),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for SortKey {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Ok(Self::from_wire(&value))
    }
}

/// A validated page window over the ranked tag set.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageRequest {
    page: i64,
    page_size: i64,
    sort_by: SortKey,
}

impl PageRequest {
    /// Validate a page window.
    ///
    /// `page` and `page_size` are 1-based and must be positive. When
    /// `max_page_size` is set, `page_size` may not exceed it.
    pub fn new(
        page: i64,
        page_size: i64,
        sort_by: SortKey,
        max_page_size: Option<i64>,
    ) -> Result<Self> {
        if page < 1 {
            return Err(Error::InvalidQuery(format!(
                "page must be at least 1, got {page}"
            )));
        }
        if page_size < 1 {
            return Err(Error::InvalidQuery(format!(
                "pageSize must be at least 1, got {page_size}"
            )));
        }
        if let Some(max_page_size) = max_page_size
            && page_size > max_page_size
        {
            return Err(Error::InvalidQuery(format!(
                "pageSize must be at most {max_page_size}, got {page_size}"
            )));
        }
        if (page - 1).checked_mul(page_size).is_none() {
            return Err(Error::InvalidQuery(format!("page {page} is out of range")));
        }

        Ok(Self {
            page,
            page_size,
            sort_by,
        })
    }

    pub fn page(&self) -> i64 {
        self.page
    }

    pub fn page_size(&self) -> i64 {
        self.page_size
    }

    pub fn sort_by(&self) -> SortKey {
        self.sort_by
    }

    /// Number of ranked records skipped before this page.
    pub fn offset(&self) -> i64 {
        // Overflow is rejected in `new`.
        (self.page - 1) * self.page_size
    }

    /// Maximum number of records on this page.
    pub fn limit(&self) -> i64 {
        self.page_size
    }

    /// Sort the full set and cut this page out of it.
    ///
    /// `records` must be in insertion order; ties keep that order.
    pub fn apply(&self, records: &[TagRecord]) -> Vec<TagRecord> {
        let mut ranked: Vec<&TagRecord> = records.iter().collect();
        ranked.sort_by(|a, b| self.sort_by.compare(a, b));

        let skip = usize::try_from(self.offset()).unwrap_or(usize::MAX);
        let take = usize::try_from(self.limit()).unwrap_or(usize::MAX);
        ranked.into_iter().skip(skip).take(take).cloned().collect()
    }
}
