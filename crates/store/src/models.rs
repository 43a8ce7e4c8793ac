//! Database models mapping to the tag schema.

use crate::error::{StoreError, StoreResult};
use sqlx::FromRow;
use tagrank_core::{NewTag, TagRecord};

/// Row of the `tags` table.
#[derive(Debug, Clone, FromRow)]
pub struct TagRow {
    pub id: i64,
    pub name: String,
    pub count: i64,
    pub percentage: f64,
}

impl TryFrom<TagRow> for TagRecord {
    type Error = StoreError;

    fn try_from(row: TagRow) -> StoreResult<Self> {
        let count = u64::try_from(row.count).map_err(|_| {
            StoreError::Constraint(format!(
                "tag {} has negative count {}",
                row.id, row.count
            ))
        })?;
        Ok(TagRecord {
            id: row.id,
            name: row.name,
            count,
            percentage: row.percentage,
        })
    }
}

/// Convert a tag count to the signed integer column type.
pub(crate) fn count_column(tag: &NewTag) -> StoreResult<i64> {
    i64::try_from(tag.count).map_err(|_| {
        StoreError::Constraint(format!(
            "count {} for tag '{}' exceeds the storable range",
            tag.count, tag.name
        ))
    })
}

/// Convert fetched rows into records, failing on the first invalid row.
pub(crate) fn rows_to_records(rows: Vec<TagRow>) -> StoreResult<Vec<TagRecord>> {
    rows.into_iter().map(TagRecord::try_from).collect()
}
