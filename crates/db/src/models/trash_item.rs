//! Rows of the `trash_items` table.

use lodge_core::trash::TrashItem;
use lodge_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `trash_items` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TrashItemRow {
    pub id: DbId,
    pub property_slug: String,
    pub src: String,
    pub deleted_at: Timestamp,
}

impl From<TrashItemRow> for TrashItem {
    fn from(row: TrashItemRow) -> Self {
        TrashItem {
            id: row.id,
            property_slug: row.property_slug,
            src: row.src,
            deleted_at: row.deleted_at,
        }
    }
}
