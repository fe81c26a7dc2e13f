//! Rows of the `photo_orders` table.

use lodge_core::photo_order::{OrderSnapshot, PhotoOrderEntry};
use lodge_core::types::Timestamp;
use serde::Serialize;
use sqlx::types::Json;
use sqlx::FromRow;

/// A row from the `photo_orders` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PhotoOrderRow {
    pub property_slug: String,
    pub order_data: Json<Vec<PhotoOrderEntry>>,
    pub version: i32,
    pub updated_at: Timestamp,
}

impl From<PhotoOrderRow> for OrderSnapshot {
    fn from(row: PhotoOrderRow) -> Self {
        OrderSnapshot {
            entries: row.order_data.0,
            version: Some(row.version),
        }
    }
}
