//! Repository for the `trash_items` table.

use lodge_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::models::trash_item::TrashItemRow;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, property_slug, src, deleted_at";

/// Provides CRUD operations for trashed photos.
pub struct TrashItemRepo;

impl TrashItemRepo {
    /// Insert a trash item, returning the created row.
    pub async fn create(
        pool: &PgPool,
        slug: &str,
        src: &str,
        deleted_at: Timestamp,
    ) -> Result<TrashItemRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO trash_items (property_slug, src, deleted_at)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, TrashItemRow>(&query)
            .bind(slug)
            .bind(src)
            .bind(deleted_at)
            .fetch_one(pool)
            .await
    }

    /// List all trash items, most recently deleted first.
    pub async fn list(pool: &PgPool) -> Result<Vec<TrashItemRow>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM trash_items ORDER BY deleted_at DESC, id DESC");
        sqlx::query_as::<_, TrashItemRow>(&query)
            .fetch_all(pool)
            .await
    }

    /// Delete a single item. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM trash_items WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete every item deleted at or before `cutoff`. Returns the count
    /// of deleted rows.
    pub async fn delete_deleted_until(
        pool: &PgPool,
        cutoff: Timestamp,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM trash_items WHERE deleted_at <= $1")
            .bind(cutoff)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}
