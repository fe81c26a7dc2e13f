//! Repository for the `photo_orders` table.
//!
//! Writes are single statements so the version check and the update happen
//! atomically in the database; there is no read-then-write here.

use lodge_core::photo_order::PhotoOrderEntry;
use sqlx::types::Json;
use sqlx::PgPool;

use crate::models::photo_order::PhotoOrderRow;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "property_slug, order_data, version, updated_at";

/// Provides data access for property photo orders.
pub struct PhotoOrderRepo;

impl PhotoOrderRepo {
    /// Find the order for a property. Returns `None` if never written.
    pub async fn find_by_slug(
        pool: &PgPool,
        slug: &str,
    ) -> Result<Option<PhotoOrderRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM photo_orders WHERE property_slug = $1");
        sqlx::query_as::<_, PhotoOrderRow>(&query)
            .bind(slug)
            .fetch_optional(pool)
            .await
    }

    /// List every stored order, ordered by slug.
    pub async fn list(pool: &PgPool) -> Result<Vec<PhotoOrderRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM photo_orders ORDER BY property_slug");
        sqlx::query_as::<_, PhotoOrderRow>(&query)
            .fetch_all(pool)
            .await
    }

    /// Insert at version 1, or overwrite the entries and bump the version.
    ///
    /// Returns the stored version after the write.
    pub async fn upsert(
        pool: &PgPool,
        slug: &str,
        entries: &[PhotoOrderEntry],
    ) -> Result<i32, sqlx::Error> {
        let (version,): (i32,) = sqlx::query_as(
            "INSERT INTO photo_orders (property_slug, order_data, version) \
             VALUES ($1, $2, 1) \
             ON CONFLICT (property_slug) DO UPDATE SET \
                 order_data = EXCLUDED.order_data, \
                 version = photo_orders.version + 1 \
             RETURNING version",
        )
        .bind(slug)
        .bind(Json(entries))
        .fetch_one(pool)
        .await?;
        Ok(version)
    }

    /// Overwrite the entries only if the stored version equals
    /// `expected_version`.
    ///
    /// Returns the new version, or `None` when no row matched (the version
    /// moved or the property has no order yet).
    pub async fn update_if_version(
        pool: &PgPool,
        slug: &str,
        entries: &[PhotoOrderEntry],
        expected_version: i32,
    ) -> Result<Option<i32>, sqlx::Error> {
        let row: Option<(i32,)> = sqlx::query_as(
            "UPDATE photo_orders SET order_data = $2, version = version + 1 \
             WHERE property_slug = $1 AND version = $3 \
             RETURNING version",
        )
        .bind(slug)
        .bind(Json(entries))
        .bind(expected_version)
        .fetch_optional(pool)
        .await?;
        Ok(row.map(|(version,)| version))
    }
}
