//! `lodge-core` store traits backed by PostgreSQL.
//!
//! Every sqlx error is reported as [`StoreError::Unavailable`]; the
//! services treat any primary failure the same way and move on to the
//! fallback document.

use async_trait::async_trait;
use lodge_core::photo_order::{OrderSnapshot, PhotoOrderEntry};
use lodge_core::store::{ConditionalWrite, OrderListing, OrderStore, StoreError, TrashStore};
use lodge_core::trash::TrashItem;
use lodge_core::types::{DbId, Timestamp};

use crate::repositories::{PhotoOrderRepo, TrashItemRepo};
use crate::DbPool;

const BACKEND: &str = "postgres";

fn unavailable(err: sqlx::Error) -> StoreError {
    StoreError::unavailable(BACKEND, err)
}

/// Photo orders in the `photo_orders` table.
#[derive(Clone)]
pub struct PgOrderStore {
    pool: DbPool,
}

impl PgOrderStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OrderStore for PgOrderStore {
    fn name(&self) -> &'static str {
        BACKEND
    }

    async fn get_order(&self, slug: &str) -> Result<Option<OrderSnapshot>, StoreError> {
        let row = PhotoOrderRepo::find_by_slug(&self.pool, slug)
            .await
            .map_err(unavailable)?;
        Ok(row.map(OrderSnapshot::from))
    }

    async fn list_orders(&self) -> Result<OrderListing, StoreError> {
        let rows = PhotoOrderRepo::list(&self.pool)
            .await
            .map_err(unavailable)?;
        Ok(OrderListing {
            orders: rows
                .into_iter()
                .map(|row| (row.property_slug, row.order_data.0))
                .collect(),
            malformed: Vec::new(),
        })
    }

    async fn upsert_order(
        &self,
        slug: &str,
        entries: &[PhotoOrderEntry],
    ) -> Result<Option<i32>, StoreError> {
        let version = PhotoOrderRepo::upsert(&self.pool, slug, entries)
            .await
            .map_err(unavailable)?;
        Ok(Some(version))
    }

    async fn update_order_if_version(
        &self,
        slug: &str,
        entries: &[PhotoOrderEntry],
        expected_version: i32,
    ) -> Result<ConditionalWrite, StoreError> {
        let version = PhotoOrderRepo::update_if_version(&self.pool, slug, entries, expected_version)
            .await
            .map_err(unavailable)?;
        Ok(match version {
            Some(version) => ConditionalWrite::Applied {
                version: Some(version),
            },
            None => {
                tracing::debug!(slug, expected_version, "Conditional update matched no row");
                ConditionalWrite::Stale
            }
        })
    }
}

/// Trash items in the `trash_items` table.
#[derive(Clone)]
pub struct PgTrashStore {
    pool: DbPool,
}

impl PgTrashStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TrashStore for PgTrashStore {
    fn name(&self) -> &'static str {
        BACKEND
    }

    async fn insert(
        &self,
        slug: &str,
        src: &str,
        deleted_at: Timestamp,
    ) -> Result<TrashItem, StoreError> {
        let row = TrashItemRepo::create(&self.pool, slug, src, deleted_at)
            .await
            .map_err(unavailable)?;
        Ok(row.into())
    }

    async fn list_newest_first(&self) -> Result<Vec<TrashItem>, StoreError> {
        let rows = TrashItemRepo::list(&self.pool).await.map_err(unavailable)?;
        Ok(rows.into_iter().map(TrashItem::from).collect())
    }

    async fn remove(&self, id: DbId) -> Result<bool, StoreError> {
        TrashItemRepo::delete(&self.pool, id)
            .await
            .map_err(unavailable)
    }

    async fn purge_deleted_until(&self, cutoff: Timestamp) -> Result<u64, StoreError> {
        TrashItemRepo::delete_deleted_until(&self.pool, cutoff)
            .await
            .map_err(unavailable)
    }
}
