//! Persistence contracts for photo orders and trash items.
//!
//! Two implementations exist for each trait: the primary relational store
//! (`lodge-db`) and the shared fallback document (`lodge-docstore`). The
//! services depend only on these traits and pick a backend per call via
//! [`crate::fallback::with_fallback`].

use std::collections::BTreeMap;

use async_trait::async_trait;

use crate::photo_order::{OrderSnapshot, PhotoOrderEntry};
use crate::trash::TrashItem;
use crate::types::{DbId, Timestamp};

/// Failure reported by a store backend.
///
/// The services never surface these directly: a primary failure triggers
/// the fallback, and a fallback failure becomes
/// [`CoreError::StorageUnavailable`](crate::error::CoreError::StorageUnavailable).
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The backend could not be reached or rejected the request.
    #[error("{backend} unavailable: {message}")]
    Unavailable {
        backend: &'static str,
        message: String,
    },

    /// The backend answered with data that could not be decoded.
    #[error("{backend} returned malformed data: {message}")]
    Malformed {
        backend: &'static str,
        message: String,
    },
}

impl StoreError {
    pub fn unavailable(backend: &'static str, err: impl std::fmt::Display) -> Self {
        Self::Unavailable {
            backend,
            message: err.to_string(),
        }
    }

    pub fn malformed(backend: &'static str, err: impl std::fmt::Display) -> Self {
        Self::Malformed {
            backend,
            message: err.to_string(),
        }
    }
}

/// Outcome of a version-checked write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConditionalWrite {
    /// The write went through. `version` is the new stored version, or
    /// `None` for backends that do not track versions.
    Applied { version: Option<i32> },
    /// No record matched the expected version; nothing was written.
    Stale,
}

/// Result of listing every stored order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderListing {
    pub orders: BTreeMap<String, Vec<PhotoOrderEntry>>,
    /// Keys present in the store whose entries could not be decoded.
    pub malformed: Vec<String>,
}

/// Storage for property photo orderings.
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Short backend name used in logs and errors.
    fn name(&self) -> &'static str;

    /// Load one property's order. `None` if no record exists.
    async fn get_order(&self, slug: &str) -> Result<Option<OrderSnapshot>, StoreError>;

    /// Load every property's entries, keyed by slug. A key whose entries
    /// cannot be decoded is reported in [`OrderListing::malformed`] and does
    /// not fail the listing.
    async fn list_orders(&self) -> Result<OrderListing, StoreError>;

    /// Create the record at version 1 or overwrite it and bump the version.
    /// Returns the new version when the backend tracks one.
    async fn upsert_order(
        &self,
        slug: &str,
        entries: &[PhotoOrderEntry],
    ) -> Result<Option<i32>, StoreError>;

    /// Replace the entries only if the stored version equals
    /// `expected_version`, as one atomic compare-and-swap.
    async fn update_order_if_version(
        &self,
        slug: &str,
        entries: &[PhotoOrderEntry],
        expected_version: i32,
    ) -> Result<ConditionalWrite, StoreError>;
}

/// Storage for soft-deleted photos.
#[async_trait]
pub trait TrashStore: Send + Sync {
    /// Short backend name used in logs and errors.
    fn name(&self) -> &'static str;

    /// Record a removed photo, returning the stored item with its id.
    async fn insert(
        &self,
        slug: &str,
        src: &str,
        deleted_at: Timestamp,
    ) -> Result<TrashItem, StoreError>;

    /// All items, most recently deleted first.
    async fn list_newest_first(&self) -> Result<Vec<TrashItem>, StoreError>;

    /// Delete one item. Returns `true` if it existed.
    async fn remove(&self, id: DbId) -> Result<bool, StoreError>;

    /// Delete every item with `deleted_at <= cutoff`, returning the count.
    async fn purge_deleted_until(&self, cutoff: Timestamp) -> Result<u64, StoreError>;
}
