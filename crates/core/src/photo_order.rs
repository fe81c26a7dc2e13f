//! Property photo ordering: entry types, validation, and the service that
//! reads and writes orders with optimistic concurrency.
//!
//! Each property (keyed by slug) has one ordered list of photos and a
//! version counter. Writers that pass the version they loaded get a
//! compare-and-swap on the primary store; a moved version is a
//! [`CoreError::Conflict`] and the caller must reload and retry.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::CoreError;
use crate::fallback::{with_fallback, Backend};
use crate::store::{ConditionalWrite, OrderStore};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Query value that requests every property's order at once.
pub const ALL_PROPERTIES: &str = "_all";

/// Keys starting with this prefix are reserved in the fallback document
/// (e.g. the trash list) and can never be property slugs.
pub const RESERVED_KEY_PREFIX: char = '_';

/// Maximum slug length (matches `photo_orders.property_slug`).
pub const MAX_SLUG_LEN: usize = 100;

/// Maximum image reference length (matches `trash_items.src`).
pub const MAX_SRC_LEN: usize = 500;

/// User-facing text for a version conflict.
pub const CONFLICT_MESSAGE: &str =
    "Someone else updated this order. Please reload and retry.";

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// One photo in a property's ordering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct PhotoOrderEntry {
    /// Image reference (URL or path).
    #[validate(length(min = 1, max = 500))]
    pub src: String,
    /// 1-based rank. Need not be contiguous.
    #[validate(range(min = 1))]
    pub pos: i32,
    /// Pinned by an editor.
    #[serde(default)]
    pub locked: bool,
}

/// A property's stored order as read back from a store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderSnapshot {
    pub entries: Vec<PhotoOrderEntry>,
    /// `None` when served by a backend without version tracking.
    pub version: Option<i32>,
}

/// Result of a successful [`PhotoOrderService::set_order`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderWrite {
    /// New stored version; `None` when the fallback document took the write.
    pub version: Option<i32>,
    pub backend: Backend,
}

/// Slugs copied by [`PhotoOrderService::import_from_fallback`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    pub imported: Vec<String>,
    pub skipped: Vec<String>,
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate a property slug: non-empty, bounded, not reserved.
pub fn validate_property_slug(slug: &str) -> Result<(), CoreError> {
    if slug.trim().is_empty() {
        return Err(CoreError::Validation("property must not be empty".into()));
    }
    if slug.chars().count() > MAX_SLUG_LEN {
        return Err(CoreError::Validation(format!(
            "property must be at most {MAX_SLUG_LEN} characters"
        )));
    }
    if slug.starts_with(RESERVED_KEY_PREFIX) {
        return Err(CoreError::Validation(format!(
            "property '{slug}' uses the reserved '{RESERVED_KEY_PREFIX}' prefix"
        )));
    }
    Ok(())
}

/// Validate an image reference.
pub fn validate_image_src(src: &str) -> Result<(), CoreError> {
    if src.trim().is_empty() {
        return Err(CoreError::Validation("src must not be empty".into()));
    }
    if src.chars().count() > MAX_SRC_LEN {
        return Err(CoreError::Validation(format!(
            "src must be at most {MAX_SRC_LEN} characters"
        )));
    }
    Ok(())
}

/// Validate every entry of an order.
pub fn validate_entries(entries: &[PhotoOrderEntry]) -> Result<(), CoreError> {
    for (i, entry) in entries.iter().enumerate() {
        entry
            .validate()
            .map_err(|e| CoreError::Validation(format!("images[{i}]: {e}")))?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Service
// ---------------------------------------------------------------------------

/// Reads and writes property photo orders across the primary store and the
/// fallback document.
///
/// The fallback document keeps no versions, so a conditional write that
/// lands there is applied as a plain overwrite. Concurrent editors on the
/// fallback path can silently lose each other's changes; callers learn
/// which path was taken from [`OrderWrite::backend`].
pub struct PhotoOrderService {
    primary: Option<Arc<dyn OrderStore>>,
    fallback: Arc<dyn OrderStore>,
}

impl PhotoOrderService {
    pub fn new(primary: Option<Arc<dyn OrderStore>>, fallback: Arc<dyn OrderStore>) -> Self {
        Self { primary, fallback }
    }

    /// Current entries and version for `slug`, or `None` if never written.
    pub async fn get_order(&self, slug: &str) -> Result<Option<OrderSnapshot>, CoreError> {
        validate_property_slug(slug)?;

        let served = with_fallback(
            "get_order",
            self.primary.as_ref().map(|store| store.get_order(slug)),
            || self.fallback.get_order(slug),
        )
        .await?;

        Ok(served.value)
    }

    /// Every known property's entries (versions omitted).
    pub async fn get_all_orders(
        &self,
    ) -> Result<BTreeMap<String, Vec<PhotoOrderEntry>>, CoreError> {
        let served = with_fallback(
            "get_all_orders",
            self.primary.as_ref().map(|store| store.list_orders()),
            || self.fallback.list_orders(),
        )
        .await?;

        let listing = served.value;
        if !listing.malformed.is_empty() {
            tracing::warn!(
                keys = ?listing.malformed,
                backend = served.backend.as_str(),
                "Omitting unreadable orders from listing"
            );
        }
        Ok(listing.orders)
    }

    /// Store `entries` for `slug`.
    ///
    /// Without `expected_version` this is an upsert that never detects
    /// concurrent writers; use it for first writes and trusted imports.
    /// With `expected_version` the primary applies the write only if the
    /// stored version still matches, otherwise [`CoreError::Conflict`].
    pub async fn set_order(
        &self,
        slug: &str,
        entries: &[PhotoOrderEntry],
        expected_version: Option<i32>,
    ) -> Result<OrderWrite, CoreError> {
        validate_property_slug(slug)?;
        validate_entries(entries)?;

        let Some(expected) = expected_version else {
            let served = with_fallback(
                "upsert_order",
                self.primary
                    .as_ref()
                    .map(|store| store.upsert_order(slug, entries)),
                || self.fallback.upsert_order(slug, entries),
            )
            .await?;

            tracing::debug!(slug, version = ?served.value, backend = served.backend.as_str(), "Photo order upserted");
            return Ok(OrderWrite {
                version: served.value,
                backend: served.backend,
            });
        };

        let served = with_fallback(
            "update_order_if_version",
            self.primary
                .as_ref()
                .map(|store| store.update_order_if_version(slug, entries, expected)),
            || self.fallback.update_order_if_version(slug, entries, expected),
        )
        .await?;

        if served.backend == Backend::Fallback {
            tracing::warn!(
                slug,
                expected_version = expected,
                "Fallback document has no version check; write applied as overwrite"
            );
        }

        match served.value {
            ConditionalWrite::Applied { version } => {
                tracing::debug!(slug, expected_version = expected, version = ?version, "Photo order updated");
                Ok(OrderWrite {
                    version,
                    backend: served.backend,
                })
            }
            ConditionalWrite::Stale => {
                tracing::info!(slug, expected_version = expected, "Photo order version conflict");
                Err(CoreError::Conflict(CONFLICT_MESSAGE.into()))
            }
        }
    }

    /// Copy every property order from the fallback document into the
    /// primary store with unconditioned upserts.
    ///
    /// Requires a configured primary; nothing falls back here. Document
    /// keys that cannot be imported (bad slug or unusable entries) are
    /// skipped and reported.
    pub async fn import_from_fallback(&self) -> Result<ImportReport, CoreError> {
        let primary = self.primary.as_ref().ok_or_else(|| {
            CoreError::StorageUnavailable("no primary store configured".into())
        })?;

        let listing = self
            .fallback
            .list_orders()
            .await
            .map_err(|e| CoreError::StorageUnavailable(e.to_string()))?;

        let mut report = ImportReport::default();
        for slug in listing.malformed {
            tracing::warn!(slug = %slug, "Skipping unreadable order during import");
            report.skipped.push(slug);
        }
        for (slug, entries) in listing.orders {
            if validate_property_slug(&slug).is_err() || validate_entries(&entries).is_err() {
                tracing::warn!(slug = %slug, "Skipping invalid order during import");
                report.skipped.push(slug);
                continue;
            }

            let version = primary
                .upsert_order(&slug, &entries)
                .await
                .map_err(|e| CoreError::StorageUnavailable(e.to_string()))?;
            tracing::info!(slug = %slug, images = entries.len(), version = ?version, "Imported photo order");
            report.imported.push(slug);
        }

        Ok(report)
    }
}
