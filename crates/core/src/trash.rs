//! Soft-deleted property photos ("trash").
//!
//! A photo removed from a property's order is recorded here with its
//! deletion time. Items leave the trash in one of three ways: restore
//! (the record is dropped and the caller re-adds the photo to the order as
//! a new entry), explicit permanent delete, or the expiry purge once
//! [`TRASH_RETENTION_DAYS`] have elapsed. There is no other state.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::clock::Clock;
use crate::error::CoreError;
use crate::fallback::with_fallback;
use crate::photo_order::{validate_image_src, validate_property_slug};
use crate::store::{StoreError, TrashStore};
use crate::types::{DbId, Timestamp};

/// Days an item stays in the trash before the expiry purge removes it.
pub const TRASH_RETENTION_DAYS: i64 = 7;

/// A soft-deleted photo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrashItem {
    pub id: DbId,
    pub property_slug: String,
    pub src: String,
    pub deleted_at: Timestamp,
}

/// Retention window as a duration.
pub fn retention() -> chrono::Duration {
    chrono::Duration::days(TRASH_RETENTION_DAYS)
}

/// Items deleted at or before this instant are expired at `now`.
pub fn expiry_cutoff(now: Timestamp) -> Timestamp {
    now - retention()
}

/// `true` once at least the retention window has elapsed since deletion.
pub fn is_expired(deleted_at: Timestamp, now: Timestamp) -> bool {
    deleted_at <= expiry_cutoff(now)
}

/// Sort most recently deleted first; ties broken by id, highest first.
pub fn sort_newest_first(items: &mut [TrashItem]) {
    items.sort_by(|a, b| {
        b.deleted_at
            .cmp(&a.deleted_at)
            .then_with(|| b.id.cmp(&a.id))
    });
}

/// Records, lists, and purges trash items across the primary store and
/// the fallback document.
pub struct TrashService {
    primary: Option<Arc<dyn TrashStore>>,
    fallback: Arc<dyn TrashStore>,
    clock: Arc<dyn Clock>,
}

impl TrashService {
    pub fn new(
        primary: Option<Arc<dyn TrashStore>>,
        fallback: Arc<dyn TrashStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            primary,
            fallback,
            clock,
        }
    }

    /// Record `src` as removed from `slug`'s order, stamped with the
    /// current time.
    pub async fn add_to_trash(&self, slug: &str, src: &str) -> Result<TrashItem, CoreError> {
        validate_property_slug(slug)?;
        validate_image_src(src)?;

        let now = self.clock.now();
        let served = with_fallback(
            "add_to_trash",
            self.primary
                .as_ref()
                .map(|store| store.insert(slug, src, now)),
            || self.fallback.insert(slug, src, now),
        )
        .await?;

        tracing::info!(
            id = served.value.id,
            slug,
            src,
            backend = served.backend.as_str(),
            "Photo moved to trash"
        );
        Ok(served.value)
    }

    /// Every trash item, most recently deleted first.
    pub async fn list_trash(&self) -> Result<Vec<TrashItem>, CoreError> {
        let served = with_fallback(
            "list_trash",
            self.primary
                .as_ref()
                .map(|store| store.list_newest_first()),
            || self.fallback.list_newest_first(),
        )
        .await?;

        Ok(served.value)
    }

    /// Drop one item. Serves both restore and permanent delete; which of
    /// the two it means is up to the caller. Returns `false` if no such
    /// item existed.
    pub async fn remove_from_trash(&self, id: DbId) -> Result<bool, CoreError> {
        let served = with_fallback(
            "remove_from_trash",
            self.primary.as_ref().map(|store| store.remove(id)),
            || self.fallback.remove(id),
        )
        .await?;

        tracing::info!(id, removed = served.value, backend = served.backend.as_str(), "Trash item removed");
        Ok(served.value)
    }

    /// Delete every item deleted at least [`TRASH_RETENTION_DAYS`] ago and
    /// return how many were removed. Running it twice in a row purges
    /// nothing the second time.
    pub async fn purge_expired(&self) -> Result<u64, CoreError> {
        let cutoff = expiry_cutoff(self.clock.now());
        let served = with_fallback(
            "purge_expired",
            self.primary
                .as_ref()
                .map(|store| store.purge_deleted_until(cutoff)),
            || self.fallback.purge_deleted_until(cutoff),
        )
        .await?;

        if served.value > 0 {
            tracing::info!(purged = served.value, %cutoff, backend = served.backend.as_str(), "Purged expired trash items");
        }
        Ok(served.value)
    }

    /// Move every item recorded in the fallback document into the primary
    /// store, keeping its deletion time, and drop it from the fallback.
    /// Returns how many items moved.
    ///
    /// Requires a configured primary. Items move oldest first, so primary
    /// ids follow deletion order.
    pub async fn import_from_fallback(&self) -> Result<u64, CoreError> {
        let primary = self.primary.as_ref().ok_or_else(|| {
            CoreError::StorageUnavailable("no primary store configured".into())
        })?;
        let unavailable = |e: StoreError| CoreError::StorageUnavailable(e.to_string());

        let items = self
            .fallback
            .list_newest_first()
            .await
            .map_err(unavailable)?;

        let mut moved = 0;
        for item in items.into_iter().rev() {
            let stored = primary
                .insert(&item.property_slug, &item.src, item.deleted_at)
                .await
                .map_err(unavailable)?;
            self.fallback.remove(item.id).await.map_err(unavailable)?;
            tracing::debug!(fallback_id = item.id, id = stored.id, "Trash item moved to primary");
            moved += 1;
        }

        if moved > 0 {
            tracing::info!(moved, "Fallback trash imported");
        }
        Ok(moved)
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use chrono::{Duration, TimeZone, Utc};

    use super::*;
    use crate::clock::ManualClock;
    use crate::test_support::MemoryTrashStore;

    fn start() -> Timestamp {
        Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap()
    }

    fn service_with_clock() -> (Arc<MemoryTrashStore>, Arc<ManualClock>, TrashService) {
        let primary = Arc::new(MemoryTrashStore::new("primary"));
        let fallback = Arc::new(MemoryTrashStore::new("fallback"));
        let clock = Arc::new(ManualClock::at(start()));
        let service = TrashService::new(Some(primary.clone()), fallback, clock.clone());
        (primary, clock, service)
    }

    #[test]
    fn expiry_is_inclusive_at_seven_days() {
        let now = start();
        assert!(is_expired(now - Duration::days(7), now));
        assert!(is_expired(now - Duration::days(8), now));
        assert!(!is_expired(now - Duration::days(7) + Duration::seconds(1), now));
        assert!(!is_expired(now, now));
    }

    #[test]
    fn sorting_puts_newest_first() {
        let item = |id, minutes| TrashItem {
            id,
            property_slug: "lakeview".into(),
            src: format!("{id}.jpg"),
            deleted_at: start() + Duration::minutes(minutes),
        };
        let mut items = vec![item(1, 0), item(2, 5), item(3, 5), item(4, -10)];
        sort_newest_first(&mut items);
        let ids: Vec<_> = items.iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![3, 2, 1, 4]);
    }

    #[tokio::test]
    async fn added_item_is_listed_with_current_time() {
        let (_, _, service) = service_with_clock();

        let item = service.add_to_trash("lakeview", "old.jpg").await.unwrap();
        assert_eq!(item.deleted_at, start());

        let listed = service.list_trash().await.unwrap();
        assert_eq!(listed, vec![item]);
    }

    #[tokio::test]
    async fn list_is_sorted_newest_first() {
        let (_, clock, service) = service_with_clock();

        let first = service.add_to_trash("lakeview", "a.jpg").await.unwrap();
        clock.advance(Duration::hours(1));
        let second = service.add_to_trash("hilltop", "b.jpg").await.unwrap();

        let listed = service.list_trash().await.unwrap();
        assert_eq!(listed, vec![second, first]);
    }

    #[tokio::test]
    async fn removed_item_is_no_longer_listed() {
        let (_, _, service) = service_with_clock();
        let keep = service.add_to_trash("lakeview", "a.jpg").await.unwrap();
        let gone = service.add_to_trash("lakeview", "b.jpg").await.unwrap();

        assert!(service.remove_from_trash(gone.id).await.unwrap());
        assert!(!service.remove_from_trash(gone.id).await.unwrap());

        let listed = service.list_trash().await.unwrap();
        assert_eq!(listed, vec![keep]);
    }

    #[tokio::test]
    async fn purge_after_eight_days_is_idempotent() {
        let (_, clock, service) = service_with_clock();
        service.add_to_trash("lakeview", "old.jpg").await.unwrap();

        clock.advance(Duration::days(8));

        assert_eq!(service.purge_expired().await.unwrap(), 1);
        assert_eq!(service.purge_expired().await.unwrap(), 0);
        assert!(service
            .list_trash()
            .await
            .unwrap()
            .iter()
            .all(|i| i.property_slug != "lakeview"));
    }

    #[tokio::test]
    async fn purge_keeps_items_younger_than_retention() {
        let (_, clock, service) = service_with_clock();
        service.add_to_trash("lakeview", "old.jpg").await.unwrap();
        clock.advance(Duration::days(3));
        let fresh = service.add_to_trash("lakeview", "new.jpg").await.unwrap();
        clock.advance(Duration::days(4));

        assert_eq!(service.purge_expired().await.unwrap(), 1);
        assert_eq!(service.list_trash().await.unwrap(), vec![fresh]);
    }

    #[tokio::test]
    async fn primary_outage_uses_fallback() {
        let (primary, _, service) = service_with_clock();
        primary.set_available(false);

        let item = service.add_to_trash("lakeview", "a.jpg").await.unwrap();
        let listed = service.list_trash().await.unwrap();
        assert_eq!(listed, vec![item]);
    }

    #[tokio::test]
    async fn import_moves_fallback_items_into_primary() {
        let (primary, clock, service) = service_with_clock();
        primary.set_available(false);
        let old = service.add_to_trash("lakeview", "a.jpg").await.unwrap();
        clock.advance(Duration::hours(2));
        let new = service.add_to_trash("hilltop", "b.jpg").await.unwrap();
        primary.set_available(true);

        assert_eq!(service.import_from_fallback().await.unwrap(), 2);
        assert_eq!(service.import_from_fallback().await.unwrap(), 0);

        let listed = primary.list_newest_first().await.unwrap();
        let moved: Vec<_> = listed
            .iter()
            .map(|i| (i.src.as_str(), i.deleted_at))
            .collect();
        assert_eq!(
            moved,
            vec![("b.jpg", new.deleted_at), ("a.jpg", old.deleted_at)]
        );
        assert!(listed[0].id > listed[1].id, "oldest item gets the lower id");

        // Moved items still expire on their original schedule.
        clock.advance(Duration::days(7) - Duration::hours(2));
        assert_eq!(service.purge_expired().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn trash_import_without_primary_is_unavailable() {
        let fallback = Arc::new(MemoryTrashStore::new("fallback"));
        let clock = Arc::new(ManualClock::at(start()));
        let service = TrashService::new(None, fallback, clock);

        assert_matches!(
            service.import_from_fallback().await,
            Err(CoreError::StorageUnavailable(_))
        );
    }

    #[tokio::test]
    async fn invalid_input_is_rejected() {
        let (_, _, service) = service_with_clock();
        assert_matches!(
            service.add_to_trash("", "a.jpg").await,
            Err(CoreError::Validation(_))
        );
        assert_matches!(
            service.add_to_trash("lakeview", " ").await,
            Err(CoreError::Validation(_))
        );
    }
}
