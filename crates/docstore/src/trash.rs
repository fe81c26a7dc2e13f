//! [`TrashStore`] over the `_trash` list of the fallback document.

use std::sync::Arc;

use async_trait::async_trait;
use lodge_core::store::{StoreError, TrashStore};
use lodge_core::trash::{sort_newest_first, TrashItem};
use lodge_core::types::{DbId, Timestamp};

use crate::backend::DocumentBackend;
use crate::document::FallbackDocument;

#[derive(Clone)]
pub struct DocumentTrashStore {
    backend: Arc<dyn DocumentBackend>,
}

impl DocumentTrashStore {
    pub fn new(backend: Arc<dyn DocumentBackend>) -> Self {
        Self { backend }
    }

    async fn load(&self) -> Result<(FallbackDocument, Vec<TrashItem>), StoreError> {
        let name = self.backend.name();
        let doc = self
            .backend
            .fetch()
            .await
            .map_err(|e| e.into_store_error(name))?;
        let items = doc.trash().map_err(|e| StoreError::malformed(name, e))?;
        Ok((doc, items))
    }

    async fn save(&self, mut doc: FallbackDocument, items: &[TrashItem]) -> Result<(), StoreError> {
        let name = self.backend.name();
        doc.set_trash(items)
            .map_err(|e| StoreError::malformed(name, e))?;
        self.backend
            .replace(&doc)
            .await
            .map_err(|e| e.into_store_error(name))
    }
}

/// Millisecond timestamp of the deletion, bumped past the current maximum
/// so ids stay unique when two deletions land in the same millisecond.
fn next_id(items: &[TrashItem], deleted_at: Timestamp) -> DbId {
    let max_id = items.iter().map(|item| item.id).max().unwrap_or(0);
    deleted_at.timestamp_millis().max(max_id + 1)
}

#[async_trait]
impl TrashStore for DocumentTrashStore {
    fn name(&self) -> &'static str {
        self.backend.name()
    }

    async fn insert(
        &self,
        slug: &str,
        src: &str,
        deleted_at: Timestamp,
    ) -> Result<TrashItem, StoreError> {
        let (doc, mut items) = self.load().await?;
        let item = TrashItem {
            id: next_id(&items, deleted_at),
            property_slug: slug.to_string(),
            src: src.to_string(),
            deleted_at,
        };
        items.push(item.clone());
        self.save(doc, &items).await?;
        Ok(item)
    }

    async fn list_newest_first(&self) -> Result<Vec<TrashItem>, StoreError> {
        let (_, mut items) = self.load().await?;
        sort_newest_first(&mut items);
        Ok(items)
    }

    async fn remove(&self, id: DbId) -> Result<bool, StoreError> {
        let (doc, mut items) = self.load().await?;
        let before = items.len();
        items.retain(|item| item.id != id);
        if items.len() == before {
            return Ok(false);
        }
        self.save(doc, &items).await?;
        Ok(true)
    }

    async fn purge_deleted_until(&self, cutoff: Timestamp) -> Result<u64, StoreError> {
        let (doc, mut items) = self.load().await?;
        let before = items.len();
        items.retain(|item| item.deleted_at > cutoff);
        let purged = before - items.len();
        if purged > 0 {
            self.save(doc, &items).await?;
        }
        Ok(purged as u64)
    }
}
