//! [`OrderStore`] over the fallback document.
//!
//! The document has no versions: reads report `version: None` and every
//! write, conditional or not, is a read-modify-write of the whole document
//! where the last writer wins.

use std::sync::Arc;

use async_trait::async_trait;
use lodge_core::photo_order::{OrderSnapshot, PhotoOrderEntry};
use lodge_core::store::{ConditionalWrite, OrderListing, OrderStore, StoreError};

use crate::backend::DocumentBackend;

#[derive(Clone)]
pub struct DocumentOrderStore {
    backend: Arc<dyn DocumentBackend>,
}

impl DocumentOrderStore {
    pub fn new(backend: Arc<dyn DocumentBackend>) -> Self {
        Self { backend }
    }

    async fn write(&self, slug: &str, entries: &[PhotoOrderEntry]) -> Result<(), StoreError> {
        let name = self.backend.name();
        let mut doc = self
            .backend
            .fetch()
            .await
            .map_err(|e| e.into_store_error(name))?;
        doc.set_order(slug, entries)
            .map_err(|e| StoreError::malformed(name, e))?;
        self.backend
            .replace(&doc)
            .await
            .map_err(|e| e.into_store_error(name))?;

        tracing::debug!(property = slug, entries = entries.len(), backend = name, "Order written");
        Ok(())
    }
}

#[async_trait]
impl OrderStore for DocumentOrderStore {
    fn name(&self) -> &'static str {
        self.backend.name()
    }

    async fn get_order(&self, slug: &str) -> Result<Option<OrderSnapshot>, StoreError> {
        let name = self.backend.name();
        let doc = self
            .backend
            .fetch()
            .await
            .map_err(|e| e.into_store_error(name))?;
        let entries = doc
            .order(slug)
            .map_err(|e| StoreError::malformed(name, e))?;
        Ok(entries.map(|entries| OrderSnapshot {
            entries,
            version: None,
        }))
    }

    async fn list_orders(&self) -> Result<OrderListing, StoreError> {
        let name = self.backend.name();
        let doc = self
            .backend
            .fetch()
            .await
            .map_err(|e| e.into_store_error(name))?;

        let mut listing = OrderListing::default();
        for (slug, decoded) in doc.orders() {
            match decoded {
                Ok(entries) => {
                    listing.orders.insert(slug, entries);
                }
                Err(e) => {
                    tracing::warn!(property = %slug, backend = name, error = %e, "Unreadable order in document");
                    listing.malformed.push(slug);
                }
            }
        }
        Ok(listing)
    }

    async fn upsert_order(
        &self,
        slug: &str,
        entries: &[PhotoOrderEntry],
    ) -> Result<Option<i32>, StoreError> {
        self.write(slug, entries).await?;
        Ok(None)
    }

    /// The expected version cannot be checked here; the write always
    /// applies.
    async fn update_order_if_version(
        &self,
        slug: &str,
        entries: &[PhotoOrderEntry],
        _expected_version: i32,
    ) -> Result<ConditionalWrite, StoreError> {
        self.write(slug, entries).await?;
        Ok(ConditionalWrite::Applied { version: None })
    }
}
