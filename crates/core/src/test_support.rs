//! In-memory stores for service tests.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::photo_order::{OrderSnapshot, PhotoOrderEntry};
use crate::store::{ConditionalWrite, OrderListing, OrderStore, StoreError, TrashStore};
use crate::trash::{sort_newest_first, TrashItem};
use crate::types::{DbId, Timestamp};

/// Order store keeping `(entries, version)` per slug.
///
/// `versioned` stores behave like the primary (atomic compare-and-swap);
/// unversioned ones behave like the fallback document (blind overwrite).
pub struct MemoryOrderStore {
    name: &'static str,
    versioned: bool,
    available: AtomicBool,
    orders: Mutex<BTreeMap<String, (Vec<PhotoOrderEntry>, i32)>>,
    malformed: Mutex<Vec<String>>,
}

impl MemoryOrderStore {
    pub fn versioned(name: &'static str) -> Self {
        Self::new(name, true)
    }

    pub fn unversioned(name: &'static str) -> Self {
        Self::new(name, false)
    }

    fn new(name: &'static str, versioned: bool) -> Self {
        Self {
            name,
            versioned,
            available: AtomicBool::new(true),
            orders: Mutex::new(BTreeMap::new()),
            malformed: Mutex::new(Vec::new()),
        }
    }

    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    pub fn seed(&self, slug: &str, entries: Vec<PhotoOrderEntry>) {
        self.orders
            .lock()
            .unwrap()
            .insert(slug.to_string(), (entries, 1));
    }

    /// Register a key whose stored entries cannot be decoded.
    pub fn seed_malformed(&self, slug: &str) {
        self.malformed.lock().unwrap().push(slug.to_string());
    }

    pub fn len(&self) -> usize {
        self.orders.lock().unwrap().len()
    }

    fn check(&self) -> Result<(), StoreError> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(StoreError::unavailable(self.name, "simulated outage"))
        }
    }

    fn version(&self, version: i32) -> Option<i32> {
        self.versioned.then_some(version)
    }
}

#[async_trait]
impl OrderStore for MemoryOrderStore {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn get_order(&self, slug: &str) -> Result<Option<OrderSnapshot>, StoreError> {
        self.check()?;
        let orders = self.orders.lock().unwrap();
        Ok(orders.get(slug).map(|(entries, version)| OrderSnapshot {
            entries: entries.clone(),
            version: self.version(*version),
        }))
    }

    async fn list_orders(&self) -> Result<OrderListing, StoreError> {
        self.check()?;
        let orders = self.orders.lock().unwrap();
        Ok(OrderListing {
            orders: orders
                .iter()
                .map(|(slug, (entries, _))| (slug.clone(), entries.clone()))
                .collect(),
            malformed: self.malformed.lock().unwrap().clone(),
        })
    }

    async fn upsert_order(
        &self,
        slug: &str,
        entries: &[PhotoOrderEntry],
    ) -> Result<Option<i32>, StoreError> {
        self.check()?;
        let mut orders = self.orders.lock().unwrap();
        let version = orders.get(slug).map_or(1, |(_, v)| v + 1);
        orders.insert(slug.to_string(), (entries.to_vec(), version));
        Ok(self.version(version))
    }

    async fn update_order_if_version(
        &self,
        slug: &str,
        entries: &[PhotoOrderEntry],
        expected_version: i32,
    ) -> Result<ConditionalWrite, StoreError> {
        self.check()?;
        let mut orders = self.orders.lock().unwrap();
        if !self.versioned {
            let version = orders.get(slug).map_or(1, |(_, v)| v + 1);
            orders.insert(slug.to_string(), (entries.to_vec(), version));
            return Ok(ConditionalWrite::Applied { version: None });
        }
        match orders.get_mut(slug) {
            Some((stored, version)) if *version == expected_version => {
                *stored = entries.to_vec();
                *version += 1;
                Ok(ConditionalWrite::Applied {
                    version: Some(*version),
                })
            }
            _ => Ok(ConditionalWrite::Stale),
        }
    }
}

/// Trash store backed by a vector.
pub struct MemoryTrashStore {
    name: &'static str,
    available: AtomicBool,
    next_id: AtomicI64,
    items: Mutex<Vec<TrashItem>>,
}

impl MemoryTrashStore {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            available: AtomicBool::new(true),
            next_id: AtomicI64::new(1),
            items: Mutex::new(Vec::new()),
        }
    }

    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    fn check(&self) -> Result<(), StoreError> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(StoreError::unavailable(self.name, "simulated outage"))
        }
    }
}

#[async_trait]
impl TrashStore for MemoryTrashStore {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn insert(
        &self,
        slug: &str,
        src: &str,
        deleted_at: Timestamp,
    ) -> Result<TrashItem, StoreError> {
        self.check()?;
        let item = TrashItem {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            property_slug: slug.to_string(),
            src: src.to_string(),
            deleted_at,
        };
        self.items.lock().unwrap().push(item.clone());
        Ok(item)
    }

    async fn list_newest_first(&self) -> Result<Vec<TrashItem>, StoreError> {
        self.check()?;
        let mut items = self.items.lock().unwrap().clone();
        sort_newest_first(&mut items);
        Ok(items)
    }

    async fn remove(&self, id: DbId) -> Result<bool, StoreError> {
        self.check()?;
        let mut items = self.items.lock().unwrap();
        let before = items.len();
        items.retain(|item| item.id != id);
        Ok(items.len() < before)
    }

    async fn purge_deleted_until(&self, cutoff: Timestamp) -> Result<u64, StoreError> {
        self.check()?;
        let mut items = self.items.lock().unwrap();
        let before = items.len();
        items.retain(|item| item.deleted_at > cutoff);
        Ok((before - items.len()) as u64)
    }
}
