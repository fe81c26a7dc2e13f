//! In-process fallback document.
//!
//! Behaves like the remote document (whole-document fetch and replace) and
//! can be switched offline to simulate an outage.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::backend::{DocumentBackend, DocumentError};
use crate::document::FallbackDocument;

/// A fallback document held in memory.
#[derive(Debug, Default)]
pub struct MemoryDocument {
    doc: Mutex<FallbackDocument>,
    offline: AtomicBool,
    writes: AtomicUsize,
}

impl MemoryDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing document.
    pub fn with_document(doc: FallbackDocument) -> Self {
        Self {
            doc: Mutex::new(doc),
            ..Self::default()
        }
    }

    /// Toggle the simulated outage.
    pub fn set_online(&self, online: bool) {
        self.offline.store(!online, Ordering::SeqCst);
    }

    /// Number of successful `replace` calls so far.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Copy of the current document, bypassing the outage switch.
    pub fn snapshot(&self) -> FallbackDocument {
        self.lock().clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, FallbackDocument> {
        self.doc.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn check(&self) -> Result<(), DocumentError> {
        if self.offline.load(Ordering::SeqCst) {
            Err(DocumentError::Offline)
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl DocumentBackend for MemoryDocument {
    fn name(&self) -> &'static str {
        "memory-document"
    }

    async fn fetch(&self) -> Result<FallbackDocument, DocumentError> {
        self.check()?;
        Ok(self.lock().clone())
    }

    async fn replace(&self, doc: &FallbackDocument) -> Result<(), DocumentError> {
        self.check()?;
        *self.lock() = doc.clone();
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
