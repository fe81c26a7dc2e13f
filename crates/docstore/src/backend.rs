//! The narrow contract every fallback document backend implements.

use async_trait::async_trait;
use lodge_core::store::StoreError;

use crate::document::FallbackDocument;

/// Errors from reading or writing the fallback document.
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The document store returned a non-2xx status code.
    #[error("document store returned HTTP {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// The document (or a part of it) did not have the expected shape.
    #[error("malformed document: {0}")]
    Malformed(#[from] serde_json::Error),

    /// The backend is switched off (in-memory backend only).
    #[error("document store is offline")]
    Offline,
}

impl DocumentError {
    /// Convert into the store-level error, tagged with the backend name.
    pub fn into_store_error(self, backend: &'static str) -> StoreError {
        match self {
            Self::Malformed(e) => StoreError::malformed(backend, e),
            other => StoreError::unavailable(backend, other),
        }
    }
}

/// Whole-document access: one read, one full overwrite.
#[async_trait]
pub trait DocumentBackend: Send + Sync {
    /// Short backend name used in logs and errors.
    fn name(&self) -> &'static str;

    /// Fetch the current document.
    async fn fetch(&self) -> Result<FallbackDocument, DocumentError>;

    /// Overwrite the document with `doc`.
    async fn replace(&self, doc: &FallbackDocument) -> Result<(), DocumentError>;
}
