//! HTTP client for the remote fallback document.
//!
//! Talks to a JSON-blob style API at a fixed URL: `GET` returns the
//! document, `PUT` replaces it.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{ACCEPT, CACHE_CONTROL};

use crate::backend::{DocumentBackend, DocumentError};
use crate::document::FallbackDocument;

const BACKEND: &str = "json-document";

/// HTTP client for the shared fallback document.
pub struct JsonBlobClient {
    client: reqwest::Client,
    url: String,
}

impl JsonBlobClient {
    /// Create a client for the document at `url` with a per-request
    /// timeout.
    pub fn new(url: String, timeout: Duration) -> Result<Self, DocumentError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client, url })
    }

    /// Create a client reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, url: String) -> Self {
        Self { client, url }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Ensure the response has a success status code. Returns the
    /// response unchanged on success, or a [`DocumentError::Status`]
    /// containing the status and body text on failure.
    ///
    /// A failed read is never treated as an empty document: the next
    /// write would then replace everything stored remotely.
    async fn ensure_success(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, DocumentError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(DocumentError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }
}

#[async_trait]
impl DocumentBackend for JsonBlobClient {
    fn name(&self) -> &'static str {
        BACKEND
    }

    async fn fetch(&self) -> Result<FallbackDocument, DocumentError> {
        let response = self
            .client
            .get(&self.url)
            .header(ACCEPT, "application/json")
            .header(CACHE_CONTROL, "no-store")
            .send()
            .await?;

        let bytes = Self::ensure_success(response).await?.bytes().await?;
        let doc = serde_json::from_slice(&bytes)?;
        tracing::debug!(url = %self.url, bytes = bytes.len(), "Fetched fallback document");
        Ok(doc)
    }

    async fn replace(&self, doc: &FallbackDocument) -> Result<(), DocumentError> {
        let response = self
            .client
            .put(&self.url)
            .header(ACCEPT, "application/json")
            .json(doc)
            .send()
            .await?;

        Self::ensure_success(response).await?;
        tracing::debug!(url = %self.url, "Replaced fallback document");
        Ok(())
    }
}
