//! Client for the media host's upload endpoint.
//!
//! Photo files are not stored by this service. They are forwarded as
//! multipart `files[]` plus a `property` field to
//! `{MEDIA_BASE_URL}/upload.php`, authenticated with a shared
//! `X-Upload-Secret` header. The host answers `{ "urls": [...] }` with the
//! public URL of every stored file.

use std::time::Duration;

use reqwest::multipart::{Form, Part};
use serde::Deserialize;

/// Header carrying the shared upload secret.
pub const UPLOAD_SECRET_HEADER: &str = "x-upload-secret";

/// Errors from forwarding an upload.
#[derive(Debug, thiserror::Error)]
pub enum MediaError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout) or the
    /// success body could not be decoded.
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The media host answered with a non-2xx status.
    #[error("media host returned HTTP {status}: {message}")]
    Rejected { status: u16, message: String },
}

/// One file received from the back office.
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

#[derive(Deserialize)]
struct UploadedUrls {
    urls: Vec<String>,
}

#[derive(Deserialize)]
struct RejectionBody {
    error: String,
}

pub struct MediaClient {
    client: reqwest::Client,
    upload_url: String,
    secret: String,
}

impl MediaClient {
    /// Create a client for the media host at `base_url` with a per-request
    /// timeout.
    pub fn new(base_url: &str, secret: String, timeout: Duration) -> Result<Self, MediaError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            upload_url: format!("{}/upload.php", base_url.trim_end_matches('/')),
            secret,
        })
    }

    pub fn upload_url(&self) -> &str {
        &self.upload_url
    }

    /// Forward `files` for `property` and return the URLs the host
    /// assigned, in the order the host reports them.
    pub async fn upload(
        &self,
        property: &str,
        files: Vec<UploadFile>,
    ) -> Result<Vec<String>, MediaError> {
        let file_count = files.len();
        let mut form = Form::new().text("property", property.to_string());
        for file in files {
            let mut part = Part::bytes(file.bytes).file_name(file.file_name);
            if let Some(content_type) = file.content_type {
                part = part.mime_str(&content_type)?;
            }
            form = form.part("files[]", part);
        }

        let response = self
            .client
            .post(&self.upload_url)
            .header(UPLOAD_SECRET_HEADER, &self.secret)
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<RejectionBody>()
                .await
                .map(|body| body.error)
                .unwrap_or_else(|_| "Upload failed".to_string());
            return Err(MediaError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        let uploaded: UploadedUrls = response.json().await?;
        tracing::info!(
            property,
            files = file_count,
            urls = uploaded.urls.len(),
            "Photos uploaded to media host"
        );
        Ok(uploaded.urls)
    }
}
