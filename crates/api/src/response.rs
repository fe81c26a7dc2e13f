//! Shared response envelope for mutating endpoints.
//!
//! Every successful write answers `{ "ok": true, ...fields }`. Use
//! [`OkResponse`] instead of ad-hoc `serde_json::json!({ "ok": true })`
//! to keep the payload typed.

use serde::Serialize;

/// `{ "ok": true, ...T }` response envelope.
///
/// # Example
///
/// ```ignore
/// Ok(Json(OkResponse::new(PurgedBody { purged })))
/// ```
#[derive(Debug, Serialize)]
pub struct OkResponse<T: Serialize> {
    pub ok: bool,
    #[serde(flatten)]
    pub body: T,
}

impl<T: Serialize> OkResponse<T> {
    pub fn new(body: T) -> Self {
        Self { ok: true, body }
    }
}

/// Body for endpoints with nothing to report beyond `ok`.
#[derive(Debug, Serialize)]
pub struct Empty {}

impl OkResponse<Empty> {
    pub fn empty() -> Self {
        Self::new(Empty {})
    }
}
