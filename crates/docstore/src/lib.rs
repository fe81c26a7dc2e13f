//! Fallback storage in a single shared JSON document.
//!
//! The whole document is fetched and rewritten on every operation; there
//! is no field-level patch and no write precondition. Concurrent writers
//! race and the last one wins, silently discarding changes made in
//! between. This is the accepted trade-off for a store that only serves
//! while the primary database is unreachable.
//!
//! - [`document`] -- the document shape and typed accessors.
//! - [`backend`] -- the narrow fetch/replace contract plus its error type.
//! - [`http`] -- the remote document over HTTP (`reqwest`).
//! - [`memory`] -- an in-process document for tests and local runs.
//! - [`orders`] / [`trash`] -- `lodge-core` store traits on top.

pub mod backend;
pub mod document;
pub mod http;
pub mod memory;
pub mod orders;
pub mod trash;

pub use backend::{DocumentBackend, DocumentError};
pub use document::FallbackDocument;
pub use http::JsonBlobClient;
pub use memory::MemoryDocument;
pub use orders::DocumentOrderStore;
pub use trash::DocumentTrashStore;
