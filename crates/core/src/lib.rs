//! Domain logic for property photo ordering and the photo trash.
//!
//! Pure business logic: no database or HTTP dependencies. Persistence is
//! reached through the [`store`] traits, implemented by `lodge-db` (primary)
//! and `lodge-docstore` (fallback document).

pub mod clock;
pub mod error;
pub mod fallback;
pub mod photo_order;
pub mod store;
pub mod trash;
pub mod types;

#[cfg(test)]
mod test_support;
