//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async query methods
//! that accept `&PgPool` as the first argument.

pub mod photo_order_repo;
pub mod trash_item_repo;

pub use photo_order_repo::PhotoOrderRepo;
pub use trash_item_repo::TrashItemRepo;
