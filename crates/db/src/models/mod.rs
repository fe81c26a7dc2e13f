//! Row structs for the primary store.
//!
//! Each submodule holds a `FromRow` struct matching one table plus the
//! conversion into the `lodge-core` domain type.

pub mod photo_order;
pub mod trash_item;
