//! Request extractors guarding the back-office routes.
//!
//! - [`auth::AdminSession`] -- requires a valid admin session.

pub mod auth;
