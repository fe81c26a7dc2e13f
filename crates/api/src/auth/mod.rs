//! Authentication primitives for the single admin account.
//!
//! - [`password`] -- Argon2id hashing and verification.
//! - [`jwt`] -- session token generation and validation.
//! - [`cookie`] -- the `admin-session` cookie.

pub mod cookie;
pub mod jwt;
pub mod password;
