pub mod admin;
pub mod auth;
pub mod photo_order;
pub mod trash;
pub mod upload;
