//! Route definitions for `/admin`.

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{admin, auth, trash, upload};
use crate::state::AppState;

/// Routes mounted at `/admin`. Everything except `/auth` requires an
/// admin session.
///
/// ```text
/// POST   /auth            -> login
/// DELETE /auth            -> logout
/// GET    /trash           -> list_trash
/// POST   /trash-add       -> add
/// POST   /trash-restore   -> restore
/// POST   /trash-purge     -> purge   ({ id } or { purgeExpired: true })
/// POST   /upload          -> upload  (multipart, forwarded to the media host)
/// POST   /migrate         -> migrate
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/auth", post(auth::login).delete(auth::logout))
        .route("/trash", get(trash::list_trash))
        .route("/trash-add", post(trash::add))
        .route("/trash-restore", post(trash::restore))
        .route("/trash-purge", post(trash::purge))
        .route(
            "/upload",
            post(upload::upload).layer(DefaultBodyLimit::max(upload::MAX_UPLOAD_BYTES)),
        )
        .route("/migrate", post(admin::migrate))
}
