pub mod admin;
pub mod health;
pub mod photo_order;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /photo-order                 get (public), save (admin)
///
/// /admin/auth                  login, logout
/// /admin/trash                 list trash (admin)
/// /admin/trash-add             move a photo to trash (admin)
/// /admin/trash-restore         drop a trash record (admin)
/// /admin/trash-purge           purge one or all expired (admin)
/// /admin/migrate               migrate schema, import fallback (admin)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(photo_order::router())
        .nest("/admin", admin::router())
}
