//! Route definitions for `/photo-order`.

use axum::routing::get;
use axum::Router;

use crate::handlers::photo_order;
use crate::state::AppState;

/// Routes merged into `/api`.
///
/// ```text
/// GET    /photo-order    -> get_photo_order  (?property=slug|_all, public)
/// POST   /photo-order    -> set_photo_order  (admin session required)
/// ```
///
/// The save is guarded even though it is not under `/admin`; only the read
/// stays public.
pub fn router() -> Router<AppState> {
    Router::new().route(
        "/photo-order",
        get(photo_order::get_photo_order).post(photo_order::set_photo_order),
    )
}
