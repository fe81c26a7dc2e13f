//! Handlers for the back-office photo trash.
//!
//! Removing a photo from an order records it here; it can be restored
//! (the caller re-adds it to the order) or purged. Items older than the
//! retention window are purged on request and by the background job.

use axum::extract::State;
use axum::Json;
use lodge_core::trash::TrashItem;
use lodge_core::types::DbId;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AdminSession;
use crate::response::{Empty, OkResponse};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct TrashListResponse {
    pub trash: Vec<TrashItem>,
}

/// Request body for `POST /admin/trash-purge`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurgeRequest {
    pub id: Option<DbId>,
    #[serde(default)]
    pub purge_expired: bool,
}

#[derive(Debug, Serialize)]
pub struct PurgeResponse {
    pub purged: u64,
}

/// Request body for `POST /admin/trash-restore`.
#[derive(Debug, Deserialize)]
pub struct RestoreRequest {
    pub id: Option<DbId>,
}

/// Request body for `POST /admin/trash-add`.
#[derive(Debug, Deserialize)]
pub struct AddToTrashRequest {
    pub property: Option<String>,
    pub src: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AddToTrashResponse {
    pub item: TrashItem,
}

/// GET /api/admin/trash
///
/// Every trashed photo, most recently deleted first.
pub async fn list_trash(
    State(state): State<AppState>,
    _admin: AdminSession,
) -> AppResult<Json<TrashListResponse>> {
    let trash = state.trash.list_trash().await?;
    Ok(Json(TrashListResponse { trash }))
}

/// POST /api/admin/trash-purge
///
/// `purgeExpired: true` removes everything past retention and takes
/// precedence over `id`, which removes a single item.
pub async fn purge(
    State(state): State<AppState>,
    admin: AdminSession,
    Json(input): Json<PurgeRequest>,
) -> AppResult<Json<OkResponse<PurgeResponse>>> {
    let purged = if input.purge_expired {
        state.trash.purge_expired().await?
    } else if let Some(id) = input.id {
        u64::from(state.trash.remove_from_trash(id).await?)
    } else {
        return Err(AppError::BadRequest("Nothing to purge".into()));
    };

    tracing::info!(admin = %admin.username, purged, "Trash purged");
    Ok(Json(OkResponse::new(PurgeResponse { purged })))
}

/// POST /api/admin/trash-restore
///
/// Drops the trash record only. Restoring an id that is already gone
/// still succeeds.
pub async fn restore(
    State(state): State<AppState>,
    admin: AdminSession,
    Json(input): Json<RestoreRequest>,
) -> AppResult<Json<OkResponse<Empty>>> {
    let id = input
        .id
        .ok_or_else(|| AppError::BadRequest("Missing id".into()))?;

    let removed = state.trash.remove_from_trash(id).await?;
    tracing::info!(admin = %admin.username, id, removed, "Trash item restored");
    Ok(Json(OkResponse::empty()))
}

/// POST /api/admin/trash-add
pub async fn add(
    State(state): State<AppState>,
    _admin: AdminSession,
    Json(input): Json<AddToTrashRequest>,
) -> AppResult<Json<OkResponse<AddToTrashResponse>>> {
    let (Some(property), Some(src)) = (
        input.property.filter(|p| !p.is_empty()),
        input.src.filter(|s| !s.is_empty()),
    ) else {
        return Err(AppError::BadRequest("Missing property or src".into()));
    };

    let item = state.trash.add_to_trash(&property, &src).await?;
    Ok(Json(OkResponse::new(AddToTrashResponse { item })))
}
