//! Handlers for `/photo-order`.
//!
//! Reads are public: the site renders galleries from them. Writes come
//! from the back-office photo manager and require an admin session.

use std::collections::BTreeMap;

use axum::extract::{Query, State};
use axum::Json;
use lodge_core::fallback::Backend;
use lodge_core::photo_order::{PhotoOrderEntry, ALL_PROPERTIES};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AdminSession;
use crate::response::OkResponse;
use crate::state::AppState;

/// Shown to editors when a save could not be version-checked.
pub const FALLBACK_WRITE_WARNING: &str =
    "Saved to backup storage. Edits made elsewhere at the same time may have been overwritten.";

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct PhotoOrderQuery {
    pub property: Option<String>,
}

/// Request body for `POST /photo-order`.
#[derive(Debug, Deserialize)]
pub struct SetOrderRequest {
    pub property: Option<String>,
    pub images: Option<Vec<PhotoOrderEntry>>,
    /// Version the editor loaded. Omit for a first save.
    pub version: Option<i32>,
}

/// Either one property's order or every property's.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum PhotoOrderResponse {
    One {
        images: Option<Vec<PhotoOrderEntry>>,
        #[serde(skip_serializing_if = "Option::is_none")]
        version: Option<i32>,
    },
    All {
        orders: BTreeMap<String, Vec<PhotoOrderEntry>>,
    },
}

#[derive(Debug, Serialize)]
pub struct SetOrderResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<i32>,
    pub storage: Backend,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<&'static str>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/photo-order?property=<slug|_all>
pub async fn get_photo_order(
    State(state): State<AppState>,
    Query(params): Query<PhotoOrderQuery>,
) -> AppResult<Json<PhotoOrderResponse>> {
    let property = params
        .property
        .filter(|p| !p.is_empty())
        .ok_or_else(|| AppError::BadRequest("Missing property param".into()))?;

    if property == ALL_PROPERTIES {
        let orders = state.photo_orders.get_all_orders().await?;
        return Ok(Json(PhotoOrderResponse::All { orders }));
    }

    let response = match state.photo_orders.get_order(&property).await? {
        Some(snapshot) => PhotoOrderResponse::One {
            images: Some(snapshot.entries),
            version: snapshot.version,
        },
        None => PhotoOrderResponse::One {
            images: None,
            version: None,
        },
    };
    Ok(Json(response))
}

/// POST /api/photo-order
///
/// Saves a property's order. With `version` the save only applies if
/// nobody else saved since that version was loaded; otherwise 409.
///
/// Unlike the public read, saving requires an admin session even though
/// the path sits outside `/api/admin`.
pub async fn set_photo_order(
    State(state): State<AppState>,
    admin: AdminSession,
    Json(input): Json<SetOrderRequest>,
) -> AppResult<Json<OkResponse<SetOrderResponse>>> {
    let (Some(property), Some(images)) = (input.property.filter(|p| !p.is_empty()), input.images)
    else {
        return Err(AppError::BadRequest("Missing property or images".into()));
    };

    let write = state
        .photo_orders
        .set_order(&property, &images, input.version)
        .await?;

    tracing::info!(
        admin = %admin.username,
        property = %property,
        images = images.len(),
        version = ?write.version,
        storage = write.backend.as_str(),
        "Photo order saved"
    );

    let warning = (write.backend == Backend::Fallback).then_some(FALLBACK_WRITE_WARNING);
    Ok(Json(OkResponse::new(SetOrderResponse {
        version: write.version,
        storage: write.backend,
        warning,
    })))
}
