//! Photo upload forwarding.

use axum::extract::multipart::MultipartError;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::Json;
use lodge_core::photo_order::validate_property_slug;
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::media::UploadFile;
use crate::middleware::auth::AdminSession;
use crate::response::OkResponse;
use crate::state::AppState;

/// Largest accepted upload request body.
pub const MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub urls: Vec<String>,
}

fn invalid_multipart(err: MultipartError) -> AppError {
    AppError::BadRequest(format!("Invalid multipart body: {err}"))
}

/// POST /api/admin/upload
///
/// Multipart form with a `property` field and one or more `files` (or
/// `files[]`) parts. The files are forwarded to the media host; the
/// response lists their public URLs so the caller can append them to the
/// property's order.
pub async fn upload(
    State(state): State<AppState>,
    admin: AdminSession,
    mut multipart: Multipart,
) -> AppResult<Json<OkResponse<UploadResponse>>> {
    let mut property = None;
    let mut files = Vec::new();

    while let Some(field) = multipart.next_field().await.map_err(invalid_multipart)? {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("property") => {
                property = Some(field.text().await.map_err(invalid_multipart)?);
            }
            Some("files") | Some("files[]") => {
                let file_name = field.file_name().unwrap_or("upload").to_string();
                let content_type = field.content_type().map(str::to_string);
                let bytes = field.bytes().await.map_err(invalid_multipart)?;
                files.push(UploadFile {
                    file_name,
                    content_type,
                    bytes: bytes.to_vec(),
                });
            }
            _ => {}
        }
    }

    let property = match property {
        Some(property) if !property.is_empty() && !files.is_empty() => property,
        _ => return Err(AppError::BadRequest("Missing property or files".into())),
    };
    validate_property_slug(&property)?;

    let media = state.media.as_ref().ok_or_else(|| AppError::Upstream {
        status: StatusCode::SERVICE_UNAVAILABLE,
        message: "Photo upload is not configured".into(),
    })?;

    tracing::info!(admin = %admin.username, property = %property, files = files.len(), "Forwarding photo upload");
    let urls = media.upload(&property, files).await?;

    Ok(Json(OkResponse::new(UploadResponse { urls })))
}
