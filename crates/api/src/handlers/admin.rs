//! Back-office maintenance: schema migration and fallback import.

use axum::extract::State;
use axum::Json;
use lodge_core::error::CoreError;
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AdminSession;
use crate::response::OkResponse;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct MigrateResponse {
    /// Property slugs copied from the fallback document.
    pub imported: Vec<String>,
    /// Document keys that were not valid orders.
    pub skipped: Vec<String>,
    /// Trash items moved from the fallback document into the primary.
    pub trash_imported: u64,
}

/// POST /api/admin/migrate
///
/// Apply pending primary migrations, then copy every order saved in the
/// fallback document while the primary was away into the primary and move
/// the fallback's trash items over.
pub async fn migrate(
    State(state): State<AppState>,
    admin: AdminSession,
) -> AppResult<Json<OkResponse<MigrateResponse>>> {
    let pool = state.pool.as_ref().ok_or_else(|| {
        AppError::Core(CoreError::StorageUnavailable(
            "DATABASE_URL is not configured".into(),
        ))
    })?;

    lodge_db::run_migrations(pool)
        .await
        .map_err(|e| AppError::Core(CoreError::StorageUnavailable(format!("migrations: {e}"))))?;
    tracing::info!(admin = %admin.username, "Database migrations applied");

    let report = state.photo_orders.import_from_fallback().await?;
    tracing::info!(
        imported = report.imported.len(),
        skipped = report.skipped.len(),
        "Fallback orders imported"
    );

    let trash_imported = state.trash.import_from_fallback().await?;

    Ok(Json(OkResponse::new(MigrateResponse {
        imported: report.imported,
        skipped: report.skipped,
        trash_imported,
    })))
}
