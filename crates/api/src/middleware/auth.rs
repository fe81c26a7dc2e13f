//! Admin session extractor for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use lodge_core::error::CoreError;

use crate::auth::cookie::session_token;
use crate::auth::jwt::{validate_token, ADMIN_ROLE};
use crate::error::AppError;
use crate::state::AppState;

/// Authenticated admin, from the `admin-session` cookie or an
/// `Authorization: Bearer` header.
///
/// Use this as an extractor parameter in any handler that requires the
/// back-office session:
///
/// ```ignore
/// async fn my_handler(admin: AdminSession) -> AppResult<Json<()>> {
///     tracing::info!(admin = %admin.username, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AdminSession {
    pub username: String,
}

impl FromRequestParts<AppState> for AdminSession {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let bearer = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "));

        let token = bearer
            .or_else(|| session_token(&parts.headers))
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized("Admin session required".into()))
            })?;

        let claims = validate_token(token, &state.config.admin.jwt).map_err(|_| {
            AppError::Core(CoreError::Unauthorized("Invalid or expired session".into()))
        })?;

        if claims.role != ADMIN_ROLE {
            return Err(AppError::Core(CoreError::Unauthorized(
                "Admin session required".into(),
            )));
        }

        Ok(AdminSession {
            username: claims.sub,
        })
    }
}
