//! Handlers for `/admin/auth` (login, logout).

use axum::extract::State;
use axum::http::header::SET_COOKIE;
use axum::response::{AppendHeaders, IntoResponse};
use axum::Json;
use lodge_core::error::CoreError;
use serde::{Deserialize, Serialize};

use crate::auth::cookie::{clear_session_cookie, session_cookie};
use crate::auth::jwt::generate_session_token;
use crate::auth::password::verify_password;
use crate::error::{AppError, AppResult};
use crate::response::OkResponse;
use crate::state::AppState;

/// Request body for `POST /admin/auth`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    /// Same token as the cookie, for non-browser clients.
    pub token: String,
}

fn invalid_credentials() -> AppError {
    AppError::Core(CoreError::Unauthorized("Invalid credentials".into()))
}

/// POST /api/admin/auth
///
/// Check the admin credentials and start a session cookie.
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<impl IntoResponse> {
    let Some((username, password_hash)) = state.config.admin.credentials() else {
        tracing::warn!("Admin login attempted but ADMIN_USERNAME/ADMIN_PASSWORD_HASH are not set");
        return Err(invalid_credentials());
    };

    // Always hashed: a wrong username must not answer faster than a wrong
    // password.
    let password_valid = verify_password(&input.password, password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;

    if !password_valid || input.username != username {
        tracing::warn!(username = %input.username, "Rejected admin login");
        return Err(invalid_credentials());
    }

    let jwt = &state.config.admin.jwt;
    let token = generate_session_token(username, jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    tracing::info!(username, "Admin logged in");
    Ok((
        AppendHeaders([(SET_COOKIE, session_cookie(&token, jwt.session_max_age_secs()))]),
        Json(OkResponse::new(LoginResponse { token })),
    ))
}

/// DELETE /api/admin/auth
///
/// Clear the session cookie. Tokens are stateless, so a copied token
/// stays valid until it expires.
pub async fn logout() -> impl IntoResponse {
    (
        AppendHeaders([(SET_COOKIE, clear_session_cookie())]),
        Json(OkResponse::empty()),
    )
}
