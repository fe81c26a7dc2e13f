#![allow(dead_code)]

use std::sync::{Arc, OnceLock};
use std::time::Duration;

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{Method, Request, Response, StatusCode};
use axum::Router;
use chrono::{TimeZone, Utc};
use http_body_util::BodyExt;
use lodge_api::auth::password::hash_password;
use lodge_api::config::ServerConfig;
use lodge_api::media::MediaClient;
use lodge_api::router::build_app_router;
use lodge_api::state::AppState;
use lodge_core::clock::ManualClock;
use lodge_db::DbPool;
use lodge_docstore::MemoryDocument;
use tower::ServiceExt;

pub const ADMIN_USERNAME: &str = "owner";
pub const ADMIN_PASSWORD: &str = "correct-horse-battery-staple";

/// Argon2 is slow on purpose; hash the test password once per test binary.
fn admin_password_hash() -> &'static str {
    static HASH: OnceLock<String> = OnceLock::new();
    HASH.get_or_init(|| hash_password(ADMIN_PASSWORD).expect("hashing should succeed"))
}

/// Build a test `ServerConfig` with safe defaults and a known admin
/// account.
pub fn test_config() -> ServerConfig {
    ServerConfig::from_lookup(|key| match key {
        "HOST" => Some("127.0.0.1".into()),
        "PORT" => Some("0".into()),
        "ADMIN_USERNAME" => Some(ADMIN_USERNAME.into()),
        "ADMIN_PASSWORD_HASH" => Some(admin_password_hash().into()),
        "ADMIN_JWT_SECRET" => Some("test-secret-that-is-long-enough-for-hmac".into()),
        _ => None,
    })
    .expect("test config should be valid")
}

/// Handles to everything a test may want to poke at besides the router.
pub struct TestApp {
    pub router: Router,
    pub document: Arc<MemoryDocument>,
    pub clock: Arc<ManualClock>,
}

/// Build the full application with no primary database: every request is
/// served by an in-memory fallback document.
pub fn build_test_app() -> TestApp {
    build_with_pool(None)
}

/// Build the full application over a real primary pool, with an
/// in-memory fallback document behind it.
pub fn build_test_app_with_pool(pool: DbPool) -> TestApp {
    build_with_pool(Some(pool))
}

/// Build the application without a database and with photo uploads
/// forwarded to the media host at `base_url`.
pub fn build_test_app_with_media(base_url: &str, secret: &str) -> TestApp {
    let media = MediaClient::new(base_url, secret.to_string(), Duration::from_secs(5))
        .expect("media client should build");
    build(None, Some(media))
}

fn build_with_pool(pool: Option<DbPool>) -> TestApp {
    build(pool, None)
}

fn build(pool: Option<DbPool>, media: Option<MediaClient>) -> TestApp {
    let document = Arc::new(MemoryDocument::new());
    let clock = Arc::new(ManualClock::at(
        Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap(),
    ));
    let mut state = AppState::new(test_config(), pool, document.clone(), clock.clone());
    if let Some(media) = media {
        state = state.with_media(media);
    }

    TestApp {
        router: build_app_router(state),
        document,
        clock,
    }
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn send(app: &Router, request: Request<Body>) -> Response<Body> {
    app.clone().oneshot(request).await.unwrap()
}

pub async fn get(app: &Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn get_auth(app: &Router, uri: &str, token: &str) -> Response<Body> {
    let request = Request::builder()
        .uri(uri)
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn post_json(app: &Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn post_json_auth(
    app: &Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Log in as the test admin and return the session token.
pub async fn login(app: &Router) -> String {
    let body = serde_json::json!({ "username": ADMIN_USERNAME, "password": ADMIN_PASSWORD });
    let response = post_json(app, "/api/admin/auth", body).await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await["token"]
        .as_str()
        .expect("login must return a token")
        .to_string()
}
