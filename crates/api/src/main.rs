use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use lodge_core::clock::SystemClock;
use lodge_docstore::{DocumentBackend, JsonBlobClient, MemoryDocument};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use lodge_api::background;
use lodge_api::config::ServerConfig;
use lodge_api::media::MediaClient;
use lodge_api::router::build_app_router;
use lodge_api::state::AppState;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lodge_api=debug,lodge_core=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env().expect("Invalid server configuration");
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Primary database ---
    // The pool connects lazily, so an unreachable database at startup only
    // means requests fall through to the fallback document.
    let pool = match &config.database_url {
        Some(url) => {
            let pool = lodge_db::create_pool(url, config.db_max_connections)
                .expect("Invalid DATABASE_URL");
            match lodge_db::run_migrations(&pool).await {
                Ok(()) => tracing::info!("Database migrations applied"),
                Err(e) => tracing::warn!(error = %e, "Database unavailable at startup, serving from fallback"),
            }
            Some(pool)
        }
        None => {
            tracing::warn!("DATABASE_URL not set, serving from the fallback document only");
            None
        }
    };

    // --- Fallback document ---
    let document: Arc<dyn DocumentBackend> = match &config.fallback_document_url {
        Some(url) => Arc::new(
            JsonBlobClient::new(url.clone(), Duration::from_secs(config.fallback_timeout_secs))
                .expect("Failed to build fallback document client"),
        ),
        None => {
            tracing::warn!("FALLBACK_DOCUMENT_URL not set, using an in-memory fallback document");
            Arc::new(MemoryDocument::new())
        }
    };

    // --- App state ---
    let mut state = AppState::new(config.clone(), pool, document, Arc::new(SystemClock));

    // --- Media uploads ---
    match config.media.upload_target() {
        Some((base_url, secret)) => {
            let media = MediaClient::new(
                base_url,
                secret.to_string(),
                Duration::from_secs(config.media.upload_timeout_secs),
            )
            .expect("Failed to build media upload client");
            tracing::info!(upload_url = %media.upload_url(), "Photo uploads enabled");
            state = state.with_media(media);
        }
        None => tracing::warn!("MEDIA_BASE_URL not set, photo uploads are disabled"),
    }

    // --- Trash purge job ---
    let purge_cancel = CancellationToken::new();
    let purge_handle = tokio::spawn(background::trash_purge::run(
        Arc::clone(&state.trash),
        Duration::from_secs(config.trash_purge_interval_secs),
        purge_cancel.clone(),
    ));

    // --- Router ---
    let app = build_app_router(state);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, cleaning up");

    purge_cancel.cancel();
    let _ = tokio::time::timeout(Duration::from_secs(5), purge_handle).await;
    tracing::info!("Trash purge job stopped");

    tracing::info!("Graceful shutdown complete");
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
