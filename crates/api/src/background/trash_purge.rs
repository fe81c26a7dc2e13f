//! Periodic purge of expired trash.
//!
//! Deletes trash items past the retention window on a fixed interval using
//! `tokio::time::interval`. The first tick fires immediately, so anything
//! that expired while the server was down goes on startup.

use std::sync::Arc;
use std::time::Duration;

use lodge_core::trash::{TrashService, TRASH_RETENTION_DAYS};
use tokio_util::sync::CancellationToken;

/// Run the trash purge loop until `cancel` is triggered.
///
/// Failures are logged and retried on the next tick.
pub async fn run(trash: Arc<TrashService>, every: Duration, cancel: CancellationToken) {
    tracing::info!(
        retention_days = TRASH_RETENTION_DAYS,
        interval_secs = every.as_secs(),
        "Trash purge job started"
    );

    let mut interval = tokio::time::interval(every);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Trash purge job stopping");
                break;
            }
            _ = interval.tick() => {
                match trash.purge_expired().await {
                    Ok(purged) => {
                        if purged > 0 {
                            tracing::info!(purged, "Trash purge: removed expired items");
                        } else {
                            tracing::debug!("Trash purge: nothing expired");
                        }
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Trash purge: cleanup failed");
                    }
                }
            }
        }
    }
}
