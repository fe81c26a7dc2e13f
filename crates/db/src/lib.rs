//! Primary store for photo orders and trash items (PostgreSQL).
//!
//! - [`models`] -- row structs matching the tables.
//! - [`repositories`] -- zero-sized repos with async query methods.
//! - [`store`] -- the `lodge-core` store traits implemented on a pool.

use std::time::Duration;

use sqlx::postgres::PgPoolOptions;

pub mod models;
pub mod repositories;
pub mod store;

pub use store::{PgOrderStore, PgTrashStore};

pub type DbPool = sqlx::PgPool;

/// How long a query waits for a connection before the call fails.
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

/// Idle connections are closed quickly so an outage does not leave stale
/// connections behind in the pool.
const IDLE_TIMEOUT: Duration = Duration::from_secs(30);

/// Create a connection pool from a database URL.
///
/// The pool connects lazily: no connection is opened until the first
/// query, so the server starts even when the database is down and every
/// query acquires and releases its own connection.
pub fn create_pool(database_url: &str, max_connections: u32) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .min_connections(0)
        .acquire_timeout(ACQUIRE_TIMEOUT)
        .idle_timeout(IDLE_TIMEOUT)
        .connect_lazy(database_url)
}

/// Run a trivial query to verify the database is reachable.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply pending migrations from `db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../../db/migrations").run(pool).await
}
