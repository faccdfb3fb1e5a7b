//! SQLite persistence for Bookshelf: pool factory, migration runner, and the
//! generic entity repository.

use std::str::FromStr;
use std::time::Duration;

use bookshelf_kernel::settings::DatabaseSettings;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use thiserror::Error;

pub mod migrate;
pub mod repository;

pub use migrate::run_migrations;
pub use repository::{Change, Entity, Repository, SqlRepository};
pub use sqlx::{Error as SqlxError, SqlitePool};

pub type Result<T, E = DbError> = std::result::Result<T, E>;

/// Errors raised by the persistence layer.
#[derive(Debug, Error)]
pub enum DbError {
    #[error("database operation failed")]
    Query(#[from] sqlx::Error),

    #[error("migration {module}/{id} failed")]
    Migration {
        module: String,
        id: String,
        #[source]
        source: sqlx::Error,
    },
}

/// Open a connection pool for the configured database.
///
/// Foreign keys are enforced on every connection; book rows may only point at
/// authors that exist.
pub async fn connect(settings: &DatabaseSettings) -> Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(&settings.url)?
        .create_if_missing(true)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(settings.max_connections)
        .acquire_timeout(Duration::from_secs(5))
        .connect_with(options)
        .await?;

    tracing::info!(
        target: "bookshelf-db",
        url = %settings.url,
        max_connections = settings.max_connections,
        "database pool ready"
    );

    Ok(pool)
}

/// Single-connection in-memory pool.
///
/// Every SQLite connection to `:memory:` sees its own database, so the pool
/// is pinned to one connection that never expires.
pub async fn connect_in_memory() -> Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await?;

    Ok(pool)
}
