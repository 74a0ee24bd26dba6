//! Cadence Storage
//!
//! `SQLite` catalog layer for Cadence.
//!
//! This crate stores albums and tracks and keeps the two derived columns the
//! rest of the system reads without re-checking: `is_active` (has the release
//! date passed?) and `albums.total_tracks`.
//!
//! # Architecture
//!
//! - **Vertical Slicing**: `albums` and `tracks` own their row-level queries
//! - **Aggregates**: track counters are recomputed from the rows, never
//!   incremented
//! - **Release**: one predicate-based sweep activates everything whose date
//!   has passed
//! - **Catalog**: [`LocalCatalog`] is the only place mutations happen; it runs
//!   each write and its side effects in one transaction
//!
//! # Example
//!
//! ```rust,no_run
//! use cadence_core::{CatalogStore, SystemClock};
//! use cadence_storage::{create_pool, run_migrations, LocalCatalog};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = create_pool("sqlite://cadence.db").await?;
//! run_migrations(&pool).await?;
//!
//! let catalog = LocalCatalog::new(pool, Arc::new(SystemClock));
//! let albums = catalog.get_active_albums().await?;
//! # Ok(())
//! # }
//! ```

mod catalog;
mod error;

// Vertical slices
pub mod albums;
pub mod tracks;

// Derived state
pub mod aggregates;
pub mod release;

pub use catalog::LocalCatalog;
pub use error::{Result, StorageError};

use sqlx::migrate::Migrator;
use sqlx::sqlite::SqlitePool;

// Embed migrations into binary
static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Run database migrations
///
/// This should be called once when the application starts to ensure
/// the database schema is up to date.
///
/// # Errors
///
/// Returns an error if migrations fail to run
pub async fn run_migrations(pool: &SqlitePool) -> Result<()> {
    MIGRATOR.run(pool).await?;
    Ok(())
}

/// Create a new `SQLite` pool
///
/// # Arguments
///
/// * `database_url` - `SQLite` connection string (e.g., `<sqlite://cadence.db>`)
///
/// # Errors
///
/// Returns an error if the connection fails
pub async fn create_pool(database_url: &str) -> Result<SqlitePool> {
    use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
    use std::str::FromStr;

    tracing::debug!(database_url, "Creating SQLite pool");

    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(std::time::Duration::from_secs(30))
        // Tracks may only point at albums that exist
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    tracing::info!("SQLite pool ready");

    Ok(pool)
}

/// Begin a transaction that takes the write lock up front
///
/// Mutations read before they write. A deferred transaction fails with
/// `SQLITE_BUSY` when it cannot upgrade to a writer, without waiting out the
/// busy timeout, so writers queue on `BEGIN` instead.
pub(crate) async fn begin_write(
    pool: &SqlitePool,
) -> Result<sqlx::Transaction<'static, sqlx::Sqlite>> {
    Ok(pool.begin_with("BEGIN IMMEDIATE").await?)
}

/// Encode a timestamp the way `release_date` columns store it
pub(crate) fn to_millis(at: chrono::DateTime<chrono::Utc>) -> i64 {
    at.timestamp_millis()
}

/// Read back a `release_date` column
pub(crate) fn from_millis(
    column: &'static str,
    value: i64,
) -> Result<chrono::DateTime<chrono::Utc>> {
    chrono::DateTime::from_timestamp_millis(value)
        .ok_or(StorageError::InvalidTimestamp { column, value })
}
