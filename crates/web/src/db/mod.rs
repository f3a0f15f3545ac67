//! Database operations for the Fyay `SQLite` store.
//!
//! # Tables
//!
//! - `users` - Accounts (site authentication and roles)
//! - `events` - Events created by administrators
//! - `purchases` - Bookings of hours against an event
//! - `inventory` - Consumable products on hand
//! - `inventory_transactions` - Ledger of stock reserved by events and received by orders
//! - `orders` - Stock purchase records
//! - `tower_sessions` - Tower-sessions storage (created by the session store)
//!
//! # Schema
//!
//! Tables are created idempotently by [`schema::create_tables`], run via:
//! ```bash
//! cargo run -p fyay-cli -- migrate
//! ```

pub mod events;
pub mod inventory;
pub mod orders;
pub mod purchases;
pub mod schema;
pub mod users;

use std::str::FromStr;
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use thiserror::Error;

pub use events::EventRepository;
pub use inventory::InventoryRepository;
pub use orders::OrderRepository;
pub use purchases::PurchaseRepository;
pub use users::UserRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique email).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Map unique-constraint violations to `RepositoryError::Conflict`.
pub(crate) fn map_unique_violation(e: sqlx::Error, what: &str) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = e
        && db_err.is_unique_violation()
    {
        return RepositoryError::Conflict(format!("{what} already exists"));
    }
    RepositoryError::Database(e)
}

/// Create a `SQLite` connection pool.
///
/// Foreign keys are enforced on every connection, file databases use WAL
/// journaling, and `timeout` bounds both pool acquisition and the time a
/// statement waits on a locked database.
///
/// In-memory databases exist per connection, so they get a single pooled
/// connection that is never recycled.
///
/// # Errors
///
/// Returns `sqlx::Error` if the URL is invalid or the connection cannot be established.
pub async fn create_pool(
    database_url: &SecretString,
    timeout: Duration,
) -> Result<SqlitePool, sqlx::Error> {
    let url = database_url.expose_secret();
    let options = SqliteConnectOptions::from_str(url)?
        .foreign_keys(true)
        .busy_timeout(timeout);

    if is_memory_url(url) {
        return SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .acquire_timeout(timeout)
            .connect_with(options)
            .await;
    }

    SqlitePoolOptions::new()
        .max_connections(10)
        .min_connections(1)
        .acquire_timeout(timeout)
        .connect_with(options.journal_mode(SqliteJournalMode::Wal))
        .await
}

fn is_memory_url(url: &str) -> bool {
    url.contains(":memory:") || url.contains("mode=memory")
}
