//! Schema setup command.
//!
//! # Usage
//!
//! ```bash
//! fyay-cli migrate
//! ```
//!
//! # Environment Variables
//!
//! - `FYAY_DATABASE_URL` (or `DATABASE_URL`) - `SQLite` connection string,
//!   default `sqlite://fyay.db?mode=rwc`
//!
//! Every statement is `CREATE ... IF NOT EXISTS`, so running this against an
//! existing database leaves its data untouched.

use fyay_web::db::schema;
use thiserror::Error;
use tower_sessions_sqlx_store::SqliteStore;

use super::{ConnectError, connect};

/// Errors that can occur while creating the schema.
#[derive(Debug, Error)]
pub enum MigrationError {
    /// Store could not be opened.
    #[error(transparent)]
    Connect(#[from] ConnectError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Create the application tables and the session table.
///
/// # Errors
///
/// Returns `MigrationError` if the store cannot be opened or a statement fails.
pub async fn run() -> Result<(), MigrationError> {
    let pool = connect().await?;

    tracing::info!("Creating application tables...");
    schema::create_tables(&pool).await?;

    tracing::info!("Creating session table...");
    SqliteStore::new(pool.clone()).migrate().await?;

    tracing::info!("Migrations complete!");
    Ok(())
}
