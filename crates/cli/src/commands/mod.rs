//! CLI subcommand implementations.

pub mod admin;
pub mod migrate;

use fyay_web::config::{AppConfig, ConfigError};
use fyay_web::db;
use sqlx::SqlitePool;

/// Load configuration from the environment and open the store.
async fn connect() -> Result<SqlitePool, ConnectError> {
    let config = AppConfig::from_env()?;
    tracing::info!("Connecting to database...");
    Ok(db::create_pool(&config.database_url, config.db_timeout).await?)
}

/// Errors opening the store.
#[derive(Debug, thiserror::Error)]
pub enum ConnectError {
    /// Configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Database connection error.
    #[error("Database connection error: {0}")]
    Database(#[from] sqlx::Error),
}
