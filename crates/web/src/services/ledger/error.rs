//! Ledger error types.

use thiserror::Error;

use crate::db::RepositoryError;

/// Errors that can occur during inventory ledger operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// The request failed validation; nothing was written.
    #[error("validation failed: {}", .0.join(" "))]
    Validation(Vec<String>),

    /// The referenced event does not exist.
    #[error("event not found")]
    NotFound,

    /// Repository/database error; the transaction was rolled back.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

impl From<sqlx::Error> for LedgerError {
    fn from(e: sqlx::Error) -> Self {
        Self::Repository(RepositoryError::Database(e))
    }
}
