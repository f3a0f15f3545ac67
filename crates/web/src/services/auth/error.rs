//! Authentication error types.

use thiserror::Error;

use crate::db::RepositoryError;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Submitted fields failed validation; each message is shown to the user.
    #[error("validation failed: {}", .0.join(" "))]
    Validation(Vec<String>),

    /// Invalid credentials (wrong password or user not found).
    #[error("invalid credentials")]
    InvalidCredentials,

    /// User already exists.
    #[error("user already exists")]
    UserAlreadyExists,

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),

    /// Password hashing error.
    #[error("password hashing error")]
    PasswordHash,
}

impl AuthError {
    /// Messages to flash for this error, or `None` for internal failures.
    #[must_use]
    pub fn user_messages(&self) -> Option<Vec<String>> {
        match self {
            Self::Validation(messages) => Some(messages.clone()),
            Self::InvalidCredentials => Some(vec!["Invalid email or password.".to_string()]),
            Self::UserAlreadyExists => Some(vec!["Email already registered.".to_string()]),
            Self::Repository(_) | Self::PasswordHash => None,
        }
    }
}
