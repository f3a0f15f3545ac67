//! Administrator account commands.
//!
//! # Usage
//!
//! ```bash
//! # Create a new administrator
//! fyay-cli admin create -e admin@example.com -n "Admin Name" -p secret-password
//!
//! # Promote an existing account
//! fyay-cli admin promote -e user@example.com
//! ```

use fyay_core::{Email, UserId, UserRole};
use fyay_web::db::{RepositoryError, UserRepository};
use fyay_web::services::auth::{AuthError, AuthService};
use thiserror::Error;

use super::{ConnectError, connect};

/// Errors that can occur during admin operations.
#[derive(Debug, Error)]
pub enum AdminError {
    /// Store could not be opened.
    #[error(transparent)]
    Connect(#[from] ConnectError),

    /// Submitted fields failed validation.
    #[error("Invalid input: {}", .0.join(" "))]
    Invalid(Vec<String>),

    /// User already exists.
    #[error("A user already exists with email: {0}")]
    UserExists(String),

    /// No user with that email.
    #[error("No user found with email: {0}")]
    UserNotFound(String),

    /// Account creation failed.
    #[error("Failed to create account: {0}")]
    Auth(AuthError),

    /// Database error.
    #[error("Database error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Create a new administrator account.
///
/// Fields are validated exactly as on the registration page.
///
/// # Errors
///
/// Returns `AdminError::Invalid` for bad input and `AdminError::UserExists`
/// if the email is taken.
pub async fn create_user(email: &str, name: &str, password: &str) -> Result<UserId, AdminError> {
    let pool = connect().await?;

    tracing::info!("Creating admin user: {}", email);

    let user = AuthService::new(&pool)
        .create_account(name, email, password, UserRole::Admin)
        .await
        .map_err(|e| match e {
            AuthError::Validation(messages) => AdminError::Invalid(messages),
            AuthError::UserAlreadyExists => AdminError::UserExists(email.to_owned()),
            other => AdminError::Auth(other),
        })?;

    tracing::info!(
        "Admin user created successfully! ID: {}, Email: {}",
        user.id,
        user.email
    );
    Ok(user.id)
}

/// Grant the admin role to an existing account.
///
/// # Errors
///
/// Returns `AdminError::UserNotFound` if no account has that email.
pub async fn promote(email: &str) -> Result<(), AdminError> {
    let parsed = Email::parse(email.trim())
        .map_err(|_| AdminError::Invalid(vec!["Invalid email format.".to_owned()]))?;

    let pool = connect().await?;

    UserRepository::new(&pool)
        .set_role(&parsed, UserRole::Admin)
        .await
        .map_err(|e| match e {
            RepositoryError::NotFound => AdminError::UserNotFound(email.to_owned()),
            other => AdminError::Repository(other),
        })?;

    tracing::info!("{} is now an administrator", parsed);
    Ok(())
}
