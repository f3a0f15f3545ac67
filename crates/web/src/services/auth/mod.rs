//! Authentication service.
//!
//! Password registration and login. Passwords are stored only as Argon2id
//! PHC strings.

mod error;

pub use error::AuthError;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use sqlx::SqlitePool;

use fyay_core::{Email, UserRole};

use crate::db::RepositoryError;
use crate::db::users::UserRepository;
use crate::models::User;

/// Minimum password length.
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Authentication service.
pub struct AuthService<'a> {
    users: UserRepository<'a>,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self {
            users: UserRepository::new(pool),
        }
    }

    // =========================================================================
    // Password Authentication
    // =========================================================================

    /// Register a new account with the `user` role.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Validation` with every failed field check.
    /// Returns `AuthError::UserAlreadyExists` if the email is already registered.
    pub async fn register(
        &self,
        full_name: &str,
        email: &str,
        password: &str,
    ) -> Result<User, AuthError> {
        self.create_account(full_name, email, password, UserRole::User)
            .await
    }

    /// Create an account with an explicit role.
    ///
    /// Validation is identical to [`Self::register`].
    ///
    /// # Errors
    ///
    /// Same as [`Self::register`].
    pub async fn create_account(
        &self,
        full_name: &str,
        email: &str,
        password: &str,
        role: UserRole,
    ) -> Result<User, AuthError> {
        let mut errors = Vec::new();

        let full_name = full_name.trim();
        if full_name.is_empty() {
            errors.push("Full Name is required.".to_string());
        }
        let email = check_email(email, &mut errors);
        let password = password.trim();
        if password.is_empty() {
            errors.push("Password is required.".to_string());
        } else if password.chars().count() < MIN_PASSWORD_LENGTH {
            errors.push(format!(
                "Password must be at least {MIN_PASSWORD_LENGTH} characters long."
            ));
        }

        let email = match email {
            Some(email) if errors.is_empty() => email,
            _ => return Err(AuthError::Validation(errors)),
        };

        let password_hash = hash_password(password)?;

        let user = self
            .users
            .create(full_name, &email, &password_hash, role)
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::UserAlreadyExists,
                other => AuthError::Repository(other),
            })?;

        tracing::info!(user_id = %user.id, role = %user.role, "Account created");
        Ok(user)
    }

    /// Login with email and password.
    ///
    /// An unknown email and a wrong password fail identically.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Validation` if a field is blank or the email is malformed.
    /// Returns `AuthError::InvalidCredentials` if the email/password is wrong.
    pub async fn login(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let mut errors = Vec::new();
        let email = check_email(email, &mut errors);
        let password = password.trim();
        if password.is_empty() {
            errors.push("Password is required.".to_string());
        }
        let email = match email {
            Some(email) if errors.is_empty() => email,
            _ => return Err(AuthError::Validation(errors)),
        };

        let (user, password_hash) = self
            .users
            .get_password_hash(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        verify_password(password, &password_hash)?;

        Ok(user)
    }
}

/// Parse the email field, pushing the matching message on failure.
fn check_email(raw: &str, errors: &mut Vec<String>) -> Option<Email> {
    let raw = raw.trim();
    if raw.is_empty() {
        errors.push("Email is required.".to_string());
        return None;
    }
    match Email::parse(raw) {
        Ok(email) => Some(email),
        Err(_) => {
            errors.push("Invalid email format.".to_string());
            None
        }
    }
}

/// Hash a password using Argon2id.
fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}
