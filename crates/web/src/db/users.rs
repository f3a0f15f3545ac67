//! User repository for database operations.

use chrono::NaiveDateTime;
use sqlx::SqlitePool;

use fyay_core::{Email, UserId, UserRole};

use super::{RepositoryError, map_unique_violation};
use crate::models::{AccountSummary, User};

// =============================================================================
// Internal Row Types
// =============================================================================

#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: UserId,
    full_name: String,
    email: String,
    role: UserRole,
    created_at: NaiveDateTime,
}

impl TryFrom<UserRow> for User {
    type Error = RepositoryError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let email = Email::parse(&row.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;

        Ok(Self {
            id: row.id,
            full_name: row.full_name,
            email,
            role: row.role,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct UserWithPasswordRow {
    #[sqlx(flatten)]
    user: UserRow,
    password: String,
}

#[derive(Debug, sqlx::FromRow)]
struct AccountSummaryRow {
    user_id: UserId,
    full_name: String,
    email: String,
    role: UserRole,
    events_applied: Option<String>,
}

impl From<AccountSummaryRow> for AccountSummary {
    fn from(row: AccountSummaryRow) -> Self {
        Self {
            user_id: row.user_id,
            full_name: row.full_name,
            email: row.email,
            role: row.role,
            events_applied: row.events_applied,
        }
    }
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for user database operations.
pub struct UserRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Get a user by their ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the email in the database is invalid.
    pub async fn get_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT id, full_name, email, role, created_at FROM users WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    /// Get a user and their stored password hash by email.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_password_hash(
        &self,
        email: &Email,
    ) -> Result<Option<(User, String)>, RepositoryError> {
        let row = sqlx::query_as::<_, UserWithPasswordRow>(
            "SELECT id, full_name, email, role, created_at, password FROM users WHERE email = ?",
        )
        .bind(email)
        .fetch_optional(self.pool)
        .await?;

        match row {
            Some(r) => Ok(Some((r.user.try_into()?, r.password))),
            None => Ok(None),
        }
    }

    /// Create a new user with a hashed password.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(
        &self,
        full_name: &str,
        email: &Email,
        password_hash: &str,
        role: UserRole,
    ) -> Result<User, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(
            r"
            INSERT INTO users (full_name, email, password, role)
            VALUES (?, ?, ?, ?)
            RETURNING id, full_name, email, role, created_at
            ",
        )
        .bind(full_name)
        .bind(email)
        .bind(password_hash)
        .bind(role)
        .fetch_one(self.pool)
        .await
        .map_err(|e| map_unique_violation(e, "email"))?;

        row.try_into()
    }

    /// Change the role of the account with the given email.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no account has that email.
    pub async fn set_role(&self, email: &Email, role: UserRole) -> Result<(), RepositoryError> {
        let result = sqlx::query("UPDATE users SET role = ? WHERE email = ?")
            .bind(role)
            .bind(email)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// List every account with its bookings concatenated for display.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_accounts(&self) -> Result<Vec<AccountSummary>, RepositoryError> {
        let rows = sqlx::query_as::<_, AccountSummaryRow>(
            r"
            SELECT u.id AS user_id, u.full_name, u.email, u.role,
                   GROUP_CONCAT(
                       e.event_name || ' (' || p.hours || ' hours on ' || p.created_at || ')',
                       ', '
                   ) AS events_applied
            FROM users u
            LEFT JOIN purchases p ON p.user_id = u.id
            LEFT JOIN events e ON e.id = p.event_id
            GROUP BY u.id
            ORDER BY u.id
            ",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Delete an account. Its bookings are removed by cascade and events it
    /// created lose their creator.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the account does not exist.
    pub async fn delete(&self, id: UserId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
