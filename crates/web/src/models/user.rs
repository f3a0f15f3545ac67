//! User domain types.
//!
//! These types represent validated domain objects separate from database row types.

use chrono::NaiveDateTime;

use fyay_core::{Email, UserId, UserRole};

/// An account (domain type).
#[derive(Debug, Clone)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Display name.
    pub full_name: String,
    /// User's email address (unique).
    pub email: Email,
    /// Permission level.
    pub role: UserRole,
    /// When the account was created.
    pub created_at: NaiveDateTime,
}

/// An account together with a summary of its bookings, for admin listings.
#[derive(Debug, Clone)]
pub struct AccountSummary {
    /// Account ID.
    pub user_id: UserId,
    /// Display name.
    pub full_name: String,
    /// Email address.
    pub email: String,
    /// Permission level.
    pub role: UserRole,
    /// Bookings rendered as `"{event} ({hours} hours on {created_at})"`, comma separated.
    pub events_applied: Option<String>,
}
