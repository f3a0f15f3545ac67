//! Session-related types.
//!
//! Types stored in the session for authentication state and page feedback.

use serde::{Deserialize, Serialize};

use fyay_core::{Email, UserId, UserRole};

use super::user::User;

/// Session-stored user identity.
///
/// Minimal data stored in the session to identify the logged-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUser {
    /// User's database ID.
    pub id: UserId,
    /// User's email address.
    pub email: Email,
    /// User's display name.
    pub full_name: String,
    /// User's role.
    pub role: UserRole,
}

impl CurrentUser {
    /// Whether this identity may use the admin area.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

impl From<&User> for CurrentUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            full_name: user.full_name.clone(),
            role: user.role,
        }
    }
}

/// Session keys.
pub mod keys {
    /// Key for storing the current logged-in user.
    pub const CURRENT_USER: &str = "current_user";

    /// Key for pending flash messages.
    pub const FLASH: &str = "flash";
}
