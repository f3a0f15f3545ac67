//! Role and ledger enums.

use serde::{Deserialize, Serialize};

/// Account role. Persisted as lowercase text (`user` / `admin`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "sqlite", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlite", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Regular account; may browse and book events.
    #[default]
    User,
    /// Administrator; manages events, inventory, orders and accounts.
    Admin,
}

impl UserRole {
    /// Whether this role grants access to the `/admin` area.
    #[must_use]
    pub const fn is_admin(self) -> bool {
        matches!(self, Self::Admin)
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::User => write!(f, "user"),
            Self::Admin => write!(f, "admin"),
        }
    }
}

impl std::str::FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Self::User),
            "admin" => Ok(Self::Admin),
            _ => Err(format!("invalid user role: {s}")),
        }
    }
}

/// Direction of an inventory ledger row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlite", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlite", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Stock received (order placement).
    Add,
    /// Stock reserved by an event.
    Deduct,
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Add => write!(f, "add"),
            Self::Deduct => write!(f, "deduct"),
        }
    }
}
