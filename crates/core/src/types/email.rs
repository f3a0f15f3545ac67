//! Account email address.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing an [`Email`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum EmailError {
    #[error("email cannot be empty")]
    Empty,
    /// Registration only asks for an `@` and a `.` somewhere in the address.
    #[error("email must contain '@' and '.'")]
    Malformed,
}

/// An account email address, compared and stored exactly as entered.
///
/// ```
/// use fyay_core::Email;
///
/// assert!(Email::parse("a@x.com").is_ok());
/// assert!(Email::parse("no-at-symbol.com").is_err());
/// assert!(Email::parse("user@localhost").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Email(String);

impl Email {
    /// Parse an `Email` from a string.
    ///
    /// # Errors
    ///
    /// Returns `EmailError::Empty` for an empty string and
    /// `EmailError::Malformed` when `@` or `.` is missing.
    pub fn parse(s: &str) -> Result<Self, EmailError> {
        if s.is_empty() {
            return Err(EmailError::Empty);
        }
        if !s.contains('@') || !s.contains('.') {
            return Err(EmailError::Malformed);
        }
        Ok(Self(s.to_owned()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// Stored as TEXT.
#[cfg(feature = "sqlite")]
impl sqlx::Type<sqlx::Sqlite> for Email {
    fn type_info() -> sqlx::sqlite::SqliteTypeInfo {
        <String as sqlx::Type<sqlx::Sqlite>>::type_info()
    }

    fn compatible(ty: &sqlx::sqlite::SqliteTypeInfo) -> bool {
        <String as sqlx::Type<sqlx::Sqlite>>::compatible(ty)
    }
}

#[cfg(feature = "sqlite")]
impl<'r> sqlx::Decode<'r, sqlx::Sqlite> for Email {
    fn decode(value: sqlx::sqlite::SqliteValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        Ok(Self(<String as sqlx::Decode<sqlx::Sqlite>>::decode(value)?))
    }
}

#[cfg(feature = "sqlite")]
impl<'q> sqlx::Encode<'q, sqlx::Sqlite> for Email {
    fn encode_by_ref(
        &self,
        buf: &mut <sqlx::Sqlite as sqlx::Database>::ArgumentBuffer<'q>,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <String as sqlx::Encode<'q, sqlx::Sqlite>>::encode_by_ref(&self.0, buf)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_accepts_any_address_with_at_and_dot() {
        for raw in ["a@x.com", "user.name+tag@example.co.uk", "@x.com", "x.y@"] {
            assert_eq!(Email::parse(raw).unwrap().as_str(), raw);
        }
    }

    #[test]
    fn test_parse_rejects() {
        assert_eq!(Email::parse(""), Err(EmailError::Empty));
        assert_eq!(Email::parse("no-at-symbol.com"), Err(EmailError::Malformed));
        assert_eq!(Email::parse("user@localhost"), Err(EmailError::Malformed));
    }

    #[test]
    fn test_serde_is_a_plain_string() {
        let email = Email::parse("a@x.com").unwrap();
        let json = serde_json::to_string(&email).unwrap();
        assert_eq!(json, "\"a@x.com\"");
        assert_eq!(serde_json::from_str::<Email>(&json).unwrap(), email);
    }
}
