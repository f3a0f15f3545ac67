//! Type-safe unit price representation using decimal arithmetic.

use core::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`UnitPrice`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The input is not a decimal number.
    #[error("price must be a number")]
    NotANumber,
    /// The input is zero or negative.
    #[error("price must be greater than zero")]
    NotPositive,
}

/// Price of a single unit of an inventory product.
///
/// Always strictly positive. Stored in the database as canonical decimal text
/// so totals are computed without floating point drift.
///
/// ```
/// use fyay_core::UnitPrice;
///
/// let price = UnitPrice::parse("2.50").unwrap();
/// assert_eq!(format!("{:.2}", price.total(4).unwrap()), "10.00");
/// assert!(UnitPrice::parse("0").is_err());
/// assert!(UnitPrice::parse("abc").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UnitPrice(Decimal);

impl UnitPrice {
    /// Parse a unit price from user input.
    ///
    /// # Errors
    ///
    /// Returns `PriceError::NotANumber` if the input is not a plain decimal number,
    /// or `PriceError::NotPositive` if it is zero or negative.
    pub fn parse(s: &str) -> Result<Self, PriceError> {
        let amount = Decimal::from_str(s.trim()).map_err(|_| PriceError::NotANumber)?;
        Self::try_from(amount)
    }

    /// Total cost of `quantity` units at this price, or `None` when the
    /// product does not fit in a `Decimal`.
    #[must_use]
    pub fn total(&self, quantity: i64) -> Option<Decimal> {
        self.0.checked_mul(Decimal::from(quantity))
    }
}

impl TryFrom<Decimal> for UnitPrice {
    type Error = PriceError;

    fn try_from(amount: Decimal) -> Result<Self, Self::Error> {
        if amount <= Decimal::ZERO {
            return Err(PriceError::NotPositive);
        }
        Ok(Self(amount.normalize()))
    }
}

impl FromStr for UnitPrice {
    type Err = PriceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for UnitPrice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

// SQLx support (with sqlite feature). Prices are persisted as TEXT.
#[cfg(feature = "sqlite")]
impl sqlx::Type<sqlx::Sqlite> for UnitPrice {
    fn type_info() -> sqlx::sqlite::SqliteTypeInfo {
        <String as sqlx::Type<sqlx::Sqlite>>::type_info()
    }

    fn compatible(ty: &sqlx::sqlite::SqliteTypeInfo) -> bool {
        <String as sqlx::Type<sqlx::Sqlite>>::compatible(ty)
    }
}

#[cfg(feature = "sqlite")]
impl<'r> sqlx::Decode<'r, sqlx::Sqlite> for UnitPrice {
    fn decode(value: sqlx::sqlite::SqliteValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <String as sqlx::Decode<sqlx::Sqlite>>::decode(value)?;
        let amount = Decimal::from_str(&s)?;
        // Database values are assumed valid
        Ok(Self(amount))
    }
}

#[cfg(feature = "sqlite")]
impl<'q> sqlx::Encode<'q, sqlx::Sqlite> for UnitPrice {
    fn encode_by_ref(
        &self,
        buf: &mut <sqlx::Sqlite as sqlx::Database>::ArgumentBuffer<'q>,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <String as sqlx::Encode<'q, sqlx::Sqlite>>::encode(self.0.to_string(), buf)
    }
}
