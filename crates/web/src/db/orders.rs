//! Order repository.
//!
//! Orders are written by [`crate::services::ledger::InventoryLedger::place_order`]
//! together with the stock they add.

use std::str::FromStr;

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use sqlx::SqlitePool;

use fyay_core::{OrderId, UnitPrice};

use super::RepositoryError;
use crate::models::Order;

#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: OrderId,
    product_name: String,
    quantity: i64,
    price_per_unit: UnitPrice,
    total_price: String,
    description: String,
    date: NaiveDateTime,
}

impl TryFrom<OrderRow> for Order {
    type Error = RepositoryError;

    fn try_from(row: OrderRow) -> Result<Self, Self::Error> {
        let total_price = Decimal::from_str(&row.total_price).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid order total in database: {e}"))
        })?;

        Ok(Self {
            id: row.id,
            product_name: row.product_name,
            quantity: row.quantity,
            price_per_unit: row.price_per_unit,
            total_price,
            description: row.description,
            date: row.date,
        })
    }
}

/// Repository for order database operations.
pub struct OrderRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// List all orders, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored total is not a decimal.
    pub async fn list_newest_first(&self) -> Result<Vec<Order>, RepositoryError> {
        let rows = sqlx::query_as::<_, OrderRow>(
            r"
            SELECT id, product_name, quantity, price_per_unit, total_price, description, date
            FROM orders
            ORDER BY date DESC, id DESC
            ",
        )
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    /// Delete an order record. Inventory is not adjusted.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the order does not exist.
    pub async fn delete(&self, id: OrderId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM orders WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
