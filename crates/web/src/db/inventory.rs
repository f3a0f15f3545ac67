//! Inventory repository for database operations.
//!
//! Stock levels only change through [`crate::services::ledger::InventoryLedger`];
//! this repository covers reads and the admin deletion of a product.

use sqlx::SqlitePool;

use fyay_core::{ProductId, UnitPrice};

use super::RepositoryError;
use crate::models::InventoryItem;

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct InventoryRow {
    id: ProductId,
    product_name: String,
    quantity: i64,
    price_per_unit: UnitPrice,
    description: String,
}

impl From<InventoryRow> for InventoryItem {
    fn from(row: InventoryRow) -> Self {
        Self {
            id: row.id,
            product_name: row.product_name,
            quantity: row.quantity,
            price_per_unit: row.price_per_unit,
            description: row.description,
        }
    }
}

/// Columns selected for [`InventoryRow`].
pub(crate) const INVENTORY_COLUMNS: &str = "id, product_name, quantity, price_per_unit, description";

/// Repository for inventory database operations.
pub struct InventoryRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> InventoryRepository<'a> {
    /// Create a new inventory repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// List every product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_all(&self) -> Result<Vec<InventoryItem>, RepositoryError> {
        let rows = sqlx::query_as::<_, InventoryRow>(&format!(
            "SELECT {INVENTORY_COLUMNS} FROM inventory ORDER BY id"
        ))
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// List products with stock on hand (quantity > 0), the ones an event may reserve.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_in_stock(&self) -> Result<Vec<InventoryItem>, RepositoryError> {
        let rows = sqlx::query_as::<_, InventoryRow>(&format!(
            "SELECT {INVENTORY_COLUMNS} FROM inventory WHERE quantity > 0 ORDER BY id"
        ))
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Delete a product. Its ledger rows are removed by cascade.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product does not exist.
    pub async fn delete(&self, id: ProductId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM inventory WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
