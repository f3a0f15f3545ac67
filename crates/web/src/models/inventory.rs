//! Inventory and order domain types.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;

use fyay_core::{OrderId, ProductId, UnitPrice};

/// A consumable product on hand.
#[derive(Debug, Clone)]
pub struct InventoryItem {
    pub id: ProductId,
    pub product_name: String,
    pub quantity: i64,
    pub price_per_unit: UnitPrice,
    pub description: String,
}

/// A stock purchase record.
#[derive(Debug, Clone)]
pub struct Order {
    pub id: OrderId,
    pub product_name: String,
    pub quantity: i64,
    pub price_per_unit: UnitPrice,
    /// Always `quantity * price_per_unit`.
    pub total_price: Decimal,
    pub description: String,
    pub date: NaiveDateTime,
}
