//! Inventory ledger.
//!
//! Every stock movement is written together with a row in
//! `inventory_transactions`, inside a single store transaction:
//!
//! - **Event creation** reserves stock: one `deduct` row per product
//!   (`quantity_change = -q`, tied to the event) plus a conditional decrement
//!   that refuses to take stock below zero.
//! - **Event deletion** replays the event's `deduct` rows in reverse, restocking
//!   exactly what was reserved, then removes the rows and the event.
//! - **Order placement** receives stock: an `add` row (no event) plus an
//!   increment or a new product, and the order record itself.
//!
//! Event deletion only reads `deduct` rows tied to the event, so `add` rows
//! never influence restock amounts.
//!
//! Every transaction starts with `BEGIN IMMEDIATE`, taking the write lock
//! before the first read. Concurrent ledger operations therefore queue on the
//! store's busy timeout instead of validating against stale stock.
//! `sqlx::Transaction` rolls back on drop, so every early return leaves the
//! store untouched.

mod error;
mod request;

use std::collections::HashSet;

use sqlx::{Sqlite, SqlitePool, Transaction};

use fyay_core::{EventId, OrderId, ProductId, TransactionType, UserId};

use crate::db::inventory::{INVENTORY_COLUMNS, InventoryRow};
use crate::models::InventoryItem;

pub use error::LedgerError;
pub use request::{
    NewEvent, NewOrder, ORDER_TOO_LARGE, OrderForm, RequestedItem, UNPAIRED_ROWS,
};

/// Coordinates inventory changes with their ledger rows.
pub struct InventoryLedger<'a> {
    pool: &'a SqlitePool,
}

impl<'a> InventoryLedger<'a> {
    /// Create a new ledger over the given pool.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    // =========================================================================
    // Event Creation
    // =========================================================================

    /// Create an event and reserve the requested stock for it.
    ///
    /// All validation messages are collected, in order: the event's own
    /// fields, the empty-selection check, then one check per requested
    /// product against a fresh read of its stock.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::Validation` with every message when the request
    /// is invalid or stock ran out concurrently. Returns
    /// `LedgerError::Repository` on database failure. In both cases nothing
    /// is written.
    #[tracing::instrument(skip(self, request), fields(items = request.items.len()))]
    pub async fn create_event(
        &self,
        created_by: UserId,
        request: &NewEvent,
    ) -> Result<EventId, LedgerError> {
        let mut errors = Vec::new();
        let date = request.check_fields(&mut errors);
        if request.items.is_empty() && request.row_errors.is_empty() {
            errors.push("At least one product must be selected.".to_string());
        }
        errors.extend(request.row_errors.iter().cloned());

        let mut tx = begin_immediate(self.pool).await?;

        let mut seen = HashSet::new();
        let mut reservations = Vec::with_capacity(request.items.len());
        for item in &request.items {
            let Some(quantity) = item.quantity else {
                errors.push(format!(
                    "Invalid or missing quantity for product ID {}.",
                    item.product_id
                ));
                continue;
            };
            let Some(product) = fetch_product(&mut tx, item.product_id).await? else {
                errors.push(format!("Product ID {} does not exist.", item.product_id));
                continue;
            };
            if !seen.insert(item.product_id) {
                errors.push(format!(
                    "Product ID {} was selected more than once.",
                    item.product_id
                ));
                continue;
            }
            if quantity > product.quantity {
                errors.push(insufficient_stock(&product.product_name, product.quantity));
                continue;
            }
            reservations.push((product, quantity));
        }

        let date = match date {
            Some(date) if errors.is_empty() => date,
            _ => return Err(LedgerError::Validation(errors)),
        };

        let event_id: EventId = sqlx::query_scalar(
            r"
            INSERT INTO events (event_name, description, location, date, created_by)
            VALUES (?, ?, ?, ?, ?)
            RETURNING id
            ",
        )
        .bind(request.name.trim())
        .bind(request.description.trim())
        .bind(request.location.trim())
        .bind(date)
        .bind(created_by)
        .fetch_one(&mut *tx)
        .await?;

        for (product, quantity) in &reservations {
            let updated = sqlx::query(
                "UPDATE inventory SET quantity = quantity - ? WHERE id = ? AND quantity >= ?",
            )
            .bind(quantity)
            .bind(product.id)
            .bind(quantity)
            .execute(&mut *tx)
            .await?;

            if updated.rows_affected() == 0 {
                // Unreachable while the write lock is held; kept as the guard
                // against taking stock below zero.
                let remaining = fetch_product(&mut tx, product.id)
                    .await?
                    .map_or(0, |p| p.quantity);
                tracing::warn!(
                    product_id = %product.id,
                    requested = quantity,
                    remaining,
                    "Stock changed during event creation"
                );
                return Err(LedgerError::Validation(vec![insufficient_stock(
                    &product.product_name,
                    remaining,
                )]));
            }

            record(&mut tx, product.id, -quantity, Some(event_id), TransactionType::Deduct).await?;
        }

        tx.commit().await?;

        tracing::info!(
            event_id = %event_id,
            products = reservations.len(),
            "Event created with inventory reserved"
        );
        Ok(event_id)
    }

    // =========================================================================
    // Event Deletion
    // =========================================================================

    /// Delete an event, restocking everything it reserved.
    ///
    /// Returns the number of ledger rows replayed.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::NotFound` if the event does not exist.
    /// Returns `LedgerError::Repository` on database failure; nothing is written.
    #[tracing::instrument(skip(self))]
    pub async fn delete_event(&self, event_id: EventId) -> Result<usize, LedgerError> {
        let mut tx = begin_immediate(self.pool).await?;

        let exists: Option<EventId> = sqlx::query_scalar("SELECT id FROM events WHERE id = ?")
            .bind(event_id)
            .fetch_optional(&mut *tx)
            .await?;
        if exists.is_none() {
            return Err(LedgerError::NotFound);
        }

        let deductions: Vec<(ProductId, i64)> = sqlx::query_as(
            r"
            SELECT product_id, quantity_change
            FROM inventory_transactions
            WHERE event_id = ? AND transaction_type = ?
            ORDER BY id
            ",
        )
        .bind(event_id)
        .bind(TransactionType::Deduct)
        .fetch_all(&mut *tx)
        .await?;

        for (product_id, change) in &deductions {
            sqlx::query("UPDATE inventory SET quantity = quantity + ? WHERE id = ?")
                .bind(change.abs())
                .bind(product_id)
                .execute(&mut *tx)
                .await?;
        }

        // Ledger rows go first: the foreign key would otherwise null their event_id.
        sqlx::query("DELETE FROM inventory_transactions WHERE event_id = ?")
            .bind(event_id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM events WHERE id = ?")
            .bind(event_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::info!(event_id = %event_id, restocked = deductions.len(), "Event deleted");
        Ok(deductions.len())
    }

    // =========================================================================
    // Order Placement
    // =========================================================================

    /// Record a stock purchase.
    ///
    /// A product whose name matches case-insensitively is restocked and takes
    /// the new unit price; otherwise a new product is created.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::Validation` if the restocked quantity would not
    /// fit in an `i64`.
    /// Returns `LedgerError::Repository` on database failure; nothing is written.
    #[tracing::instrument(skip(self, order), fields(product = %order.product_name))]
    pub async fn place_order(&self, order: &NewOrder) -> Result<OrderId, LedgerError> {
        let mut tx = begin_immediate(self.pool).await?;

        let existing: Option<(ProductId, String, i64)> = sqlx::query_as(
            r"
            SELECT id, product_name, quantity
            FROM inventory
            WHERE LOWER(product_name) = LOWER(?)
            ORDER BY id
            LIMIT 1
            ",
        )
        .bind(&order.product_name)
        .fetch_optional(&mut *tx)
        .await?;

        let product_id = if let Some((id, name, on_hand)) = &existing {
            let Some(restocked) = on_hand.checked_add(order.quantity) else {
                return Err(LedgerError::Validation(vec![format!(
                    "Quantity for product '{name}' would exceed the maximum stock level."
                )]));
            };
            sqlx::query("UPDATE inventory SET quantity = ?, price_per_unit = ? WHERE id = ?")
                .bind(restocked)
                .bind(order.price_per_unit)
                .bind(id)
                .execute(&mut *tx)
                .await?;
            *id
        } else {
            sqlx::query_scalar(
                r"
                INSERT INTO inventory (product_name, quantity, price_per_unit, description)
                VALUES (?, ?, ?, ?)
                RETURNING id
                ",
            )
            .bind(&order.product_name)
            .bind(order.quantity)
            .bind(order.price_per_unit)
            .bind(&order.description)
            .fetch_one(&mut *tx)
            .await?
        };

        record(&mut tx, product_id, order.quantity, None, TransactionType::Add).await?;

        let order_id: OrderId = sqlx::query_scalar(
            r"
            INSERT INTO orders (product_name, quantity, price_per_unit, total_price, description)
            VALUES (?, ?, ?, ?, ?)
            RETURNING id
            ",
        )
        .bind(&order.product_name)
        .bind(order.quantity)
        .bind(order.price_per_unit)
        .bind(order.total_price.to_string())
        .bind(&order.description)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::info!(
            order_id = %order_id,
            product_id = %product_id,
            restocked = existing.is_some(),
            "Order placed"
        );
        Ok(order_id)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Open a transaction holding the write lock from its first statement.
async fn begin_immediate(pool: &SqlitePool) -> Result<Transaction<'static, Sqlite>, sqlx::Error> {
    pool.begin_with("BEGIN IMMEDIATE").await
}

fn insufficient_stock(product_name: &str, available: i64) -> String {
    format!("Insufficient stock for product '{product_name}' (only {available} available).")
}

async fn fetch_product(
    tx: &mut Transaction<'_, Sqlite>,
    id: ProductId,
) -> Result<Option<InventoryItem>, sqlx::Error> {
    let row = sqlx::query_as::<_, InventoryRow>(&format!(
        "SELECT {INVENTORY_COLUMNS} FROM inventory WHERE id = ?"
    ))
    .bind(id)
    .fetch_optional(&mut **tx)
    .await?;

    Ok(row.map(Into::into))
}

async fn record(
    tx: &mut Transaction<'_, Sqlite>,
    product_id: ProductId,
    quantity_change: i64,
    event_id: Option<EventId>,
    transaction_type: TransactionType,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r"
        INSERT INTO inventory_transactions (product_id, quantity_change, event_id, transaction_type)
        VALUES (?, ?, ?, ?)
        ",
    )
    .bind(product_id)
    .bind(quantity_change)
    .bind(event_id)
    .bind(transaction_type)
    .execute(&mut **tx)
    .await?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use secrecy::SecretString;

    use super::*;
    use crate::db::{create_pool, schema};
    use crate::test_support::{memory_pool, seed_admin, seed_product};

    async fn stock(pool: &SqlitePool, id: ProductId) -> i64 {
        sqlx::query_scalar("SELECT quantity FROM inventory WHERE id = ?")
            .bind(id)
            .fetch_one(pool)
            .await
            .unwrap()
    }

    async fn count(pool: &SqlitePool, table: &str) -> i64 {
        sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(pool)
            .await
            .unwrap()
    }

    fn gala(items: Vec<RequestedItem>) -> NewEvent {
        NewEvent {
            name: "Gala".into(),
            description: "Annual gala".into(),
            location: "Main Hall".into(),
            date: "2030-06-01".into(),
            items,
            ..NewEvent::default()
        }
    }

    fn item(product_id: ProductId, quantity: i64) -> RequestedItem {
        RequestedItem {
            product_id,
            quantity: Some(quantity),
        }
    }

    fn order(name: &str, quantity: i64, price: &str) -> NewOrder {
        NewOrder::parse(&OrderForm {
            product_name: name.into(),
            quantity: quantity.to_string(),
            price_per_unit: price.into(),
            description: String::new(),
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_create_event_deducts_exactly() {
        let pool = memory_pool().await;
        let admin = seed_admin(&pool).await;
        let chairs = seed_product(&pool, "Chairs", 10).await;
        let tables = seed_product(&pool, "Tables", 4).await;
        let ledger = InventoryLedger::new(&pool);

        let event_id = ledger
            .create_event(admin, &gala(vec![item(chairs, 5), item(tables, 4)]))
            .await
            .unwrap();

        assert_eq!(stock(&pool, chairs).await, 5);
        assert_eq!(stock(&pool, tables).await, 0);

        let rows: Vec<(ProductId, i64, Option<EventId>, TransactionType)> = sqlx::query_as(
            "SELECT product_id, quantity_change, event_id, transaction_type \
             FROM inventory_transactions ORDER BY id",
        )
        .fetch_all(&pool)
        .await
        .unwrap();
        assert_eq!(
            rows,
            vec![
                (chairs, -5, Some(event_id), TransactionType::Deduct),
                (tables, -4, Some(event_id), TransactionType::Deduct),
            ]
        );
    }

    #[tokio::test]
    async fn test_create_event_over_stock_changes_nothing() {
        let pool = memory_pool().await;
        let admin = seed_admin(&pool).await;
        let chairs = seed_product(&pool, "Chairs", 10).await;
        let ledger = InventoryLedger::new(&pool);

        let err = ledger
            .create_event(admin, &gala(vec![item(chairs, 11)]))
            .await
            .unwrap_err();

        match err {
            LedgerError::Validation(messages) => assert_eq!(
                messages,
                vec!["Insufficient stock for product 'Chairs' (only 10 available)."]
            ),
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(stock(&pool, chairs).await, 10);
        assert_eq!(count(&pool, "inventory_transactions").await, 0);
        assert_eq!(count(&pool, "events").await, 0);
    }

    #[tokio::test]
    async fn test_create_event_collects_every_message() {
        let pool = memory_pool().await;
        let admin = seed_admin(&pool).await;
        let chairs = seed_product(&pool, "Chairs", 10).await;
        let ledger = InventoryLedger::new(&pool);

        let request = NewEvent {
            name: " ".into(),
            items: vec![
                RequestedItem {
                    product_id: chairs,
                    quantity: None,
                },
                item(ProductId::new(77), 1),
                item(chairs, 2),
                item(chairs, 3),
            ],
            ..gala(vec![])
        };

        let LedgerError::Validation(messages) =
            ledger.create_event(admin, &request).await.unwrap_err()
        else {
            panic!("expected validation error");
        };
        assert_eq!(
            messages,
            vec![
                "Event Name is required.",
                "Invalid or missing quantity for product ID 1.",
                "Product ID 77 does not exist.",
                "Product ID 1 was selected more than once.",
            ]
        );
        assert_eq!(stock(&pool, chairs).await, 10);
    }

    #[tokio::test]
    async fn test_create_event_requires_a_product() {
        let pool = memory_pool().await;
        let admin = seed_admin(&pool).await;

        let LedgerError::Validation(messages) = InventoryLedger::new(&pool)
            .create_event(admin, &gala(vec![]))
            .await
            .unwrap_err()
        else {
            panic!("expected validation error");
        };
        assert_eq!(messages, vec!["At least one product must be selected."]);
    }

    #[tokio::test]
    async fn test_create_event_reports_unusable_rows() {
        let pool = memory_pool().await;
        let admin = seed_admin(&pool).await;
        let chairs = seed_product(&pool, "Chairs", 10).await;
        let ledger = InventoryLedger::new(&pool);

        let request = NewEvent {
            row_errors: vec!["Product ID abc does not exist.".to_string()],
            ..gala(vec![item(chairs, 2)])
        };
        let LedgerError::Validation(messages) =
            ledger.create_event(admin, &request).await.unwrap_err()
        else {
            panic!("expected validation error");
        };
        assert_eq!(messages, vec!["Product ID abc does not exist."]);

        let unpaired = NewEvent {
            row_errors: vec![UNPAIRED_ROWS.to_string()],
            ..gala(vec![])
        };
        let LedgerError::Validation(messages) =
            ledger.create_event(admin, &unpaired).await.unwrap_err()
        else {
            panic!("expected validation error");
        };
        assert_eq!(messages, vec![UNPAIRED_ROWS]);

        assert_eq!(stock(&pool, chairs).await, 10);
        assert_eq!(count(&pool, "events").await, 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_concurrent_creations_never_oversell() {
        let path = std::env::temp_dir().join(format!("fyay-ledger-{}.db", uuid::Uuid::new_v4()));
        let url = format!("sqlite://{}?mode=rwc", path.display());
        let pool = create_pool(&SecretString::from(url), Duration::from_secs(5))
            .await
            .unwrap();
        schema::create_tables(&pool).await.unwrap();
        let admin = seed_admin(&pool).await;
        let chairs = seed_product(&pool, "Chairs", 10).await;

        let first = InventoryLedger::new(&pool);
        let second = InventoryLedger::new(&pool);
        let request = gala(vec![item(chairs, 6)]);
        let (a, b) = tokio::join!(
            first.create_event(admin, &request),
            second.create_event(admin, &request),
        );

        let (created, rejected) = match (a, b) {
            (Ok(id), Err(e)) | (Err(e), Ok(id)) => (id, e),
            other => panic!("expected exactly one success, got {other:?}"),
        };
        match rejected {
            LedgerError::Validation(messages) => assert_eq!(
                messages,
                vec!["Insufficient stock for product 'Chairs' (only 4 available)."]
            ),
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(stock(&pool, chairs).await, 4);
        assert_eq!(count(&pool, "events").await, 1);
        assert_eq!(count(&pool, "inventory_transactions").await, 1);
        assert!(created.as_i64() > 0);

        pool.close().await;
        for suffix in ["", "-wal", "-shm"] {
            let _ = std::fs::remove_file(format!("{}{suffix}", path.display()));
        }
    }

    #[tokio::test]
    async fn test_delete_event_restocks_after_intervening_order() {
        let pool = memory_pool().await;
        let admin = seed_admin(&pool).await;
        let chairs = seed_product(&pool, "Chairs", 10).await;
        let ledger = InventoryLedger::new(&pool);

        let event_id = ledger
            .create_event(admin, &gala(vec![item(chairs, 5)]))
            .await
            .unwrap();
        ledger.place_order(&order("chairs", 3, "2.00")).await.unwrap();
        assert_eq!(stock(&pool, chairs).await, 8);

        let replayed = ledger.delete_event(event_id).await.unwrap();
        assert_eq!(replayed, 1);
        assert_eq!(stock(&pool, chairs).await, 13);

        let event_rows: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM inventory_transactions WHERE event_id IS NOT NULL")
                .fetch_one(&pool)
                .await
                .unwrap();
        assert_eq!(event_rows, 0);
        assert_eq!(count(&pool, "events").await, 0);
        // The order's `add` row survives.
        assert_eq!(count(&pool, "inventory_transactions").await, 1);
    }

    #[tokio::test]
    async fn test_delete_event_cascades_bookings() {
        let pool = memory_pool().await;
        let admin = seed_admin(&pool).await;
        let chairs = seed_product(&pool, "Chairs", 10).await;
        let ledger = InventoryLedger::new(&pool);

        let event_id = ledger
            .create_event(admin, &gala(vec![item(chairs, 1)]))
            .await
            .unwrap();
        sqlx::query("INSERT INTO purchases (user_id, event_id, hours) VALUES (?, ?, 2)")
            .bind(admin)
            .bind(event_id)
            .execute(&pool)
            .await
            .unwrap();

        ledger.delete_event(event_id).await.unwrap();
        assert_eq!(count(&pool, "purchases").await, 0);
    }

    #[tokio::test]
    async fn test_delete_missing_event() {
        let pool = memory_pool().await;
        let err = InventoryLedger::new(&pool)
            .delete_event(EventId::new(5))
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::NotFound));
    }

    #[tokio::test]
    async fn test_order_restocks_case_insensitive_match() {
        let pool = memory_pool().await;
        let chairs = seed_product(&pool, "Chairs", 10).await;
        let ledger = InventoryLedger::new(&pool);

        ledger.place_order(&order("CHAIRS", 5, "3.25")).await.unwrap();

        assert_eq!(count(&pool, "inventory").await, 1);
        assert_eq!(stock(&pool, chairs).await, 15);
        let price: String = sqlx::query_scalar("SELECT price_per_unit FROM inventory WHERE id = ?")
            .bind(chairs)
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(price, "3.25");

        let (quantity, total): (i64, String) =
            sqlx::query_as("SELECT quantity, total_price FROM orders")
                .fetch_one(&pool)
                .await
                .unwrap();
        assert_eq!(quantity, 5);
        assert_eq!(total, "16.25");

        let add: (i64, Option<EventId>, TransactionType) = sqlx::query_as(
            "SELECT quantity_change, event_id, transaction_type FROM inventory_transactions",
        )
        .fetch_one(&pool)
        .await
        .unwrap();
        assert_eq!(add, (5, None, TransactionType::Add));
    }

    #[tokio::test]
    async fn test_order_past_stock_limit_changes_nothing() {
        let pool = memory_pool().await;
        let chairs = seed_product(&pool, "Chairs", 9_000_000_000_000_000_000).await;
        let ledger = InventoryLedger::new(&pool);

        let err = ledger
            .place_order(&order("chairs", 1_000_000_000_000_000_000, "1"))
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::Validation(_)));

        assert_eq!(stock(&pool, chairs).await, 9_000_000_000_000_000_000);
        assert_eq!(count(&pool, "orders").await, 0);
        assert_eq!(count(&pool, "inventory_transactions").await, 0);
        assert_eq!(
            crate::db::InventoryRepository::new(&pool)
                .list_all()
                .await
                .unwrap()
                .len(),
            1
        );
    }

    #[tokio::test]
    async fn test_order_creates_new_product_once() {
        let pool = memory_pool().await;
        seed_product(&pool, "Chairs", 10).await;
        let ledger = InventoryLedger::new(&pool);

        ledger.place_order(&order("Lanterns", 2, "7")).await.unwrap();

        let rows: Vec<(String, i64)> =
            sqlx::query_as("SELECT product_name, quantity FROM inventory WHERE product_name = 'Lanterns'")
                .fetch_all(&pool)
                .await
                .unwrap();
        assert_eq!(rows, vec![("Lanterns".to_string(), 2)]);
        assert_eq!(count(&pool, "inventory").await, 2);
    }
}
