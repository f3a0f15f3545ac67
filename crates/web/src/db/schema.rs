//! Idempotent schema setup.

use sqlx::SqlitePool;

/// Table definitions, in dependency order.
const TABLES: &[&str] = &[
    r"
    CREATE TABLE IF NOT EXISTS users (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        full_name TEXT NOT NULL,
        email TEXT NOT NULL UNIQUE,
        password TEXT NOT NULL,
        role TEXT NOT NULL DEFAULT 'user' CHECK (role IN ('user', 'admin')),
        created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
    )
    ",
    r"
    CREATE TABLE IF NOT EXISTS events (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        event_name TEXT NOT NULL,
        description TEXT NOT NULL DEFAULT '',
        location TEXT NOT NULL,
        date TEXT NOT NULL,
        created_by INTEGER REFERENCES users (id) ON DELETE SET NULL
    )
    ",
    r"
    CREATE TABLE IF NOT EXISTS purchases (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id INTEGER NOT NULL REFERENCES users (id) ON DELETE CASCADE,
        event_id INTEGER NOT NULL REFERENCES events (id) ON DELETE CASCADE,
        hours INTEGER NOT NULL CHECK (hours > 0),
        description TEXT NOT NULL DEFAULT '',
        created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
    )
    ",
    r"
    CREATE TABLE IF NOT EXISTS inventory (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        product_name TEXT NOT NULL,
        quantity INTEGER NOT NULL CHECK (typeof(quantity) = 'integer' AND quantity >= 0),
        price_per_unit TEXT NOT NULL,
        description TEXT NOT NULL DEFAULT ''
    )
    ",
    r"
    CREATE TABLE IF NOT EXISTS inventory_transactions (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        product_id INTEGER NOT NULL REFERENCES inventory (id) ON DELETE CASCADE,
        quantity_change INTEGER NOT NULL,
        event_id INTEGER REFERENCES events (id) ON DELETE SET NULL,
        transaction_type TEXT NOT NULL CHECK (transaction_type IN ('add', 'deduct')),
        created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
    )
    ",
    r"
    CREATE TABLE IF NOT EXISTS orders (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        product_name TEXT NOT NULL,
        quantity INTEGER NOT NULL,
        price_per_unit TEXT NOT NULL,
        total_price TEXT NOT NULL,
        description TEXT NOT NULL DEFAULT '',
        date TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
    )
    ",
    "CREATE INDEX IF NOT EXISTS idx_purchases_user ON purchases (user_id)",
    "CREATE INDEX IF NOT EXISTS idx_inventory_transactions_event ON inventory_transactions (event_id)",
];

/// Create every application table if it does not already exist.
///
/// Safe to run repeatedly; existing tables and rows are left untouched.
///
/// # Errors
///
/// Returns `sqlx::Error` if any statement fails.
pub async fn create_tables(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    let mut tx = pool.begin().await?;
    for statement in TABLES {
        sqlx::query(statement).execute(&mut *tx).await?;
    }
    tx.commit().await?;

    tracing::info!(tables = TABLES.len(), "Schema ready");
    Ok(())
}
