//! Fixtures shared by unit tests.

#![allow(clippy::unwrap_used)]

use std::time::Duration;

use secrecy::SecretString;
use sqlx::SqlitePool;

use fyay_core::{ProductId, UserId};

use crate::db::{create_pool, schema};

/// A fresh in-memory store with every table created.
pub async fn memory_pool() -> SqlitePool {
    let pool = create_pool(&SecretString::from("sqlite::memory:"), Duration::from_secs(5))
        .await
        .unwrap();
    schema::create_tables(&pool).await.unwrap();
    pool
}

/// Insert an administrator account and return its id.
pub async fn seed_admin(pool: &SqlitePool) -> UserId {
    sqlx::query_scalar(
        "INSERT INTO users (full_name, email, password, role) \
         VALUES ('Admin', 'admin@fyay.test', 'x', 'admin') RETURNING id",
    )
    .fetch_one(pool)
    .await
    .unwrap()
}

/// Insert a product priced at 1.00 and return its id.
pub async fn seed_product(pool: &SqlitePool, name: &str, quantity: i64) -> ProductId {
    sqlx::query_scalar(
        "INSERT INTO inventory (product_name, quantity, price_per_unit) VALUES (?, ?, '1') RETURNING id",
    )
    .bind(name)
    .bind(quantity)
    .fetch_one(pool)
    .await
    .unwrap()
}
