//! Booking repository.

use chrono::NaiveDateTime;
use sqlx::SqlitePool;

use fyay_core::{EventId, PurchaseId, UserId};

use super::RepositoryError;
use crate::models::Purchase;

#[derive(Debug, sqlx::FromRow)]
struct PurchaseRow {
    id: PurchaseId,
    user_id: UserId,
    event_id: EventId,
    hours: i64,
    description: String,
    created_at: NaiveDateTime,
}

impl From<PurchaseRow> for Purchase {
    fn from(row: PurchaseRow) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            event_id: row.event_id,
            hours: row.hours,
            description: row.description,
            created_at: row.created_at,
        }
    }
}

/// Repository for booking database operations.
pub struct PurchaseRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> PurchaseRepository<'a> {
    /// Create a new booking repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Record a booking of `hours` against an event.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` on constraint violations (unknown user
    /// or event, non-positive hours) or other database failures.
    pub async fn create(
        &self,
        user_id: UserId,
        event_id: EventId,
        hours: i64,
        description: &str,
    ) -> Result<Purchase, RepositoryError> {
        let row = sqlx::query_as::<_, PurchaseRow>(
            r"
            INSERT INTO purchases (user_id, event_id, hours, description)
            VALUES (?, ?, ?, ?)
            RETURNING id, user_id, event_id, hours, description, created_at
            ",
        )
        .bind(user_id)
        .bind(event_id)
        .bind(hours)
        .bind(description)
        .fetch_one(self.pool)
        .await?;

        Ok(row.into())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::test_support::memory_pool;

    #[tokio::test]
    async fn test_create_rejects_unknown_event_without_insert() {
        let pool = memory_pool().await;
        sqlx::query("INSERT INTO users (full_name, email, password) VALUES ('A', 'a@x.com', 'h')")
            .execute(&pool)
            .await
            .unwrap();

        let repo = PurchaseRepository::new(&pool);
        let result = repo
            .create(UserId::new(1), EventId::new(42), 3, "")
            .await;
        assert!(matches!(result, Err(RepositoryError::Database(_))));

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM purchases")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn test_create_returns_row() {
        let pool = memory_pool().await;
        sqlx::query("INSERT INTO users (full_name, email, password) VALUES ('A', 'a@x.com', 'h')")
            .execute(&pool)
            .await
            .unwrap();
        sqlx::query("INSERT INTO events (event_name, location, date) VALUES ('Gala', 'Hall', '2030-01-01')")
            .execute(&pool)
            .await
            .unwrap();

        let repo = PurchaseRepository::new(&pool);
        let purchase = repo
            .create(UserId::new(1), EventId::new(1), 3, "setup crew")
            .await
            .unwrap();
        assert_eq!(purchase.hours, 3);
        assert_eq!(purchase.event_id, EventId::new(1));
        assert_eq!(purchase.description, "setup crew");
    }
}
