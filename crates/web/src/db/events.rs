//! Event repository for database operations.
//!
//! Event creation and deletion touch inventory and go through
//! [`crate::services::ledger::InventoryLedger`]; this repository only reads.

use chrono::NaiveDate;
use sqlx::SqlitePool;

use fyay_core::{EventId, UserId};

use super::RepositoryError;
use crate::models::{Event, ListedEvent};

#[derive(Debug, sqlx::FromRow)]
struct EventRow {
    id: EventId,
    event_name: String,
    description: String,
    location: String,
    date: NaiveDate,
    created_by: Option<UserId>,
}

impl From<EventRow> for Event {
    fn from(row: EventRow) -> Self {
        Self {
            id: row.id,
            name: row.event_name,
            description: row.description,
            location: row.location,
            date: row.date,
            created_by: row.created_by,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ListedEventRow {
    #[sqlx(flatten)]
    event: EventRow,
    is_applied: bool,
}

/// Repository for event reads.
pub struct EventRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> EventRepository<'a> {
    /// Create a new event repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Get an event by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: EventId) -> Result<Option<Event>, RepositoryError> {
        let row = sqlx::query_as::<_, EventRow>(
            "SELECT id, event_name, description, location, date, created_by FROM events WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// List all events in creation order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<Event>, RepositoryError> {
        let rows = sqlx::query_as::<_, EventRow>(
            "SELECT id, event_name, description, location, date, created_by FROM events ORDER BY id",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// List all events, marking those the given user has booked.
    ///
    /// With no viewer, nothing is marked.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_viewer(
        &self,
        viewer: Option<UserId>,
    ) -> Result<Vec<ListedEvent>, RepositoryError> {
        let rows = sqlx::query_as::<_, ListedEventRow>(
            r"
            SELECT e.id, e.event_name, e.description, e.location, e.date, e.created_by,
                   EXISTS (
                       SELECT 1 FROM purchases p WHERE p.event_id = e.id AND p.user_id = ?
                   ) AS is_applied
            FROM events e
            ORDER BY e.id
            ",
        )
        .bind(viewer)
        .fetch_all(self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| ListedEvent {
                event: row.event.into(),
                is_applied: row.is_applied,
            })
            .collect())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::test_support::memory_pool;

    #[tokio::test]
    async fn test_list_for_viewer_marks_booked_events() {
        let pool = memory_pool().await;
        sqlx::query(
            "INSERT INTO users (full_name, email, password) VALUES ('Alice', 'a@x.com', 'h')",
        )
        .execute(&pool)
        .await
        .unwrap();
        sqlx::query(
            "INSERT INTO events (event_name, location, date) VALUES ('Gala', 'Hall', '2030-01-01'), \
             ('Fair', 'Park', '2030-02-01')",
        )
        .execute(&pool)
        .await
        .unwrap();
        sqlx::query("INSERT INTO purchases (user_id, event_id, hours) VALUES (1, 2, 4)")
            .execute(&pool)
            .await
            .unwrap();

        let repo = EventRepository::new(&pool);

        let listed = repo.list_for_viewer(Some(UserId::new(1))).await.unwrap();
        let marks: Vec<(String, bool)> = listed
            .iter()
            .map(|l| (l.event.name.clone(), l.is_applied))
            .collect();
        assert_eq!(
            marks,
            vec![("Gala".to_string(), false), ("Fair".to_string(), true)]
        );

        let anonymous = repo.list_for_viewer(None).await.unwrap();
        assert!(anonymous.iter().all(|l| !l.is_applied));
    }

    #[tokio::test]
    async fn test_get_missing_event() {
        let pool = memory_pool().await;
        let repo = EventRepository::new(&pool);
        assert!(repo.get(EventId::new(1)).await.unwrap().is_none());
        assert!(repo.list().await.unwrap().is_empty());
    }
}
