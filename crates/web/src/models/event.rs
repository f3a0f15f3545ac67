//! Event and booking domain types.

use chrono::{NaiveDate, NaiveDateTime};

use fyay_core::{EventId, PurchaseId, UserId};

/// An event administrators create and users book hours against.
#[derive(Debug, Clone)]
pub struct Event {
    pub id: EventId,
    pub name: String,
    pub description: String,
    pub location: String,
    pub date: NaiveDate,
    /// Creating administrator; cleared when that account is deleted.
    pub created_by: Option<UserId>,
}

/// An event as shown on the public listing.
#[derive(Debug, Clone)]
pub struct ListedEvent {
    pub event: Event,
    /// Whether the viewing user already has a booking for this event.
    pub is_applied: bool,
}

/// A booking of hours against an event.
#[derive(Debug, Clone)]
pub struct Purchase {
    pub id: PurchaseId,
    pub user_id: UserId,
    pub event_id: EventId,
    pub hours: i64,
    pub description: String,
    pub created_at: NaiveDateTime,
}
