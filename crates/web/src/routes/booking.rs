//! Booking hours against an event.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};
use chrono::NaiveDate;
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use fyay_core::EventId;

use crate::db::{EventRepository, PurchaseRepository};
use crate::error::{Result, add_breadcrumb};
use crate::filters;
use crate::middleware::{PageContext, RequireUser, push_flash, push_flashes};
use crate::models::{Event, FlashMessage};
use crate::services::validation::{parse_date, positive_int};
use crate::state::AppState;

/// Booking form data.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct BookingForm {
    pub hours: String,
    pub date: String,
    pub description: String,
}

/// A validated booking.
#[derive(Debug, PartialEq, Eq)]
pub struct Booking {
    pub hours: i64,
    pub date: NaiveDate,
}

impl BookingForm {
    /// Validate against the event being booked.
    ///
    /// # Errors
    ///
    /// Returns every validation message, date first.
    pub fn validate(&self, event_date: NaiveDate) -> std::result::Result<Booking, Vec<String>> {
        let mut errors = Vec::new();

        let date = match parse_date(&self.date) {
            Ok(date) if date < event_date => {
                errors.push("You cannot apply for an event scheduled in the past.".to_string());
                None
            }
            Ok(date) => Some(date),
            Err(message) => {
                errors.push(message.to_string());
                None
            }
        };

        let hours = positive_int(&self.hours);
        if hours.is_none() {
            errors.push("Number of Hours must be a positive integer.".to_string());
        }

        match (hours, date) {
            (Some(hours), Some(date)) => Ok(Booking { hours, date }),
            _ => Err(errors),
        }
    }
}

/// Booking page template.
#[derive(Template, WebTemplate)]
#[template(path = "events/book.html")]
pub struct BookEventTemplate {
    pub ctx: PageContext,
    pub event: Event,
}

/// Look up the event, or queue "Event not found." for the redirect.
async fn find_event(state: &AppState, session: &Session, id: EventId) -> Result<Option<Event>> {
    let event = EventRepository::new(state.pool()).get(id).await?;
    if event.is_none() {
        push_flash(session, FlashMessage::danger("Event not found.")).await?;
    }
    Ok(event)
}

/// Display the booking form.
///
/// # Errors
///
/// Returns `AppError` if the store or session fails.
#[instrument(skip_all, fields(event_id = %event_id))]
pub async fn book_event_page(
    RequireUser(_user): RequireUser,
    State(state): State<AppState>,
    session: Session,
    Path(event_id): Path<EventId>,
) -> Result<Response> {
    let Some(event) = find_event(&state, &session, event_id).await? else {
        return Ok(Redirect::to("/").into_response());
    };

    let ctx = PageContext::load(&session).await?;
    Ok(BookEventTemplate { ctx, event }.into_response())
}

/// Handle a booking submission.
///
/// # Errors
///
/// Returns `AppError` if the session fails. Store failures while saving the
/// booking are reported to the user instead.
#[instrument(skip_all, fields(user_id = %user.id, event_id = %event_id))]
pub async fn book_event(
    RequireUser(user): RequireUser,
    State(state): State<AppState>,
    session: Session,
    Path(event_id): Path<EventId>,
    Form(form): Form<BookingForm>,
) -> Result<Redirect> {
    let Some(event) = find_event(&state, &session, event_id).await? else {
        return Ok(Redirect::to("/"));
    };

    let booking = match form.validate(event.date) {
        Ok(booking) => booking,
        Err(errors) => {
            push_flashes(&session, errors.into_iter().map(FlashMessage::danger)).await?;
            return Ok(Redirect::to(&format!("/book_event/{event_id}")));
        }
    };

    let created = PurchaseRepository::new(state.pool())
        .create(user.id, event.id, booking.hours, form.description.trim())
        .await;

    match created {
        Ok(purchase) => {
            tracing::info!(purchase_id = %purchase.id, hours = booking.hours, "Booking recorded");
            let event_ref = event_id.to_string();
            add_breadcrumb("booking", "Applied for event", Some(&[("event_id", event_ref.as_str())]));
            push_flash(&session, FlashMessage::success("Successfully applied for the event!"))
                .await?;
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to record booking");
            push_flash(
                &session,
                FlashMessage::danger("An error occurred while processing your application."),
            )
            .await?;
        }
    }

    Ok(Redirect::to("/"))
}
