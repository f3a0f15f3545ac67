//! Event creation and deletion.
//!
//! `/admin/manage_events` and `/admin/create_event` render different pages
//! but submit to the same [`InventoryLedger::create_event`].

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, State},
    response::Redirect,
};
use tower_sessions::Session;
use tracing::instrument;

use fyay_core::EventId;

use crate::db::{EventRepository, InventoryRepository};
use crate::error::{Result, add_breadcrumb};
use crate::filters;
use crate::middleware::{PageContext, RequireAdmin, push_flash, push_flashes};
use crate::models::{CurrentUser, Event, FlashMessage, InventoryItem};
use crate::routes::UNEXPECTED_ERROR;
use crate::services::ledger::{InventoryLedger, LedgerError, NewEvent};
use crate::state::AppState;

/// Event management page template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/manage_events.html")]
pub struct ManageEventsTemplate {
    pub ctx: PageContext,
    pub events: Vec<Event>,
    pub inventory: Vec<InventoryItem>,
}

/// Standalone event creation page template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/create_event.html")]
pub struct CreateEventTemplate {
    pub ctx: PageContext,
    pub inventory: Vec<InventoryItem>,
}

// =============================================================================
// Pages
// =============================================================================

/// Display events and the creation form.
///
/// # Errors
///
/// Returns `AppError::Database` if events or inventory cannot be read.
#[instrument(skip_all)]
pub async fn manage_page(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    ctx: PageContext,
) -> Result<ManageEventsTemplate> {
    let events = EventRepository::new(state.pool()).list().await?;
    let inventory = InventoryRepository::new(state.pool())
        .list_in_stock()
        .await?;

    Ok(ManageEventsTemplate {
        ctx,
        events,
        inventory,
    })
}

/// Display the creation form on its own.
///
/// # Errors
///
/// Returns `AppError::Database` if inventory cannot be read.
#[instrument(skip_all)]
pub async fn create_page(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    ctx: PageContext,
) -> Result<CreateEventTemplate> {
    let inventory = InventoryRepository::new(state.pool())
        .list_in_stock()
        .await?;
    Ok(CreateEventTemplate { ctx, inventory })
}

// =============================================================================
// Creation
// =============================================================================

/// Handle a creation submitted from the management page.
///
/// # Errors
///
/// Returns `AppError::Session` if the outcome cannot be flashed.
#[instrument(skip_all, fields(admin_id = %admin.id))]
pub async fn manage_submit(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    session: Session,
    Form(fields): Form<Vec<(String, String)>>,
) -> Result<Redirect> {
    create_event(&state, &session, &admin, &fields, "/admin/manage_events").await
}

/// Handle a creation submitted from the standalone page.
///
/// # Errors
///
/// Returns `AppError::Session` if the outcome cannot be flashed.
#[instrument(skip_all, fields(admin_id = %admin.id))]
pub async fn create_submit(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    session: Session,
    Form(fields): Form<Vec<(String, String)>>,
) -> Result<Redirect> {
    create_event(&state, &session, &admin, &fields, "/admin/create_event").await
}

/// Run the ledger and flash its outcome. Failures go back to `form_path`.
async fn create_event(
    state: &AppState,
    session: &Session,
    admin: &CurrentUser,
    fields: &[(String, String)],
    form_path: &'static str,
) -> Result<Redirect> {
    let request = NewEvent::from_form(fields);

    match InventoryLedger::new(state.pool())
        .create_event(admin.id, &request)
        .await
    {
        Ok(event_id) => {
            let event_ref = event_id.to_string();
            add_breadcrumb("inventory", "Event created", Some(&[("event_id", event_ref.as_str())]));
            push_flash(session, FlashMessage::success("Event created successfully!")).await?;
            Ok(Redirect::to("/admin/dashboard"))
        }
        Err(LedgerError::Validation(errors)) => {
            push_flashes(session, errors.into_iter().map(FlashMessage::danger)).await?;
            Ok(Redirect::to(form_path))
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to create event");
            push_flash(session, FlashMessage::danger(UNEXPECTED_ERROR)).await?;
            Ok(Redirect::to(form_path))
        }
    }
}

// =============================================================================
// Deletion
// =============================================================================

/// Delete an event and restock everything it reserved.
///
/// # Errors
///
/// Returns `AppError::Session` if the outcome cannot be flashed.
#[instrument(skip_all, fields(event_id = %id))]
pub async fn delete(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<EventId>,
) -> Result<Redirect> {
    let flash = match InventoryLedger::new(state.pool()).delete_event(id).await {
        Ok(_) => FlashMessage::success(
            "Event and associated inventory adjustments have been deleted.",
        ),
        Err(LedgerError::NotFound) => FlashMessage::danger("Event not found."),
        Err(e) => {
            tracing::error!(error = %e, "Failed to delete event");
            FlashMessage::danger(UNEXPECTED_ERROR)
        }
    };

    push_flash(&session, flash).await?;
    Ok(Redirect::to("/admin/manage_events"))
}
