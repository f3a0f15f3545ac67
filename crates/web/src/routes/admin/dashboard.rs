//! Admin overview of accounts, events, and stock.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;
use tracing::instrument;

use crate::db::{EventRepository, InventoryRepository, UserRepository};
use crate::error::Result;
use crate::filters;
use crate::middleware::{PageContext, RequireAdmin};
use crate::models::{AccountSummary, Event, InventoryItem};
use crate::state::AppState;

/// Dashboard template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/dashboard.html")]
pub struct DashboardTemplate {
    pub ctx: PageContext,
    pub accounts: Vec<AccountSummary>,
    pub events: Vec<Event>,
    pub inventory: Vec<InventoryItem>,
}

/// Display the admin dashboard.
///
/// # Errors
///
/// Returns `AppError::Database` if any listing cannot be read.
#[instrument(skip_all)]
pub async fn dashboard(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    ctx: PageContext,
) -> Result<DashboardTemplate> {
    let pool = state.pool();
    let accounts = UserRepository::new(pool).list_accounts().await?;
    let events = EventRepository::new(pool).list().await?;
    let inventory = InventoryRepository::new(pool).list_all().await?;

    Ok(DashboardTemplate {
        ctx,
        accounts,
        events,
        inventory,
    })
}
