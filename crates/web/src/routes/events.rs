//! Public event listing.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;
use tracing::instrument;

use crate::db::EventRepository;
use crate::error::Result;
use crate::filters;
use crate::middleware::PageContext;
use crate::models::ListedEvent;
use crate::state::AppState;

/// Event listing template.
#[derive(Template, WebTemplate)]
#[template(path = "events/index.html")]
pub struct EventsTemplate {
    pub ctx: PageContext,
    pub events: Vec<ListedEvent>,
}

/// List every event, marking those the viewer has already applied for.
///
/// # Errors
///
/// Returns `AppError::Database` if the events cannot be read.
#[instrument(skip_all)]
pub async fn index(State(state): State<AppState>, ctx: PageContext) -> Result<EventsTemplate> {
    let viewer = ctx.current_user.as_ref().map(|u| u.id);
    let events = EventRepository::new(state.pool())
        .list_for_viewer(viewer)
        .await?;

    Ok(EventsTemplate { ctx, events })
}
