//! Administrator area.
//!
//! Every handler here takes [`RequireAdmin`](crate::middleware::RequireAdmin)
//! as its first argument.

pub mod dashboard;
pub mod events;
pub mod inventory;
pub mod orders;
pub mod users;

use axum::{
    Router,
    response::Redirect,
    routing::{get, post},
};
use tower_sessions::Session;

use crate::db::RepositoryError;
use crate::error::Result;
use crate::middleware::push_flash;
use crate::models::FlashMessage;
use crate::routes::UNEXPECTED_ERROR;
use crate::state::AppState;

/// Create the admin routes router, nested under `/admin`.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(dashboard::dashboard))
        .route("/inventory", get(inventory::index))
        .route("/users", get(users::index))
        .route(
            "/manage_events",
            get(events::manage_page).post(events::manage_submit),
        )
        .route(
            "/create_event",
            get(events::create_page).post(events::create_submit),
        )
        .route("/orders", get(orders::index).post(orders::place))
        .route("/delete_event/{id}", post(events::delete))
        .route("/delete_inventory/{id}", post(inventory::delete))
        .route("/delete_order/{id}", post(orders::delete))
        .route("/delete_user/{id}", post(users::delete))
}

/// Report the outcome of a single-row admin deletion and redirect to `back`.
async fn finish_delete(
    session: &Session,
    result: std::result::Result<(), RepositoryError>,
    messages: (&str, &str),
    back: &'static str,
) -> Result<Redirect> {
    let (deleted, not_found) = messages;
    let flash = match result {
        Ok(()) => FlashMessage::success(deleted),
        Err(RepositoryError::NotFound) => FlashMessage::danger(not_found),
        Err(e) => {
            tracing::error!(error = %e, "Admin deletion failed");
            FlashMessage::danger(UNEXPECTED_ERROR)
        }
    };
    push_flash(session, flash).await?;
    Ok(Redirect::to(back))
}
