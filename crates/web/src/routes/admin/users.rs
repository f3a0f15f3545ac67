//! Admin account listing and removal.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, State},
    response::Redirect,
};
use tower_sessions::Session;
use tracing::instrument;

use fyay_core::UserId;

use super::finish_delete;
use crate::db::UserRepository;
use crate::error::Result;
use crate::filters;
use crate::middleware::{PageContext, RequireAdmin, push_flash};
use crate::models::{AccountSummary, FlashMessage};
use crate::state::AppState;

/// Users page template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/users.html")]
pub struct UsersTemplate {
    pub ctx: PageContext,
    pub accounts: Vec<AccountSummary>,
}

/// Display every account with its bookings.
///
/// # Errors
///
/// Returns `AppError::Database` if the accounts cannot be read.
#[instrument(skip_all)]
pub async fn index(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    ctx: PageContext,
) -> Result<UsersTemplate> {
    let accounts = UserRepository::new(state.pool()).list_accounts().await?;
    Ok(UsersTemplate { ctx, accounts })
}

/// Delete an account and, by cascade, its bookings.
///
/// An administrator cannot delete their own account.
///
/// # Errors
///
/// Returns `AppError::Session` if the outcome cannot be flashed.
#[instrument(skip_all, fields(admin_id = %admin.id, user_id = %id))]
pub async fn delete(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<UserId>,
) -> Result<Redirect> {
    if id == admin.id {
        push_flash(
            &session,
            FlashMessage::danger("You cannot delete your own account!"),
        )
        .await?;
        return Ok(Redirect::to("/admin/users"));
    }

    let result = UserRepository::new(state.pool()).delete(id).await;
    if result.is_ok() {
        tracing::info!("User deleted");
    }
    finish_delete(
        &session,
        result,
        ("User deleted successfully!", "User not found."),
        "/admin/users",
    )
    .await
}
