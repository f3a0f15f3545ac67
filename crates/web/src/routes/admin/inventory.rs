//! Admin inventory listing and removal.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, State},
    response::Redirect,
};
use tower_sessions::Session;
use tracing::instrument;

use fyay_core::ProductId;

use super::finish_delete;
use crate::db::InventoryRepository;
use crate::error::Result;
use crate::filters;
use crate::middleware::{PageContext, RequireAdmin};
use crate::models::InventoryItem;
use crate::state::AppState;

/// Inventory page template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/inventory.html")]
pub struct InventoryTemplate {
    pub ctx: PageContext,
    pub inventory: Vec<InventoryItem>,
}

/// Display every inventory row.
///
/// # Errors
///
/// Returns `AppError::Database` if the inventory cannot be read.
#[instrument(skip_all)]
pub async fn index(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    ctx: PageContext,
) -> Result<InventoryTemplate> {
    let inventory = InventoryRepository::new(state.pool()).list_all().await?;
    Ok(InventoryTemplate { ctx, inventory })
}

/// Delete a product along with its ledger rows.
///
/// # Errors
///
/// Returns `AppError::Session` if the outcome cannot be flashed.
#[instrument(skip_all, fields(product_id = %id))]
pub async fn delete(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<ProductId>,
) -> Result<Redirect> {
    let result = InventoryRepository::new(state.pool()).delete(id).await;
    if result.is_ok() {
        tracing::info!("Inventory item deleted");
    }
    finish_delete(
        &session,
        result,
        (
            "Inventory item deleted successfully!",
            "Inventory item not found.",
        ),
        "/admin/inventory",
    )
    .await
}
