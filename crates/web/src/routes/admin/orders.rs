//! Stock orders: listing, placement, and removal.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, State},
    response::Redirect,
};
use tower_sessions::Session;
use tracing::instrument;

use fyay_core::OrderId;

use super::finish_delete;
use crate::db::OrderRepository;
use crate::error::Result;
use crate::filters;
use crate::middleware::{PageContext, RequireAdmin, push_flash, push_flashes};
use crate::models::{FlashMessage, Order};
use crate::routes::UNEXPECTED_ERROR;
use crate::services::ledger::{InventoryLedger, NewOrder, OrderForm};
use crate::state::AppState;

/// Orders page template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/orders.html")]
pub struct OrdersTemplate {
    pub ctx: PageContext,
    pub orders: Vec<Order>,
}

/// Display all orders, newest first, with the order form.
///
/// # Errors
///
/// Returns `AppError::Database` if the orders cannot be read.
#[instrument(skip_all)]
pub async fn index(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    ctx: PageContext,
) -> Result<OrdersTemplate> {
    let orders = OrderRepository::new(state.pool())
        .list_newest_first()
        .await?;
    Ok(OrdersTemplate { ctx, orders })
}

/// Place a stock order, restocking or creating the product.
///
/// # Errors
///
/// Returns `AppError::Session` if the outcome cannot be flashed.
#[instrument(skip_all, fields(admin_id = %admin.id))]
pub async fn place(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<OrderForm>,
) -> Result<Redirect> {
    let order = match NewOrder::parse(&form) {
        Ok(order) => order,
        Err(errors) => {
            push_flashes(&session, errors.into_iter().map(FlashMessage::danger)).await?;
            return Ok(Redirect::to("/admin/orders"));
        }
    };

    let flash = match InventoryLedger::new(state.pool()).place_order(&order).await {
        Ok(_) => FlashMessage::success("Order placed successfully and inventory updated."),
        Err(e) => {
            tracing::error!(error = %e, "Failed to place order");
            FlashMessage::danger(UNEXPECTED_ERROR)
        }
    };
    push_flash(&session, flash).await?;
    Ok(Redirect::to("/admin/orders"))
}

/// Delete an order record. Stock is not adjusted.
///
/// # Errors
///
/// Returns `AppError::Session` if the outcome cannot be flashed.
#[instrument(skip_all, fields(order_id = %id))]
pub async fn delete(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<OrderId>,
) -> Result<Redirect> {
    let result = OrderRepository::new(state.pool()).delete(id).await;
    finish_delete(
        &session,
        result,
        ("Order deleted successfully!", "Order not found."),
        "/admin/orders",
    )
    .await
}
