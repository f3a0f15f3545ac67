//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                         - Home page
//! GET  /service                  - Services page
//! GET  /about-us                 - About page
//! GET  /contact                  - Contact page
//! GET  /events                   - Event listing (applied marks for the viewer)
//! GET  /health                   - Liveness check
//! GET  /health/ready             - Store reachability check
//!
//! # Auth
//! GET  /register                 - Registration page
//! POST /register                 - Registration action
//! GET  /login                    - Login page
//! POST /login                    - Login action
//! GET  /logout                   - Logout action
//!
//! # Booking (requires login)
//! GET  /book_event/{id}          - Booking form
//! POST /book_event/{id}          - Booking action
//!
//! # Admin (requires admin role)
//! GET  /admin/dashboard          - Accounts, events, and inventory
//! GET  /admin/inventory          - Inventory listing
//! GET  /admin/users              - Account listing
//! GET  /admin/manage_events      - Events and creation form
//! POST /admin/manage_events      - Create event
//! GET  /admin/create_event       - Creation form
//! POST /admin/create_event       - Create event
//! GET  /admin/orders             - Orders and order form
//! POST /admin/orders             - Place order
//! POST /admin/delete_event/{id}  - Delete event and restock
//! POST /admin/delete_inventory/{id}
//! POST /admin/delete_order/{id}
//! POST /admin/delete_user/{id}
//! ```

pub mod admin;
pub mod auth;
pub mod booking;
pub mod events;
pub mod pages;

use axum::{
    Router,
    extract::State,
    http::{StatusCode, Uri},
    middleware as axum_middleware,
    routing::get,
};
use tower_http::{services::ServeDir, trace::TraceLayer};
use tower_sessions::SessionManagerLayer;
use tower_sessions_sqlx_store::SqliteStore;

use crate::error::AppError;
use crate::middleware::{request_id_middleware, security_headers_middleware};
use crate::state::AppState;

/// Flash shown when an operation fails for reasons the user cannot fix.
pub const UNEXPECTED_ERROR: &str = "An unexpected error occurred. Please try again.";

/// Directory served under `/static`.
const STATIC_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/static");

/// Create all page routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Public pages
        .route("/", get(pages::index))
        .route("/service", get(pages::service))
        .route("/about-us", get(pages::about_us))
        .route("/contact", get(pages::contact))
        .route("/events", get(events::index))
        // Auth
        .route("/register", get(auth::register_page).post(auth::register))
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/logout", get(auth::logout))
        // Booking
        .route(
            "/book_event/{event_id}",
            get(booking::book_event_page).post(booking::book_event),
        )
        // Admin
        .nest("/admin", admin::admin_routes())
}

/// Build the complete application: routes, static files, and middleware.
///
/// Sentry layers are added by the binary, outside this router.
pub fn app(state: AppState, session_layer: SessionManagerLayer<SqliteStore>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .merge(routes())
        .nest_service("/static", ServeDir::new(STATIC_DIR))
        .fallback(not_found)
        .layer(session_layer)
        .layer(axum_middleware::from_fn(security_headers_middleware))
        .layer(axum_middleware::from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Returns 503 Service Unavailable if the store is not reachable.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    match sqlx::query("SELECT 1").fetch_one(state.pool()).await {
        Ok(_) => StatusCode::OK,
        Err(e) => {
            tracing::warn!(error = %e, "Readiness check failed");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}

async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(uri.path().to_string())
}
