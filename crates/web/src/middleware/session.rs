//! Session middleware configuration.
//!
//! Sets up `SQLite`-backed sessions using tower-sessions.

use tower_sessions::{Expiry, SessionManagerLayer};
use tower_sessions_sqlx_store::SqliteStore;

use crate::config::AppConfig;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "fyay_session";

/// Create the session layer over an already-migrated store.
///
/// Cookies are marked `Secure` only when the site is served over HTTPS.
#[must_use]
pub fn create_session_layer(
    store: SqliteStore,
    config: &AppConfig,
) -> SessionManagerLayer<SqliteStore> {
    SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::days(config.session_expiry_days),
        ))
        .with_secure(config.secure_cookies())
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
}
