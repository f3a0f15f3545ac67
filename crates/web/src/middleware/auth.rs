//! Identity extractors.
//!
//! The logged-in identity lives in the session as a [`CurrentUser`]. Gated
//! handlers take [`RequireUser`] or [`RequireAdmin`] as their first argument,
//! so a rejected request never reaches form parsing or the store.
//!
//! The gates re-read the account on every request: a deleted account loses
//! its session identity and a changed role applies immediately.

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

use super::flash::push_flash;
use crate::db::UserRepository;
use crate::models::{CurrentUser, FlashMessage, session_keys};
use crate::state::AppState;

/// Extractor that requires a logged-in user.
///
/// Anonymous requests get a warning flash and a redirect to `/login`.
///
/// ```rust,ignore
/// async fn handler(RequireUser(user): RequireUser) -> impl IntoResponse {
///     format!("Hello, {}!", user.full_name)
/// }
/// ```
pub struct RequireUser(pub CurrentUser);

/// Extractor that requires a logged-in administrator.
///
/// Anonymous and non-admin requests get "Access denied." and a redirect to `/`.
pub struct RequireAdmin(pub CurrentUser);

/// Error returned when a gate rejects the request.
#[derive(Debug)]
pub enum AuthRejection {
    /// Redirect elsewhere; the explanatory flash is already queued.
    Redirect(&'static str),
    /// The session layer is missing or its store failed.
    SessionUnavailable,
    /// The account could not be re-read.
    StoreUnavailable,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::Redirect(to) => Redirect::to(to).into_response(),
            Self::SessionUnavailable => {
                tracing::error!("Session unavailable during identity check");
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
            Self::StoreUnavailable => {
                tracing::error!("Account lookup failed during identity check");
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
        }
    }
}

/// Load the session and the identity stored in it, refreshed from the store.
async fn identity(
    parts: &Parts,
    state: &AppState,
) -> Result<(Session, Option<CurrentUser>), AuthRejection> {
    let session = parts
        .extensions
        .get::<Session>()
        .cloned()
        .ok_or(AuthRejection::SessionUnavailable)?;
    let Some(cached) = session
        .get::<CurrentUser>(session_keys::CURRENT_USER)
        .await
        .map_err(|_| AuthRejection::SessionUnavailable)?
    else {
        return Ok((session, None));
    };

    let account = UserRepository::new(state.pool())
        .get_by_id(cached.id)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, user_id = %cached.id, "Failed to re-read account");
            AuthRejection::StoreUnavailable
        })?;

    match account {
        Some(user) => {
            let fresh = CurrentUser::from(&user);
            if fresh != cached {
                set_current_user(&session, &fresh)
                    .await
                    .map_err(|_| AuthRejection::SessionUnavailable)?;
            }
            Ok((session, Some(fresh)))
        }
        None => {
            tracing::info!(user_id = %cached.id, "Session identity refers to a deleted account");
            clear_current_user(&session)
                .await
                .map_err(|_| AuthRejection::SessionUnavailable)?;
            Ok((session, None))
        }
    }
}

/// Queue `message` and reject with a redirect to `to`.
async fn deny(session: &Session, message: FlashMessage, to: &'static str) -> AuthRejection {
    if push_flash(session, message).await.is_err() {
        return AuthRejection::SessionUnavailable;
    }
    AuthRejection::Redirect(to)
}

impl FromRequestParts<AppState> for RequireUser {
    type Rejection = AuthRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match identity(parts, state).await? {
            (_, Some(user)) => Ok(Self(user)),
            (session, None) => Err(deny(
                &session,
                FlashMessage::warning("Please log in to apply for an event."),
                "/login",
            )
            .await),
        }
    }
}

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AuthRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match identity(parts, state).await? {
            (_, Some(user)) if user.is_admin() => Ok(Self(user)),
            (session, user) => {
                tracing::warn!(
                    path = %parts.uri.path(),
                    user_id = user.as_ref().map(|u| u.id.as_i64()),
                    "Admin access denied"
                );
                Err(deny(&session, FlashMessage::danger("Access denied."), "/").await)
            }
        }
    }
}

/// Helper to set the current user in the session.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_current_user(
    session: &Session,
    user: &CurrentUser,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(session_keys::CURRENT_USER, user).await
}

/// Helper to clear the current user from the session (logout).
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn clear_current_user(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session
        .remove::<CurrentUser>(session_keys::CURRENT_USER)
        .await?;
    Ok(())
}
