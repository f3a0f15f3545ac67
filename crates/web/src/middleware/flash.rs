//! Session-backed flash messages and the per-page context.
//!
//! Messages queue up in the session under [`session_keys::FLASH`] and are
//! drained the next time a page renders, so they survive exactly one redirect.

use axum::{extract::FromRequestParts, http::request::Parts};
use tower_sessions::Session;

use crate::error::AppError;
use crate::models::{CurrentUser, FlashMessage, session_keys};

/// Queue one flash message.
///
/// # Errors
///
/// Returns an error if the session cannot be read or written.
pub async fn push_flash(
    session: &Session,
    message: FlashMessage,
) -> Result<(), tower_sessions::session::Error> {
    push_flashes(session, [message]).await
}

/// Queue several flash messages, keeping their order.
///
/// # Errors
///
/// Returns an error if the session cannot be read or written.
pub async fn push_flashes(
    session: &Session,
    messages: impl IntoIterator<Item = FlashMessage>,
) -> Result<(), tower_sessions::session::Error> {
    let mut queued: Vec<FlashMessage> = session
        .get(session_keys::FLASH)
        .await?
        .unwrap_or_default();
    queued.extend(messages);
    session.insert(session_keys::FLASH, queued).await
}

/// Take every queued flash message, leaving the queue empty.
///
/// # Errors
///
/// Returns an error if the session cannot be read or written.
pub async fn drain_flashes(
    session: &Session,
) -> Result<Vec<FlashMessage>, tower_sessions::session::Error> {
    Ok(session
        .remove::<Vec<FlashMessage>>(session_keys::FLASH)
        .await?
        .unwrap_or_default())
}

/// What every rendered page needs: who is looking, and what to tell them.
///
/// Extracting this drains the flash queue, so only handlers that always
/// render should take it as an argument. Handlers that may still redirect
/// call [`PageContext::load`] once they know they will render.
#[derive(Debug, Clone, Default)]
pub struct PageContext {
    pub current_user: Option<CurrentUser>,
    pub flashes: Vec<FlashMessage>,
}

impl PageContext {
    /// Read the identity and drain the flash queue from a session.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Session` if the session store fails.
    pub async fn load(session: &Session) -> Result<Self, AppError> {
        let current_user = session
            .get::<CurrentUser>(session_keys::CURRENT_USER)
            .await?;
        let flashes = drain_flashes(session).await?;
        Ok(Self {
            current_user,
            flashes,
        })
    }

    /// Whether the viewer is an administrator.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.current_user.as_ref().is_some_and(CurrentUser::is_admin)
    }
}

impl<S> FromRequestParts<S> for PageContext
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let session = parts
            .extensions
            .get::<Session>()
            .ok_or_else(|| AppError::Internal("session layer missing".to_string()))?;
        Self::load(session).await
    }
}
