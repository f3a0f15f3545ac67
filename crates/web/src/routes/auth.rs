//! Authentication route handlers.
//!
//! Registration, password login, and logout. Every outcome is reported with
//! flash messages followed by a redirect.

use askama::Template;
use askama_web::WebTemplate;
use axum::{Form, extract::State, response::Redirect};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{Result, clear_sentry_user, set_sentry_user};
use crate::filters;
use crate::middleware::{
    PageContext, clear_current_user, push_flash, push_flashes, set_current_user,
};
use crate::models::{CurrentUser, FlashMessage};
use crate::routes::UNEXPECTED_ERROR;
use crate::services::auth::{AuthError, AuthService};
use crate::state::AppState;

// =============================================================================
// Form Types
// =============================================================================

/// Login form data.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// Registration form data.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RegisterForm {
    pub full_name: String,
    pub email: String,
    pub password: String,
}

// =============================================================================
// Templates
// =============================================================================

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub ctx: PageContext,
}

/// Register page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/register.html")]
pub struct RegisterTemplate {
    pub ctx: PageContext,
}

/// Queue the messages for a failed auth attempt.
async fn flash_auth_error(session: &Session, err: &AuthError) -> Result<()> {
    if let Some(messages) = err.user_messages() {
        push_flashes(session, messages.into_iter().map(FlashMessage::danger)).await?;
    } else {
        tracing::error!(error = %err, "Authentication failed unexpectedly");
        push_flash(session, FlashMessage::danger(UNEXPECTED_ERROR)).await?;
    }
    Ok(())
}

// =============================================================================
// Registration
// =============================================================================

/// Display the registration page.
#[instrument(skip_all)]
pub async fn register_page(ctx: PageContext) -> RegisterTemplate {
    RegisterTemplate { ctx }
}

/// Handle registration form submission.
///
/// # Errors
///
/// Returns `AppError::Session` if flash messages cannot be stored.
#[instrument(skip_all)]
pub async fn register(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<RegisterForm>,
) -> Result<Redirect> {
    let auth = AuthService::new(state.pool());

    match auth
        .register(&form.full_name, &form.email, &form.password)
        .await
    {
        Ok(_) => {
            push_flash(
                &session,
                FlashMessage::success("Registration successful! Please log in."),
            )
            .await?;
            Ok(Redirect::to("/login"))
        }
        Err(err) => {
            flash_auth_error(&session, &err).await?;
            Ok(Redirect::to("/register"))
        }
    }
}

// =============================================================================
// Login / Logout
// =============================================================================

/// Display the login page.
#[instrument(skip_all)]
pub async fn login_page(ctx: PageContext) -> LoginTemplate {
    LoginTemplate { ctx }
}

/// Handle login form submission.
///
/// A fresh session id is issued on success.
///
/// # Errors
///
/// Returns `AppError::Session` if the session cannot be updated.
#[instrument(skip_all)]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Redirect> {
    let auth = AuthService::new(state.pool());

    match auth.login(&form.email, &form.password).await {
        Ok(user) => {
            session.cycle_id().await?;
            set_current_user(&session, &CurrentUser::from(&user)).await?;
            set_sentry_user(&user.id, Some(user.email.as_str()));
            tracing::info!(user_id = %user.id, "User logged in");

            push_flash(&session, FlashMessage::success("Login successful!")).await?;
            Ok(Redirect::to("/"))
        }
        Err(err) => {
            if matches!(err, AuthError::InvalidCredentials) {
                tracing::info!("Login rejected");
            }
            flash_auth_error(&session, &err).await?;
            Ok(Redirect::to("/login"))
        }
    }
}

/// Log out the current user.
///
/// # Errors
///
/// Returns `AppError::Session` if the session cannot be updated.
#[instrument(skip_all)]
pub async fn logout(session: Session) -> Result<Redirect> {
    clear_current_user(&session).await?;
    clear_sentry_user();

    push_flash(&session, FlashMessage::info("You have been logged out.")).await?;
    Ok(Redirect::to("/"))
}
