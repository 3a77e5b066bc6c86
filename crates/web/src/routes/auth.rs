//! Authentication route handlers.
//!
//! Registration, login and logout for password accounts. A successful login
//! returns the anti-forgery token the client must echo on every write.

use axum::{Form, Json, extract::State, http::StatusCode};
use serde::Deserialize;
use tower_sessions::Session;

use crate::error::{AppError, Result, clear_sentry_user, set_sentry_user};
use crate::middleware::{CsrfToken, RequireAuth, clear_current_user, set_current_user};
use crate::models::{SessionInfo, User, session_keys};
use crate::state::AppState;

/// Login and registration form data.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialsForm {
    #[serde(default)]
    pub user_name: String,
    #[serde(default)]
    pub password: String,
}

/// Create an account and log it in.
pub async fn register(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<CredentialsForm>,
) -> Result<(StatusCode, Json<SessionInfo>)> {
    let user = state.auth().register(&form.user_name, &form.password).await?;
    let info = start_session(&session, &user).await?;
    Ok((StatusCode::CREATED, Json(info)))
}

/// Log in with user name and password.
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<CredentialsForm>,
) -> Result<Json<SessionInfo>> {
    let user = state
        .auth()
        .login(&form.user_name, &form.password)
        .await
        .inspect_err(|_| tracing::info!("failed login attempt"))?;
    let info = start_session(&session, &user).await?;
    Ok(Json(info))
}

/// End the session.
pub async fn logout(session: Session) -> Result<StatusCode> {
    clear_current_user(&session).await?;
    clear_sentry_user();
    Ok(StatusCode::NO_CONTENT)
}

/// The caller's session document.
///
/// The account is read back from the store, so a session outliving its
/// account is ended instead of reported.
pub async fn session_info(
    State(state): State<AppState>,
    session: Session,
    RequireAuth(current): RequireAuth,
) -> Result<Json<SessionInfo>> {
    let Some(user) = state.users().get_user(&current.id).await? else {
        tracing::info!(user_id = %current.id, "session refers to unknown account");
        clear_current_user(&session).await?;
        return Err(AppError::Unauthorized);
    };

    let token: CsrfToken = session
        .get(session_keys::CSRF_TOKEN)
        .await?
        .ok_or(AppError::Unauthorized)?;

    Ok(Json(SessionInfo {
        user_id: user.id,
        user_name: user.user_name,
        csrf_token: token.value().to_owned(),
    }))
}

async fn start_session(session: &Session, user: &User) -> Result<SessionInfo> {
    let (current, token) = set_current_user(session, user).await?;
    set_sentry_user(&current.id, current.user_name.as_str());
    tracing::info!(user_id = %current.id, "user logged in");

    Ok(SessionInfo {
        user_id: current.id,
        user_name: current.user_name,
        csrf_token: token.value().to_owned(),
    })
}
