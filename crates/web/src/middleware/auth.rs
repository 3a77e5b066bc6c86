//! Authentication extractors and session helpers.
//!
//! Handlers never read an ambient "current user": they extract one of these
//! and pass the resulting [`UserId`] into the access services.

use axum::{extract::FromRequestParts, http::request::Parts};
use tower_sessions::Session;

use todo_app_core::UserId;

use super::csrf::CsrfToken;
use crate::error::AppError;
use crate::models::{CurrentUser, User, session_keys};

/// Extractor that requires an authenticated session.
///
/// Rejects with `401 Unauthorized` if nobody is logged in.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireAuth(user): RequireAuth,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", user.user_name)
/// }
/// ```
pub struct RequireAuth(pub CurrentUser);

impl<S> FromRequestParts<S> for RequireAuth
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let OptionalAuth(user) = OptionalAuth::from_request_parts(parts, state)
            .await
            .unwrap_or(OptionalAuth(None));

        user.map(Self).ok_or(AppError::Unauthorized)
    }
}

/// Extractor that optionally gets the current user.
///
/// Unlike `RequireAuth`, this does not reject the request if nobody is logged in.
pub struct OptionalAuth(pub Option<CurrentUser>);

impl OptionalAuth {
    /// The caller's id, or [`UserId::anonymous`] without a session.
    ///
    /// The anonymous id owns nothing, so ownership-checked reads made with it
    /// come back not found.
    #[must_use]
    pub fn user_id(&self) -> UserId {
        self.0
            .as_ref()
            .map_or_else(UserId::anonymous, |user| user.id.clone())
    }
}

impl<S> FromRequestParts<S> for OptionalAuth
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = match parts.extensions.get::<Session>() {
            Some(session) => session
                .get::<CurrentUser>(session_keys::CURRENT_USER)
                .await
                .ok()
                .flatten(),
            None => None,
        };

        Ok(Self(user))
    }
}

/// Log `user` in: cycle the session id, store the user and a fresh
/// anti-forgery token.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_current_user(
    session: &Session,
    user: &User,
) -> Result<(CurrentUser, CsrfToken), tower_sessions::session::Error> {
    session.cycle_id().await?;

    let current = CurrentUser::from(user);
    let token = CsrfToken::generate();
    session
        .insert(session_keys::CURRENT_USER, &current)
        .await?;
    session.insert(session_keys::CSRF_TOKEN, &token).await?;

    Ok((current, token))
}

/// Helper to end the session (logout).
///
/// # Errors
///
/// Returns an error if the session cannot be deleted from the store.
pub async fn clear_current_user(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session.flush().await
}
