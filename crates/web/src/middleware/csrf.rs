//! Anti-forgery token middleware.
//!
//! A token is issued into the session at login. Every state-changing request
//! behind this middleware must echo it in the `x-csrf-token` header.

use axum::{
    extract::Request,
    http::Method,
    middleware::Next,
    response::{IntoResponse, Response},
};
use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use crate::error::AppError;
use crate::models::session_keys;

/// The HTTP header carrying the anti-forgery token.
pub const CSRF_HEADER: &str = "x-csrf-token";

/// A per-session anti-forgery token (128-bit, base64url-encoded).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CsrfToken(String);

impl CsrfToken {
    /// Generate a new random token.
    #[must_use]
    pub fn generate() -> Self {
        let mut bytes = [0u8; 16];
        rand::rng().fill_bytes(&mut bytes);
        Self(URL_SAFE_NO_PAD.encode(bytes))
    }

    /// Get the token value to hand to the client.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.0
    }

    /// Compare against a submitted value without short-circuiting on the
    /// first differing byte.
    #[must_use]
    pub fn matches(&self, submitted: &str) -> bool {
        let expected = self.0.as_bytes();
        let submitted = submitted.as_bytes();
        expected.len() == submitted.len()
            && expected
                .iter()
                .zip(submitted)
                .fold(0u8, |acc, (a, b)| acc | (a ^ b))
                == 0
    }
}

/// Reject unsafe requests whose `x-csrf-token` header does not match the
/// session's token.
///
/// Safe methods pass through. A request without a session token (nobody
/// logged in) is rejected the same way as a mismatch.
pub async fn require_csrf_token(request: Request, next: Next) -> Response {
    if matches!(*request.method(), Method::GET | Method::HEAD | Method::OPTIONS) {
        return next.run(request).await;
    }

    let submitted = request
        .headers()
        .get(CSRF_HEADER)
        .and_then(|h| h.to_str().ok())
        .map(str::to_owned);

    let session = request.extensions().get::<Session>().cloned();
    let expected = match session {
        Some(session) => session
            .get::<CsrfToken>(session_keys::CSRF_TOKEN)
            .await
            .ok()
            .flatten(),
        None => None,
    };

    match (expected, submitted) {
        (Some(expected), Some(submitted)) if expected.matches(&submitted) => {
            next.run(request).await
        }
        _ => {
            tracing::debug!(path = %request.uri().path(), "anti-forgery token missing or invalid");
            AppError::Forbidden("invalid anti-forgery token".to_string()).into_response()
        }
    }
}
