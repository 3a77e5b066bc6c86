//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Liveness check
//! GET  /health/ready           - Readiness check (store reachable)
//!
//! # Lists
//! GET  /lists                  - Caller's lists
//! GET  /lists/new              - Blank list form (requires auth)
//! POST /lists                  - Create list (requires auth)
//! GET  /lists/{id}             - List detail
//! POST /lists/{id}             - Update list
//! GET  /lists/{id}/edit        - List as edit form
//! GET  /lists/{id}/delete      - Delete confirmation
//! POST /lists/{id}/delete      - Delete list and its items
//!
//! # Items
//! GET  /items?listId=          - List with its items
//! GET  /items/new?listId=      - Blank item form
//! POST /items                  - Create item (requires auth)
//! GET  /items/{id}             - Item detail
//! POST /items/{id}             - Update item
//! GET  /items/{id}/edit        - Item as edit form
//! POST /items/{id}/status      - Update status only
//! GET  /items/{id}/delete      - Delete confirmation
//! POST /items/{id}/delete      - Delete item
//!
//! # Auth
//! POST /auth/register          - Create account and log in
//! POST /auth/login             - Log in
//! POST /auth/logout            - Log out
//! GET  /auth/session           - Current session document
//! ```
//!
//! Every `POST` under `/lists` and `/items`, and logout, requires the
//! session's anti-forgery token in the `x-csrf-token` header.

pub mod auth;
pub mod items;
pub mod lists;

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    middleware::from_fn,
    routing::{get, post},
};
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tower_sessions::{SessionManagerLayer, SessionStore};
use tracing::Span;

use crate::middleware::{request_id_middleware, require_csrf_token, security_headers_middleware};
use crate::state::AppState;

/// Create the list routes router.
pub fn list_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(lists::index).post(lists::create))
        .route("/new", get(lists::new_form))
        .route("/{id}", get(lists::show).post(lists::update))
        .route("/{id}/edit", get(lists::edit_form))
        .route(
            "/{id}/delete",
            get(lists::delete_confirm).post(lists::delete),
        )
        .route_layer(from_fn(require_csrf_token))
}

/// Create the item routes router.
pub fn item_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(items::index).post(items::create))
        .route("/new", get(items::new_form))
        .route("/{id}", get(items::show).post(items::update))
        .route("/{id}/edit", get(items::edit_form))
        .route("/{id}/status", post(items::update_status))
        .route(
            "/{id}/delete",
            get(items::delete_confirm).post(items::delete),
        )
        .route_layer(from_fn(require_csrf_token))
}

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route(
            "/logout",
            post(auth::logout).layer(from_fn(require_csrf_token)),
        )
        .route("/session", get(auth::session_info))
}

/// Create all routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .nest("/lists", list_routes())
        .nest("/items", item_routes())
        .nest("/auth", auth_routes())
}

/// Assemble the application: routes, sessions, security headers, request ids
/// and request tracing.
///
/// The session store is a parameter so tests can run without `PostgreSQL`.
pub fn app<S>(state: AppState, session_layer: SessionManagerLayer<S>) -> Router
where
    S: SessionStore + Clone,
{
    routes()
        .layer(session_layer)
        .layer(from_fn(security_headers_middleware))
        .layer(from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = tracing::field::Empty,
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &Span| {
                        span.record("status", response.status().as_u16());
                        span.record(
                            "latency_ms",
                            u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                        );
                        DefaultOnResponse::default().on_response(response, latency, span);
                    },
                ),
        )
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
    match state.todos().ping().await {
        Ok(()) => StatusCode::OK,
        Err(e) => {
            tracing::warn!(error = %e, "readiness check failed");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}
