//! Integration test harness for the todo service.
//!
//! Drives the full router (sessions, anti-forgery checks, middleware) in
//! process with `tower::ServiceExt::oneshot`. Data lives in an
//! [`InMemoryStore`] and sessions in a `tower_sessions::MemoryStore`, so no
//! database is needed.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p todo-app-integration-tests
//! ```

#![allow(clippy::missing_panics_doc, clippy::expect_used)]

use axum::{
    Router,
    body::Body,
    http::{HeaderMap, Method, Request, StatusCode, header},
};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;
use tower_sessions::MemoryStore;

use todo_app_web::config::WebConfig;
use todo_app_web::db::InMemoryStore;
use todo_app_web::middleware::{CSRF_HEADER, SESSION_COOKIE_NAME, configure_session_layer};
use todo_app_web::routes;
use todo_app_web::state::AppState;

/// Password used by [`TestApp::register`].
pub const TEST_PASSWORD: &str = "correct horse battery";

/// A logged-in client: its session cookie and anti-forgery token.
#[derive(Debug, Clone)]
pub struct TestSession {
    pub cookie: String,
    pub csrf_token: String,
    pub user_id: String,
}

impl TestSession {
    /// The same session presenting a different anti-forgery token.
    #[must_use]
    pub fn with_token(&self, token: &str) -> Self {
        Self {
            csrf_token: token.to_owned(),
            ..self.clone()
        }
    }
}

/// A response with its body decoded.
///
/// JSON bodies are parsed; anything else is kept as a JSON string, and an
/// empty body is `Value::Null`.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl TestResponse {
    /// `id` field of the body as an integer.
    #[must_use]
    pub fn id(&self) -> i64 {
        self.body["id"].as_i64().expect("response body has no numeric id")
    }

    /// The `name=value` pair of the session cookie set by this response.
    #[must_use]
    pub fn session_cookie(&self) -> Option<String> {
        self.headers
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .filter_map(|v| v.split(';').next())
            .find(|pair| pair.starts_with(&format!("{SESSION_COOKIE_NAME}=")))
            .map(str::to_owned)
    }
}

/// The application under test.
#[derive(Clone)]
pub struct TestApp {
    router: Router,
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}

impl TestApp {
    /// A fresh application with empty stores.
    #[must_use]
    pub fn new() -> Self {
        Self::with_stores(InMemoryStore::new(), MemoryStore::default())
    }

    /// An application over existing stores. Apps built from clones of the
    /// same stores share their data and sessions.
    #[must_use]
    pub fn with_stores(store: InMemoryStore, sessions: MemoryStore) -> Self {
        let session_layer = configure_session_layer(sessions, &WebConfig::in_memory());
        Self {
            router: routes::app(AppState::in_memory(store), session_layer),
        }
    }

    /// Send a raw request.
    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("body can be read")
            .to_bytes();

        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };

        TestResponse {
            status,
            headers,
            body,
        }
    }

    /// `GET uri`, optionally within a session.
    pub async fn get(&self, uri: &str, session: Option<&TestSession>) -> TestResponse {
        let mut builder = Request::builder().method(Method::GET).uri(uri);
        if let Some(session) = session {
            builder = builder.header(header::COOKIE, &session.cookie);
        }
        self.send(builder.body(Body::empty()).expect("valid request"))
            .await
    }

    /// `POST uri` with a form body, optionally within a session.
    ///
    /// The session's anti-forgery token is sent in the `x-csrf-token` header.
    pub async fn post(
        &self,
        uri: &str,
        session: Option<&TestSession>,
        form: &[(&str, &str)],
    ) -> TestResponse {
        let mut builder = Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
        if let Some(session) = session {
            builder = builder
                .header(header::COOKIE, &session.cookie)
                .header(CSRF_HEADER, &session.csrf_token);
        }
        self.send(
            builder
                .body(Body::from(encode_form(form)))
                .expect("valid request"),
        )
        .await
    }

    /// Register `user_name` with [`TEST_PASSWORD`] and return the session.
    pub async fn register(&self, user_name: &str) -> TestSession {
        let response = self
            .post(
                "/auth/register",
                None,
                &[("userName", user_name), ("password", TEST_PASSWORD)],
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);
        session_from(&response)
    }

    /// Attempt a login. Use [`session_from`] on a successful response.
    pub async fn login(&self, user_name: &str, password: &str) -> TestResponse {
        self.post(
            "/auth/login",
            None,
            &[("userName", user_name), ("password", password)],
        )
        .await
    }

    /// Create a list and return its id.
    pub async fn create_list(&self, session: &TestSession, name: &str) -> i64 {
        let response = self
            .post(
                "/lists",
                Some(session),
                &[("name", name), ("description", "created in a test")],
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);
        response.id()
    }

    /// Create an item in `list_id` and return its id.
    pub async fn create_item(&self, session: &TestSession, list_id: i64, name: &str) -> i64 {
        let list_id = list_id.to_string();
        let response = self
            .post(
                "/items",
                Some(session),
                &[
                    ("name", name),
                    ("description", "created in a test"),
                    ("todoListId", &list_id),
                ],
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);
        response.id()
    }
}

/// Build a session from a login or registration response.
#[must_use]
pub fn session_from(response: &TestResponse) -> TestSession {
    TestSession {
        cookie: response
            .session_cookie()
            .expect("login response sets the session cookie"),
        csrf_token: response.body["csrfToken"]
            .as_str()
            .expect("login response carries a csrf token")
            .to_owned(),
        user_id: response.body["userId"]
            .as_str()
            .expect("login response carries the user id")
            .to_owned(),
    }
}

fn encode_form(form: &[(&str, &str)]) -> String {
    form.iter()
        .map(|(key, value)| format!("{}={}", urlencoding::encode(key), urlencoding::encode(value)))
        .collect::<Vec<_>>()
        .join("&")
}
