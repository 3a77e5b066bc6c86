//! Application state shared across handlers.

use std::sync::Arc;

use crate::db::{InMemoryStore, PgStore, TodoStore, UserStore};
use crate::services::{AuthService, ItemAccessService, ListAccessService};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// the configured stores.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    todos: Arc<dyn TodoStore>,
    users: Arc<dyn UserStore>,
}

impl AppState {
    /// Create a new application state from explicit stores.
    #[must_use]
    pub fn new(todos: Arc<dyn TodoStore>, users: Arc<dyn UserStore>) -> Self {
        Self {
            inner: Arc::new(AppStateInner { todos, users }),
        }
    }

    /// State backed by `PostgreSQL`.
    #[must_use]
    pub fn postgres(store: PgStore) -> Self {
        let store = Arc::new(store);
        Self::new(store.clone(), store)
    }

    /// State backed by process memory.
    #[must_use]
    pub fn in_memory(store: InMemoryStore) -> Self {
        let store = Arc::new(store);
        Self::new(store.clone(), store)
    }

    /// Get the list and item store.
    #[must_use]
    pub fn todos(&self) -> &dyn TodoStore {
        self.inner.todos.as_ref()
    }

    /// Get the account store.
    #[must_use]
    pub fn users(&self) -> &dyn UserStore {
        self.inner.users.as_ref()
    }

    /// List access service over this state's store.
    #[must_use]
    pub fn lists(&self) -> ListAccessService<'_> {
        ListAccessService::new(self.todos())
    }

    /// Item access service over this state's store.
    #[must_use]
    pub fn items(&self) -> ItemAccessService<'_> {
        ItemAccessService::new(self.todos())
    }

    /// Authentication service over this state's account store.
    #[must_use]
    pub fn auth(&self) -> AuthService<'_> {
        AuthService::new(self.users())
    }
}
