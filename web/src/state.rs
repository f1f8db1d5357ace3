//! Application state for the HTTP server.

use gatehouse_core::AdmissionService;
use gatehouse_postgres::PostgresStore;
use std::sync::Arc;

/// Application state shared across all HTTP handlers.
///
/// Cloned (cheaply, via `Arc`) for each request.
#[derive(Clone)]
pub struct AppState {
    /// The admission subsystem all handlers delegate to
    pub admission: AdmissionService,
    /// Connection pool behind the store, when postgres-backed; used by the
    /// readiness check. `None` for the in-memory store.
    pub store: Option<PostgresStore>,
}

impl AppState {
    /// State over the `PostgreSQL` store.
    #[must_use]
    pub fn postgres(store: PostgresStore) -> Self {
        let events = Arc::new(store.clone());
        let registrations = Arc::new(store.clone());
        Self {
            admission: AdmissionService::new(events, registrations),
            store: Some(store),
        }
    }

    /// State over the in-memory store (tests, local development).
    #[must_use]
    pub fn in_memory() -> Self {
        let store = Arc::new(gatehouse_core::MemoryStore::new());
        Self {
            admission: AdmissionService::new(store.clone(), store),
            store: None,
        }
    }
}
