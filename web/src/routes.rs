//! Router configuration.
//!
//! Builds the complete Axum router with all endpoints.

use crate::handlers::{events, health, registrations};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, patch, post},
};

/// Build the complete Axum router.
///
/// Health checks are unauthenticated; API routes live under `/api`.
/// Organizer-only routes read the requester identity from the
/// `x-organizer-id` header.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        // Event management
        .route("/events", post(events::create_event))
        .route("/events/my-events", get(events::my_events))
        .route("/events/:id", get(events::get_event))
        .route("/events/:id/registrations", get(events::event_registrations))
        // Registration admission
        .route("/registrations", post(registrations::submit_registration))
        .route(
            "/registrations/:id/status",
            patch(registrations::update_status),
        )
        .route(
            "/registrations/ticket/:ticket_id",
            get(registrations::get_ticket),
        )
        .route(
            "/registrations/check/:event_id/:email",
            get(registrations::check_registration),
        );

    Router::new()
        // Health checks (no authentication)
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        // API routes under /api prefix
        .nest("/api", api_routes)
        .with_state(state)
}
