//! Event endpoints.
//!
//! - POST /api/events — create a new event (organizer identity required)
//! - GET /api/events/:id — public event details
//! - GET /api/events/my-events — the requesting organizer's events
//! - GET /api/events/:id/registrations — organizer-only listing

use crate::error::AppError;
use crate::extractors::OrganizerIdentity;
use crate::handlers::registrations::RegistrationResponse;
use crate::state::AppState;
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use gatehouse_core::{ApprovalMode, Event, EventDraft, EventId};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Request to create a new event.
#[derive(Debug, Deserialize)]
pub struct CreateEventRequest {
    /// Event title
    pub title: String,
    /// Event description
    pub description: String,
    /// When the event takes place
    pub date: DateTime<Utc>,
    /// Venue (free text)
    pub venue: String,
    /// Maximum number of approved registrations
    pub ticket_limit: u32,
    /// Approval policy: `auto` or `manual`
    pub approval_mode: ApprovalMode,
}

/// Event details response.
#[derive(Debug, Serialize)]
pub struct EventResponse {
    /// Event ID
    pub id: Uuid,
    /// Owning organizer
    pub organizer_id: Uuid,
    /// Event title
    pub title: String,
    /// Event description
    pub description: String,
    /// When the event takes place
    pub date: DateTime<Utc>,
    /// Venue
    pub venue: String,
    /// Maximum number of approved registrations
    pub ticket_limit: u32,
    /// Approval policy
    pub approval_mode: ApprovalMode,
    /// Approvals granted so far
    pub approved_count: u32,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
}

impl From<Event> for EventResponse {
    fn from(event: Event) -> Self {
        Self {
            id: *event.id.as_uuid(),
            organizer_id: *event.organizer.as_uuid(),
            title: event.title,
            description: event.description,
            date: event.date,
            venue: event.venue,
            ticket_limit: event.ticket_limit,
            approval_mode: event.approval_mode,
            approved_count: event.approved_count,
            created_at: event.created_at,
        }
    }
}

/// Create a new event. The authenticated organizer becomes the owner.
///
/// # Example
///
/// ```bash
/// curl -X POST http://localhost:8080/api/events \
///   -H "x-organizer-id: 550e8400-e29b-41d4-a716-446655440000" \
///   -H "Content-Type: application/json" \
///   -d '{
///     "title": "Tech Conference 2026",
///     "description": "Annual technology conference",
///     "date": "2026-10-01T09:00:00Z",
///     "venue": "Convention Center",
///     "ticket_limit": 100,
///     "approval_mode": "manual"
///   }'
/// ```
///
/// # Errors
///
/// 422 on validation failures.
pub async fn create_event(
    OrganizerIdentity(organizer): OrganizerIdentity,
    State(state): State<AppState>,
    Json(request): Json<CreateEventRequest>,
) -> Result<(StatusCode, Json<EventResponse>), AppError> {
    let event = state
        .admission
        .create_event(
            organizer,
            EventDraft {
                title: request.title,
                description: request.description,
                date: request.date,
                venue: request.venue,
                ticket_limit: request.ticket_limit,
                approval_mode: request.approval_mode,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(event.into())))
}

/// Get event details by ID. Public.
///
/// # Errors
///
/// 404 when the event does not exist.
pub async fn get_event(
    Path(event_id): Path<Uuid>,
    State(state): State<AppState>,
) -> Result<Json<EventResponse>, AppError> {
    let event = state
        .admission
        .get_event(EventId::from_uuid(event_id))
        .await?;
    Ok(Json(event.into()))
}

/// List the requesting organizer's events, newest first.
///
/// # Errors
///
/// 401 without an organizer identity.
pub async fn my_events(
    OrganizerIdentity(organizer): OrganizerIdentity,
    State(state): State<AppState>,
) -> Result<Json<Vec<EventResponse>>, AppError> {
    let events = state.admission.list_events(organizer).await?;
    Ok(Json(events.into_iter().map(EventResponse::from).collect()))
}

/// List an event's registrations, newest first. Organizer only.
///
/// # Errors
///
/// 404 for a missing event, 403 when the requester is not the owner.
pub async fn event_registrations(
    OrganizerIdentity(organizer): OrganizerIdentity,
    Path(event_id): Path<Uuid>,
    State(state): State<AppState>,
) -> Result<Json<Vec<RegistrationResponse>>, AppError> {
    let registrations = state
        .admission
        .list_registrations(EventId::from_uuid(event_id), organizer)
        .await?;
    Ok(Json(
        registrations
            .into_iter()
            .map(RegistrationResponse::from)
            .collect(),
    ))
}
