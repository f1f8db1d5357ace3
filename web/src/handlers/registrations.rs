//! Registration endpoints.
//!
//! - POST /api/registrations — public submission
//! - PATCH /api/registrations/:id/status — organizer decision
//! - GET /api/registrations/ticket/:ticket_id — public ticket lookup
//! - GET /api/registrations/check/:event_id/:email — public status check

use crate::error::AppError;
use crate::extractors::OrganizerIdentity;
use crate::state::AppState;
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use gatehouse_core::{EventId, Registration, RegistrationId, RegistrationStatus, TicketId};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Request to submit a registration.
#[derive(Debug, Deserialize)]
pub struct SubmitRegistrationRequest {
    /// The event to register for
    pub event_id: Uuid,
    /// Attendee name
    pub name: String,
    /// Attendee email
    pub email: String,
    /// Attendee phone number
    pub phone: String,
}

/// Request to decide on a pending registration.
///
/// The status arrives as free text; the core refuses anything outside
/// `approved` / `rejected`.
#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    /// Requested status
    pub status: String,
}

/// Registration details response.
#[derive(Debug, Serialize)]
pub struct RegistrationResponse {
    /// Registration ID
    pub id: Uuid,
    /// The event this registration belongs to
    pub event_id: Uuid,
    /// Attendee name
    pub name: String,
    /// Attendee email (normalised)
    pub email: String,
    /// Attendee phone number
    pub phone: String,
    /// Lifecycle state
    pub status: RegistrationStatus,
    /// Ticket identifier, present once approved
    pub ticket_id: Option<String>,
    /// When the registration was submitted
    pub created_at: DateTime<Utc>,
}

impl From<Registration> for RegistrationResponse {
    fn from(registration: Registration) -> Self {
        Self {
            id: *registration.id.as_uuid(),
            event_id: *registration.event_id.as_uuid(),
            name: registration.name,
            email: registration.email,
            phone: registration.phone,
            status: registration.status,
            ticket_id: registration.ticket_id.map(|t| t.as_str().to_string()),
            created_at: registration.created_at,
        }
    }
}

/// Submit a registration. Public.
///
/// Auto-approval events answer with an approved registration carrying its
/// ticket; manual events answer with a pending one.
///
/// # Errors
///
/// 404 for a missing event, 409 when full or already registered, 422 on
/// validation failures.
pub async fn submit_registration(
    State(state): State<AppState>,
    Json(request): Json<SubmitRegistrationRequest>,
) -> Result<(StatusCode, Json<RegistrationResponse>), AppError> {
    let registration = state
        .admission
        .submit_registration(
            EventId::from_uuid(request.event_id),
            &request.name,
            &request.email,
            &request.phone,
        )
        .await?;
    Ok((StatusCode::CREATED, Json(registration.into())))
}

/// Decide on a pending registration. Organizer only.
///
/// # Errors
///
/// 404 for a missing registration, 403 for a non-owner, 400 for an
/// unrecognised status, 409 when already processed or the event is full.
pub async fn update_status(
    OrganizerIdentity(organizer): OrganizerIdentity,
    Path(registration_id): Path<Uuid>,
    State(state): State<AppState>,
    Json(request): Json<UpdateStatusRequest>,
) -> Result<Json<RegistrationResponse>, AppError> {
    let registration = state
        .admission
        .decide_registration(
            RegistrationId::from_uuid(registration_id),
            &request.status,
            organizer,
        )
        .await?;
    Ok(Json(registration.into()))
}

/// Look up an approved registration by ticket. Public.
///
/// # Errors
///
/// 404 for an unknown ticket, 400 when the registration is not approved.
pub async fn get_ticket(
    Path(ticket_id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<RegistrationResponse>, AppError> {
    let registration = state
        .admission
        .get_ticket(&TicketId::from_string(ticket_id))
        .await?;
    Ok(Json(registration.into()))
}

/// Check a registration's status by event and email. Public.
///
/// # Errors
///
/// 404 when no registration exists for the pair, 422 for a malformed
/// email.
pub async fn check_registration(
    Path((event_id, email)): Path<(Uuid, String)>,
    State(state): State<AppState>,
) -> Result<Json<RegistrationResponse>, AppError> {
    let registration = state
        .admission
        .check_registration(EventId::from_uuid(event_id), &email)
        .await?;
    Ok(Json(registration.into()))
}
