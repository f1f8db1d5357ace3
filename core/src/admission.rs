//! Admission controller: the orchestrating entry point of the registration
//! subsystem.
//!
//! Validates submissions against event existence, duplicate-registration
//! rules, and capacity, then drives the registration state machine. Capacity
//! is checked at submission time only for auto-approval events; manual-mode
//! submissions are admitted into `pending` unchecked and only meet the
//! ledger at approval time.

use crate::error::{AdmissionError, Result};
use crate::store::{EventRepository, RegistrationRepository};
use crate::ticket::TicketId;
use crate::types::{
    ApprovalMode, Decision, Event, EventDraft, EventId, OrganizerId, Registration, RegistrationId,
};
use crate::validate;
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Orchestrates event creation, registration admission, and organizer
/// decisions over the repository traits.
///
/// Cloning is cheap; both repositories sit behind `Arc`.
#[derive(Clone)]
pub struct AdmissionService {
    events: Arc<dyn EventRepository>,
    registrations: Arc<dyn RegistrationRepository>,
}

impl AdmissionService {
    /// Create a service over the given repositories.
    #[must_use]
    pub fn new(
        events: Arc<dyn EventRepository>,
        registrations: Arc<dyn RegistrationRepository>,
    ) -> Self {
        Self {
            events,
            registrations,
        }
    }

    /// Create a new event owned by `organizer`.
    ///
    /// # Errors
    ///
    /// - `Validation` if title, description, or venue are empty after
    ///   trimming, or `ticket_limit` is zero
    /// - `Storage` if the backend fails
    #[instrument(skip(self, draft), fields(organizer = %organizer))]
    pub async fn create_event(
        &self,
        organizer: OrganizerId,
        draft: EventDraft,
    ) -> Result<Event> {
        let title = validate::required_trimmed("title", &draft.title)?;
        let description = validate::required_trimmed("description", &draft.description)?;
        let venue = validate::required_trimmed("venue", &draft.venue)?;
        let draft = EventDraft {
            title,
            description,
            venue,
            ..draft
        };
        if draft.ticket_limit == 0 {
            return Err(AdmissionError::validation("ticket limit must be at least 1"));
        }

        let event = Event::new(organizer, draft);
        self.events.create(&event).await?;
        info!(event = %event.id, mode = %event.approval_mode, limit = event.ticket_limit, "event created");
        Ok(event)
    }

    /// Fetch an event. Public.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the event does not exist
    /// - `Storage` if the backend fails
    pub async fn get_event(&self, event_id: EventId) -> Result<Event> {
        self.events
            .get(event_id)
            .await?
            .ok_or(AdmissionError::not_found("event"))
    }

    /// List the requesting organizer's events, newest first.
    ///
    /// # Errors
    ///
    /// Returns `Storage` if the backend fails.
    pub async fn list_events(&self, organizer: OrganizerId) -> Result<Vec<Event>> {
        self.events.list_by_organizer(organizer).await
    }

    /// List an event's registrations, newest first. Organizer only.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the event does not exist
    /// - `Unauthorized` if `requester` does not own the event
    /// - `Storage` if the backend fails
    pub async fn list_registrations(
        &self,
        event_id: EventId,
        requester: OrganizerId,
    ) -> Result<Vec<Registration>> {
        let event = self.get_event(event_id).await?;
        if event.organizer != requester {
            return Err(AdmissionError::Unauthorized);
        }
        self.registrations.list_for_event(event_id).await
    }

    /// Submit a registration for an event. Public.
    ///
    /// Preconditions, in order: the event exists; for auto-approval events
    /// the ledger is below the limit; the email is not already registered
    /// for the event. Auto mode admits directly into `approved` with a
    /// ticket, coupled to the ledger increment in one atomic storage unit.
    /// Manual mode stores a `pending` registration and leaves the ledger
    /// untouched.
    ///
    /// # Errors
    ///
    /// - `Validation` for empty name/phone or a malformed email
    /// - `NotFound` if the event does not exist
    /// - `CapacityExceeded` (auto mode only) if the event is full
    /// - `DuplicateRegistration` if the email is already registered
    /// - `Storage` if the backend fails
    #[instrument(skip(self, name, email, phone), fields(event = %event_id))]
    pub async fn submit_registration(
        &self,
        event_id: EventId,
        name: &str,
        email: &str,
        phone: &str,
    ) -> Result<Registration> {
        let name = validate::required_trimmed("name", name)?;
        let phone = validate::required_trimmed("phone", phone)?;
        let email = validate::normalized_email(email)?;

        let event = self.get_event(event_id).await?;

        // Submission-time capacity applies to auto mode only: the effect
        // would be an immediate approval. Manual submissions meet the
        // ledger at decision time instead.
        if event.approval_mode == ApprovalMode::Auto && event.is_full() {
            debug!(event = %event_id, "submission refused, event full");
            return Err(AdmissionError::CapacityExceeded);
        }

        if self
            .registrations
            .find_by_event_and_email(event_id, &email)
            .await?
            .is_some()
        {
            return Err(AdmissionError::DuplicateRegistration);
        }

        match event.approval_mode {
            ApprovalMode::Auto => {
                let registration = Registration::new_approved(
                    event_id,
                    name,
                    email,
                    phone,
                    TicketId::generate(),
                );
                // The ledger check repeats inside this atomic unit; the
                // read above was only a fast fail.
                self.registrations.create_approved(&registration).await?;
                info!(registration = %registration.id, event = %event_id, "registration auto-approved");
                Ok(registration)
            }
            ApprovalMode::Manual => {
                let registration = Registration::new_pending(event_id, name, email, phone);
                self.registrations.create(&registration).await?;
                info!(registration = %registration.id, event = %event_id, "registration pending");
                Ok(registration)
            }
        }
    }

    /// Apply an organizer's decision to a pending registration.
    ///
    /// The requested status arrives as free text and is parsed here;
    /// anything outside `approved`/`rejected` is refused. Re-deciding an
    /// already processed registration is an error, not a no-op.
    ///
    /// # Errors
    ///
    /// - `InvalidStatus` for an unrecognised requested status
    /// - `NotFound` if the registration (or its event) does not exist
    /// - `Unauthorized` if `requester` does not own the event
    /// - `AlreadyProcessed` if the registration is not pending
    /// - `CapacityExceeded` on approval of a full event; the registration
    ///   stays pending and the ledger does not move
    /// - `Storage` if the backend fails
    #[instrument(skip(self), fields(registration = %registration_id))]
    pub async fn decide_registration(
        &self,
        registration_id: RegistrationId,
        requested_status: &str,
        requester: OrganizerId,
    ) -> Result<Registration> {
        let decision = Decision::parse(requested_status)?;

        let mut registration = self
            .registrations
            .get(registration_id)
            .await?
            .ok_or(AdmissionError::not_found("registration"))?;
        let event = self.get_event(registration.event_id).await?;

        if event.organizer != requester {
            return Err(AdmissionError::Unauthorized);
        }
        // Fast fail; the storage unit re-checks the stored row under its
        // own atomicity guarantee.
        if !registration.status.is_pending() {
            return Err(AdmissionError::AlreadyProcessed);
        }

        match decision {
            Decision::Approve => {
                registration.approve(TicketId::generate())?;
                self.registrations.commit_approval(&registration).await?;
                info!(registration = %registration.id, event = %event.id, "registration approved");
            }
            Decision::Reject => {
                registration.reject()?;
                self.registrations.commit_rejection(&registration).await?;
                info!(registration = %registration.id, event = %event.id, "registration rejected");
            }
        }
        Ok(registration)
    }

    /// Look up an approved registration by its ticket. Public.
    ///
    /// # Errors
    ///
    /// - `NotFound` if no registration carries this ticket
    /// - `TicketNotReady` if the registration is not approved
    /// - `Storage` if the backend fails
    pub async fn get_ticket(&self, ticket_id: &TicketId) -> Result<Registration> {
        let registration = self
            .registrations
            .find_by_ticket(ticket_id)
            .await?
            .ok_or(AdmissionError::not_found("ticket"))?;
        if !registration.is_approved() {
            return Err(AdmissionError::TicketNotReady);
        }
        Ok(registration)
    }

    /// Look up a registration by event and email. Public status check.
    ///
    /// # Errors
    ///
    /// - `Validation` for a malformed email
    /// - `NotFound` if no such registration exists
    /// - `Storage` if the backend fails
    pub async fn check_registration(
        &self,
        event_id: EventId,
        email: &str,
    ) -> Result<Registration> {
        let email = validate::normalized_email(email)?;
        self.registrations
            .find_by_event_and_email(event_id, &email)
            .await?
            .ok_or(AdmissionError::not_found("registration"))
    }
}
