//! Domain types for the Gatehouse registration service.
//!
//! Value objects and entities for events and registrations, including the
//! registration status state machine. Status transitions live here, in one
//! place, so every path into `Approved` or `Rejected` goes through the same
//! guards.

use crate::error::{AdmissionError, Result};
use crate::ticket::TicketId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

// ============================================================================
// Identifiers
// ============================================================================

/// Unique identifier for an event
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventId(Uuid);

impl EventId {
    /// Creates a new random `EventId`
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create an `EventId` from a `Uuid`
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Get the inner UUID
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for EventId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a registration
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RegistrationId(Uuid);

impl RegistrationId {
    /// Creates a new random `RegistrationId`
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a `RegistrationId` from a `Uuid`
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Get the inner UUID
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for RegistrationId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RegistrationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque identity of an event organizer.
///
/// Issued by the upstream identity collaborator; this crate only ever
/// compares it against an event's owner.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrganizerId(Uuid);

impl OrganizerId {
    /// Creates a new random `OrganizerId`
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create an `OrganizerId` from a `Uuid`
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Get the inner UUID
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for OrganizerId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for OrganizerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Events
// ============================================================================

/// Per-event approval policy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApprovalMode {
    /// Registrations are approved immediately, subject to capacity.
    Auto,
    /// The organizer decides on each registration.
    Manual,
}

impl ApprovalMode {
    /// Wire/storage representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Manual => "manual",
        }
    }

    /// Parse from the wire/storage representation.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "auto" => Some(Self::Auto),
            "manual" => Some(Self::Manual),
            _ => None,
        }
    }
}

impl fmt::Display for ApprovalMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Organizer-supplied fields of a new event.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EventDraft {
    /// Event title
    pub title: String,
    /// Event description
    pub description: String,
    /// When the event takes place
    pub date: DateTime<Utc>,
    /// Venue (free text)
    pub venue: String,
    /// Maximum number of approved registrations (at least 1)
    pub ticket_limit: u32,
    /// Approval policy
    pub approval_mode: ApprovalMode,
}

/// An organizer-owned gathering with finite capacity.
///
/// `approved_count` is the capacity ledger: a derived aggregate kept eagerly
/// consistent with the number of approved registrations. It only ever moves
/// through the conditional increment performed by the registration store, and
/// it is never decremented (there is no cancellation path).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Event identifier
    pub id: EventId,
    /// Owning organizer
    pub organizer: OrganizerId,
    /// Event title
    pub title: String,
    /// Event description
    pub description: String,
    /// When the event takes place
    pub date: DateTime<Utc>,
    /// Venue (free text)
    pub venue: String,
    /// Maximum number of approved registrations; immutable after creation
    pub ticket_limit: u32,
    /// Approval policy
    pub approval_mode: ApprovalMode,
    /// Number of approvals granted so far; invariant: `<= ticket_limit`
    pub approved_count: u32,
    /// When the event was created
    pub created_at: DateTime<Utc>,
}

impl Event {
    /// Create a new event from a validated draft.
    #[must_use]
    pub fn new(organizer: OrganizerId, draft: EventDraft) -> Self {
        Self {
            id: EventId::new(),
            organizer,
            title: draft.title,
            description: draft.description,
            date: draft.date,
            venue: draft.venue,
            ticket_limit: draft.ticket_limit,
            approval_mode: draft.approval_mode,
            approved_count: 0,
            created_at: Utc::now(),
        }
    }

    /// Whether the capacity ledger has reached the ticket limit.
    #[must_use]
    pub const fn is_full(&self) -> bool {
        self.approved_count >= self.ticket_limit
    }

    /// Remaining approvals before the event is full.
    #[must_use]
    pub const fn remaining(&self) -> u32 {
        self.ticket_limit.saturating_sub(self.approved_count)
    }
}

// ============================================================================
// Registrations
// ============================================================================

/// Lifecycle state of a registration.
///
/// `Approved` and `Rejected` are terminal; no transition leaves them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegistrationStatus {
    /// Awaiting an organizer decision (manual mode).
    Pending,
    /// Admitted; carries a ticket.
    Approved,
    /// Declined by the organizer.
    Rejected,
}

impl RegistrationStatus {
    /// Wire/storage representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }

    /// Parse from the wire/storage representation.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(Self::Pending),
            "approved" => Some(Self::Approved),
            "rejected" => Some(Self::Rejected),
            _ => None,
        }
    }

    /// Whether a decision is still possible.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }
}

impl fmt::Display for RegistrationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An organizer's decision on a pending registration.
///
/// Parsed from the wire, where the requested status arrives as free text.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Decision {
    /// Admit the attendee.
    Approve,
    /// Decline the attendee.
    Reject,
}

impl Decision {
    /// Parse a requested status string.
    ///
    /// # Errors
    ///
    /// Returns [`AdmissionError::InvalidStatus`] for anything outside
    /// `approved` / `rejected`.
    pub fn parse(requested: &str) -> Result<Self> {
        match requested {
            "approved" => Ok(Self::Approve),
            "rejected" => Ok(Self::Reject),
            other => Err(AdmissionError::InvalidStatus {
                requested: other.to_string(),
            }),
        }
    }
}

/// An attendee's request to attend an event.
///
/// At most one registration exists per (event, email) pair; the email is
/// stored normalised (trimmed, lowercased) so the pair is case-insensitive.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registration {
    /// Registration identifier
    pub id: RegistrationId,
    /// The event this registration belongs to
    pub event_id: EventId,
    /// Attendee name
    pub name: String,
    /// Attendee email, normalised; dedup key within the event
    pub email: String,
    /// Attendee phone number
    pub phone: String,
    /// Lifecycle state
    pub status: RegistrationStatus,
    /// Ticket identifier; present iff `status` is `Approved`
    pub ticket_id: Option<TicketId>,
    /// When the registration was submitted
    pub created_at: DateTime<Utc>,
}

impl Registration {
    /// Create a registration awaiting an organizer decision.
    #[must_use]
    pub fn new_pending(event_id: EventId, name: String, email: String, phone: String) -> Self {
        Self {
            id: RegistrationId::new(),
            event_id,
            name,
            email,
            phone,
            status: RegistrationStatus::Pending,
            ticket_id: None,
            created_at: Utc::now(),
        }
    }

    /// Create a registration directly in the approved state.
    ///
    /// Auto-mode submissions enter the state machine here, skipping
    /// `Pending`, as a single atomic creation step with their ticket already
    /// issued.
    #[must_use]
    pub fn new_approved(
        event_id: EventId,
        name: String,
        email: String,
        phone: String,
        ticket_id: TicketId,
    ) -> Self {
        Self {
            id: RegistrationId::new(),
            event_id,
            name,
            email,
            phone,
            status: RegistrationStatus::Approved,
            ticket_id: Some(ticket_id),
            created_at: Utc::now(),
        }
    }

    /// Pending → Approved transition. Sets the ticket exactly once.
    ///
    /// # Errors
    ///
    /// Returns [`AdmissionError::AlreadyProcessed`] when the registration is
    /// no longer pending; the registration is left untouched.
    pub fn approve(&mut self, ticket_id: TicketId) -> Result<()> {
        if !self.status.is_pending() {
            return Err(AdmissionError::AlreadyProcessed);
        }
        self.status = RegistrationStatus::Approved;
        self.ticket_id = Some(ticket_id);
        Ok(())
    }

    /// Pending → Rejected transition. No ticket, no counter movement.
    ///
    /// # Errors
    ///
    /// Returns [`AdmissionError::AlreadyProcessed`] when the registration is
    /// no longer pending.
    pub fn reject(&mut self) -> Result<()> {
        if !self.status.is_pending() {
            return Err(AdmissionError::AlreadyProcessed);
        }
        self.status = RegistrationStatus::Rejected;
        Ok(())
    }

    /// Whether the registration has been admitted.
    #[must_use]
    pub const fn is_approved(&self) -> bool {
        matches!(self.status, RegistrationStatus::Approved)
    }
}
