//! Repository traits for the persistence collaborator.
//!
//! The admission controller only ever asks the store for atomic creates,
//! finds by unique key, and the two compound units that move the capacity
//! ledger. Whatever guarantees a backend uses internally (a transaction, a
//! single mutex), each method is all-or-nothing with respect to concurrent
//! calls on the same event.

use crate::error::Result;
use crate::ticket::TicketId;
use crate::types::{Event, EventId, OrganizerId, Registration, RegistrationId};
use async_trait::async_trait;

/// Event storage.
#[async_trait]
pub trait EventRepository: Send + Sync {
    /// Persist a newly created event.
    ///
    /// # Errors
    ///
    /// Returns `Storage` if the backend fails.
    async fn create(&self, event: &Event) -> Result<()>;

    /// Fetch an event by id.
    ///
    /// # Errors
    ///
    /// Returns `Storage` if the backend fails.
    async fn get(&self, id: EventId) -> Result<Option<Event>>;

    /// List an organizer's events, newest first.
    ///
    /// # Errors
    ///
    /// Returns `Storage` if the backend fails.
    async fn list_by_organizer(&self, organizer: OrganizerId) -> Result<Vec<Event>>;
}

/// Registration storage, including the two compound units that couple a
/// registration write to the event's capacity ledger.
#[async_trait]
pub trait RegistrationRepository: Send + Sync {
    /// Persist a pending registration.
    ///
    /// # Errors
    ///
    /// - `DuplicateRegistration` if the (event, email) pair already exists
    /// - `Storage` if the backend fails
    async fn create(&self, registration: &Registration) -> Result<()>;

    /// Persist an approved registration and increment its event's ledger,
    /// as one atomic unit.
    ///
    /// The capacity check-and-increment and the insert either both happen
    /// or neither does. Two concurrent calls against an event with one
    /// remaining slot admit exactly one registration.
    ///
    /// # Errors
    ///
    /// - `CapacityExceeded` if `approved_count` has reached `ticket_limit`;
    ///   nothing is written
    /// - `DuplicateRegistration` if the (event, email) pair already exists;
    ///   the ledger is not moved
    /// - `Storage` if the backend fails
    async fn create_approved(&self, registration: &Registration) -> Result<()>;

    /// Commit a pending → approved transition: increment the event's ledger
    /// iff below the limit, and store the new status and ticket iff the
    /// stored row is still pending. One atomic unit, all-or-nothing.
    ///
    /// The registration passed in has already gone through the state
    /// machine and carries its ticket.
    ///
    /// # Errors
    ///
    /// - `CapacityExceeded` if the ledger is at the limit; the stored
    ///   registration remains pending
    /// - `AlreadyProcessed` if the stored registration is no longer
    ///   pending; the ledger is not moved
    /// - `Storage` if the backend fails
    async fn commit_approval(&self, registration: &Registration) -> Result<()>;

    /// Commit a pending → rejected transition. No ledger movement.
    ///
    /// # Errors
    ///
    /// - `AlreadyProcessed` if the stored registration is no longer pending
    /// - `Storage` if the backend fails
    async fn commit_rejection(&self, registration: &Registration) -> Result<()>;

    /// Fetch a registration by id.
    ///
    /// # Errors
    ///
    /// Returns `Storage` if the backend fails.
    async fn get(&self, id: RegistrationId) -> Result<Option<Registration>>;

    /// Find a registration by its (event, email) dedup key. The email must
    /// already be normalised.
    ///
    /// # Errors
    ///
    /// Returns `Storage` if the backend fails.
    async fn find_by_event_and_email(
        &self,
        event_id: EventId,
        email: &str,
    ) -> Result<Option<Registration>>;

    /// Find a registration by its ticket identifier.
    ///
    /// # Errors
    ///
    /// Returns `Storage` if the backend fails.
    async fn find_by_ticket(&self, ticket_id: &TicketId) -> Result<Option<Registration>>;

    /// List an event's registrations, newest first.
    ///
    /// # Errors
    ///
    /// Returns `Storage` if the backend fails.
    async fn list_for_event(&self, event_id: EventId) -> Result<Vec<Registration>>;
}
