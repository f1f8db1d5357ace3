//! Core admission and capacity-control logic for the Gatehouse event
//! registration service.
//!
//! Organizers create events with a ticket capacity and an approval policy;
//! attendees register; registrations are approved automatically or manually;
//! every approved registration receives a unique, unguessable ticket
//! identifier.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────┐
//! │            AdmissionService              │  ← validation, precondition
//! │   submit / decide / lookups              │    order, orchestration
//! ├──────────────────────────────────────────┤
//! │     Registration state machine           │  ← pending → approved
//! │     (types.rs, one transition point)     │    pending → rejected
//! ├──────────────────────────────────────────┤
//! │  EventRepository / RegistrationRepository│  ← atomic create, find by
//! │  (postgres or in-memory)                 │    unique key, conditional
//! └──────────────────────────────────────────┘    ledger increment
//! ```
//!
//! The capacity ledger (`Event::approved_count`) only ever moves through the
//! repository's compound units, which perform the check-and-increment as one
//! atomic operation per event. The HTTP surface lives in `gatehouse-web`,
//! the `PostgreSQL` backend in `gatehouse-postgres`.

pub mod admission;
pub mod error;
pub mod memory;
pub mod store;
pub mod ticket;
pub mod types;
pub mod validate;

pub use admission::AdmissionService;
pub use error::{AdmissionError, Result};
pub use memory::MemoryStore;
pub use store::{EventRepository, RegistrationRepository};
pub use ticket::TicketId;
pub use types::{
    ApprovalMode, Decision, Event, EventDraft, EventId, OrganizerId, Registration,
    RegistrationId, RegistrationStatus,
};
