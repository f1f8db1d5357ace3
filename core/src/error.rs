//! Error types for admission and capacity-control operations.

use thiserror::Error;

/// Result type alias for admission operations.
pub type Result<T> = std::result::Result<T, AdmissionError>;

/// Error taxonomy for the admission subsystem.
///
/// Every error is reported synchronously to the caller with no partial
/// effect: on any error, no registration is created or mutated and no
/// counter is changed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AdmissionError {
    /// The referenced event, registration, or ticket does not exist.
    #[error("{resource} not found")]
    NotFound {
        /// Which kind of resource was missing
        resource: &'static str,
    },

    /// The email is already registered for this event.
    #[error("email is already registered for this event")]
    DuplicateRegistration,

    /// The ticket limit has been reached.
    #[error("event is full, no more tickets available")]
    CapacityExceeded,

    /// The requested status is outside {approved, rejected}.
    #[error("invalid status: {requested}")]
    InvalidStatus {
        /// The status string as received
        requested: String,
    },

    /// A decision was attempted on a registration that is no longer pending.
    #[error("registration has already been processed")]
    AlreadyProcessed,

    /// The requester is not the organizer of the registration's event.
    #[error("requester is not the event organizer")]
    Unauthorized,

    /// The registration behind this ticket is not approved.
    #[error("ticket is not approved yet")]
    TicketNotReady,

    /// A submitted field failed validation.
    #[error("{message}")]
    Validation {
        /// What was wrong with the input
        message: String,
    },

    /// The storage collaborator failed; surfaced upward unchanged.
    #[error("storage error: {0}")]
    Storage(String),
}

impl AdmissionError {
    /// Shorthand for a missing resource.
    #[must_use]
    pub const fn not_found(resource: &'static str) -> Self {
        Self::NotFound { resource }
    }

    /// Shorthand for a validation failure.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Returns `true` if this error is caused by the caller's input or
    /// timing rather than a fault in the service.
    #[must_use]
    pub const fn is_user_error(&self) -> bool {
        !matches!(self, Self::Storage(_))
    }
}
