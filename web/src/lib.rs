//! HTTP surface of the Gatehouse registration service.
//!
//! Thin Axum adapters over the `gatehouse-core` admission subsystem:
//! handlers extract and validate transport-level input, delegate to
//! [`gatehouse_core::AdmissionService`], and map the domain's error
//! taxonomy onto HTTP statuses.
//!
//! # Request Flow
//!
//! 1. **HTTP request** arrives at an Axum handler
//! 2. **Extract data** from the request (JSON body, path, identity header)
//! 3. **Delegate** to the admission service
//! 4. **Map result** to a JSON response or an error status
//!
//! Authentication lives upstream; organizer identity arrives in the
//! `x-organizer-id` header (see [`extractors`]).

pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod routes;
pub mod state;

// Re-export key types for convenience
pub use config::Config;
pub use error::AppError;
pub use routes::build_router;
pub use state::AppState;
