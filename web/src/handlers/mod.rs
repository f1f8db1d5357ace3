//! HTTP handlers: thin adapters between the wire and the admission core.

pub mod events;
pub mod health;
pub mod registrations;
