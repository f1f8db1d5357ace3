//! Axum extractors for requester identity.
//!
//! Authentication itself lives upstream: the gateway in front of this
//! service authenticates organizers and forwards their identity in the
//! `x-organizer-id` header. This extractor only parses that header;
//! ownership checks happen in the core and come back as 403.

use crate::error::AppError;
use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use gatehouse_core::OrganizerId;
use uuid::Uuid;

/// Header carrying the authenticated organizer identity.
pub const ORGANIZER_ID_HEADER: &str = "x-organizer-id";

/// Authenticated organizer identity.
///
/// Use as a handler parameter on organizer-only endpoints; missing or
/// malformed identity is rejected with 401 before the handler runs.
#[derive(Debug, Clone, Copy)]
pub struct OrganizerIdentity(pub OrganizerId);

#[async_trait]
impl<S> FromRequestParts<S> for OrganizerIdentity
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(ORGANIZER_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| AppError::unauthenticated("Missing organizer identity"))?;

        let uuid = Uuid::parse_str(header)
            .map_err(|_| AppError::unauthenticated("Malformed organizer identity"))?;

        Ok(Self(OrganizerId::from_uuid(uuid)))
    }
}
