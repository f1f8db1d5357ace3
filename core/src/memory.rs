//! In-memory repository implementation.
//!
//! Backs the scenario tests and local development. A single mutex over both
//! maps serialises every compound unit, which is exactly the mutual
//! exclusion the capacity ledger requires.

use crate::error::{AdmissionError, Result};
use crate::store::{EventRepository, RegistrationRepository};
use crate::ticket::TicketId;
use crate::types::{Event, EventId, OrganizerId, Registration, RegistrationId};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

#[derive(Debug, Default)]
struct Inner {
    events: HashMap<EventId, Event>,
    registrations: HashMap<RegistrationId, Registration>,
}

/// Mutex-guarded in-memory store implementing both repositories.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A poisoned lock only means another test thread panicked mid-write;
    /// recover the data rather than cascading the panic.
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl EventRepository for MemoryStore {
    async fn create(&self, event: &Event) -> Result<()> {
        self.lock().events.insert(event.id, event.clone());
        Ok(())
    }

    async fn get(&self, id: EventId) -> Result<Option<Event>> {
        Ok(self.lock().events.get(&id).cloned())
    }

    async fn list_by_organizer(&self, organizer: OrganizerId) -> Result<Vec<Event>> {
        let mut events: Vec<Event> = self
            .lock()
            .events
            .values()
            .filter(|event| event.organizer == organizer)
            .cloned()
            .collect();
        events.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(events)
    }
}

#[async_trait]
impl RegistrationRepository for MemoryStore {
    async fn create(&self, registration: &Registration) -> Result<()> {
        let mut inner = self.lock();
        if contains_email(&inner, registration.event_id, &registration.email) {
            return Err(AdmissionError::DuplicateRegistration);
        }
        inner
            .registrations
            .insert(registration.id, registration.clone());
        Ok(())
    }

    async fn create_approved(&self, registration: &Registration) -> Result<()> {
        let mut inner = self.lock();
        let event = inner
            .events
            .get(&registration.event_id)
            .ok_or(AdmissionError::not_found("event"))?;
        // Capacity before duplicate, matching the submission precondition
        // order; neither check mutates anything.
        if event.is_full() {
            return Err(AdmissionError::CapacityExceeded);
        }
        if contains_email(&inner, registration.event_id, &registration.email) {
            return Err(AdmissionError::DuplicateRegistration);
        }
        if let Some(event) = inner.events.get_mut(&registration.event_id) {
            event.approved_count += 1;
        }
        inner
            .registrations
            .insert(registration.id, registration.clone());
        Ok(())
    }

    async fn commit_approval(&self, registration: &Registration) -> Result<()> {
        let mut inner = self.lock();
        let event = inner
            .events
            .get(&registration.event_id)
            .ok_or(AdmissionError::not_found("event"))?;
        if event.is_full() {
            return Err(AdmissionError::CapacityExceeded);
        }
        let stored = inner
            .registrations
            .get(&registration.id)
            .ok_or(AdmissionError::not_found("registration"))?;
        if !stored.status.is_pending() {
            return Err(AdmissionError::AlreadyProcessed);
        }
        if let Some(event) = inner.events.get_mut(&registration.event_id) {
            event.approved_count += 1;
        }
        inner
            .registrations
            .insert(registration.id, registration.clone());
        Ok(())
    }

    async fn commit_rejection(&self, registration: &Registration) -> Result<()> {
        let mut inner = self.lock();
        let stored = inner
            .registrations
            .get(&registration.id)
            .ok_or(AdmissionError::not_found("registration"))?;
        if !stored.status.is_pending() {
            return Err(AdmissionError::AlreadyProcessed);
        }
        inner
            .registrations
            .insert(registration.id, registration.clone());
        Ok(())
    }

    async fn get(&self, id: RegistrationId) -> Result<Option<Registration>> {
        Ok(self.lock().registrations.get(&id).cloned())
    }

    async fn find_by_event_and_email(
        &self,
        event_id: EventId,
        email: &str,
    ) -> Result<Option<Registration>> {
        Ok(self
            .lock()
            .registrations
            .values()
            .find(|r| r.event_id == event_id && r.email == email)
            .cloned())
    }

    async fn find_by_ticket(&self, ticket_id: &TicketId) -> Result<Option<Registration>> {
        Ok(self
            .lock()
            .registrations
            .values()
            .find(|r| r.ticket_id.as_ref() == Some(ticket_id))
            .cloned())
    }

    async fn list_for_event(&self, event_id: EventId) -> Result<Vec<Registration>> {
        let mut registrations: Vec<Registration> = self
            .lock()
            .registrations
            .values()
            .filter(|r| r.event_id == event_id)
            .cloned()
            .collect();
        registrations.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(registrations)
    }
}

fn contains_email(inner: &Inner, event_id: EventId, email: &str) -> bool {
    inner
        .registrations
        .values()
        .any(|r| r.event_id == event_id && r.email == email)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::types::{ApprovalMode, EventDraft};
    use chrono::Utc;

    fn event(limit: u32) -> Event {
        Event::new(
            OrganizerId::new(),
            EventDraft {
                title: "Meetup".to_string(),
                description: "Monthly meetup".to_string(),
                date: Utc::now(),
                venue: "Library".to_string(),
                ticket_limit: limit,
                approval_mode: ApprovalMode::Auto,
            },
        )
    }

    fn approved(event_id: EventId, email: &str) -> Registration {
        Registration::new_approved(
            event_id,
            "Ada".to_string(),
            email.to_string(),
            "555-0100".to_string(),
            TicketId::generate(),
        )
    }

    #[tokio::test]
    async fn create_approved_moves_the_ledger() {
        let store = MemoryStore::new();
        let e = event(1);
        EventRepository::create(&store, &e).await.unwrap();

        store
            .create_approved(&approved(e.id, "a@x.com"))
            .await
            .unwrap();
        assert_eq!(
            EventRepository::get(&store, e.id)
                .await
                .unwrap()
                .unwrap()
                .approved_count,
            1
        );

        let err = store
            .create_approved(&approved(e.id, "b@x.com"))
            .await
            .unwrap_err();
        assert_eq!(err, AdmissionError::CapacityExceeded);
    }

    #[tokio::test]
    async fn create_approved_rejects_duplicates_without_moving_the_ledger() {
        let store = MemoryStore::new();
        let e = event(5);
        EventRepository::create(&store, &e).await.unwrap();

        store
            .create_approved(&approved(e.id, "a@x.com"))
            .await
            .unwrap();
        let err = store
            .create_approved(&approved(e.id, "a@x.com"))
            .await
            .unwrap_err();
        assert_eq!(err, AdmissionError::DuplicateRegistration);
        assert_eq!(
            EventRepository::get(&store, e.id)
                .await
                .unwrap()
                .unwrap()
                .approved_count,
            1
        );
    }

    #[tokio::test]
    async fn commit_approval_guards_the_stored_status() {
        let store = MemoryStore::new();
        let e = event(5);
        EventRepository::create(&store, &e).await.unwrap();

        let mut registration = Registration::new_pending(
            e.id,
            "Ada".to_string(),
            "a@x.com".to_string(),
            "555-0100".to_string(),
        );
        RegistrationRepository::create(&store, &registration)
            .await
            .unwrap();

        registration.approve(TicketId::generate()).unwrap();
        store.commit_approval(&registration).await.unwrap();

        // The stored row is now terminal; a second commit must fail.
        let err = store.commit_approval(&registration).await.unwrap_err();
        assert_eq!(err, AdmissionError::AlreadyProcessed);
        assert_eq!(
            EventRepository::get(&store, e.id)
                .await
                .unwrap()
                .unwrap()
                .approved_count,
            1
        );
    }
}
