//! Admission scenario tests over the in-memory store.
//!
//! Exercises the full controller surface: auto and manual approval flows,
//! duplicate handling, capacity enforcement at submission and decision
//! time, authorization, and the ledger invariant.

#![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)] // Test code can use unwrap/expect

use gatehouse_core::{
    AdmissionError, AdmissionService, ApprovalMode, Event, EventDraft, EventId, MemoryStore,
    OrganizerId, RegistrationRepository, RegistrationStatus,
};
use chrono::Utc;
use std::sync::Arc;

fn service() -> (AdmissionService, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let admission = AdmissionService::new(store.clone(), store.clone());
    (admission, store)
}

fn draft(limit: u32, mode: ApprovalMode) -> EventDraft {
    EventDraft {
        title: "Tech Conference".to_string(),
        description: "Annual technology conference".to_string(),
        date: Utc::now(),
        venue: "Convention Center".to_string(),
        ticket_limit: limit,
        approval_mode: mode,
    }
}

async fn create_event(
    admission: &AdmissionService,
    limit: u32,
    mode: ApprovalMode,
) -> (Event, OrganizerId) {
    let organizer = OrganizerId::new();
    let event = admission
        .create_event(organizer, draft(limit, mode))
        .await
        .expect("event creation failed");
    (event, organizer)
}

/// The ledger invariant: `approved_count` equals the number of approved
/// registrations and never exceeds the limit.
async fn assert_ledger_consistent(admission: &AdmissionService, store: &MemoryStore, event_id: EventId) {
    let event = admission.get_event(event_id).await.unwrap();
    let approved = store
        .list_for_event(event_id)
        .await
        .unwrap()
        .iter()
        .filter(|r| r.is_approved())
        .count();
    assert_eq!(event.approved_count as usize, approved);
    assert!(event.approved_count <= event.ticket_limit);
}

// Scenario A: auto mode, limit 1 — first submission approved with ticket,
// second refused for capacity.
#[tokio::test]
async fn auto_mode_fills_and_refuses() {
    let (admission, store) = service();
    let (event, _) = create_event(&admission, 1, ApprovalMode::Auto).await;

    let registration = admission
        .submit_registration(event.id, "A", "a@x.com", "555-0100")
        .await
        .unwrap();
    assert_eq!(registration.status, RegistrationStatus::Approved);
    assert!(registration.ticket_id.is_some());
    assert_eq!(admission.get_event(event.id).await.unwrap().approved_count, 1);

    let err = admission
        .submit_registration(event.id, "B", "b@x.com", "555-0101")
        .await
        .unwrap_err();
    assert_eq!(err, AdmissionError::CapacityExceeded);

    assert_ledger_consistent(&admission, &store, event.id).await;
}

// Scenario B: manual mode — pending without ticket, then approved with
// ticket and a ledger increment.
#[tokio::test]
async fn manual_mode_approval_flow() {
    let (admission, store) = service();
    let (event, organizer) = create_event(&admission, 5, ApprovalMode::Manual).await;

    let registration = admission
        .submit_registration(event.id, "A", "a@x.com", "555-0100")
        .await
        .unwrap();
    assert_eq!(registration.status, RegistrationStatus::Pending);
    assert!(registration.ticket_id.is_none());
    assert_eq!(admission.get_event(event.id).await.unwrap().approved_count, 0);

    let approved = admission
        .decide_registration(registration.id, "approved", organizer)
        .await
        .unwrap();
    assert_eq!(approved.status, RegistrationStatus::Approved);
    assert!(approved.ticket_id.is_some());
    assert_eq!(admission.get_event(event.id).await.unwrap().approved_count, 1);

    assert_ledger_consistent(&admission, &store, event.id).await;
}

// Scenario C: same email twice — second submission refused, ledger
// untouched by the failure.
#[tokio::test]
async fn duplicate_email_is_refused() {
    let (admission, store) = service();
    let (event, _) = create_event(&admission, 5, ApprovalMode::Auto).await;

    admission
        .submit_registration(event.id, "A", "a@x.com", "555-0100")
        .await
        .unwrap();
    let before = admission.get_event(event.id).await.unwrap().approved_count;

    let err = admission
        .submit_registration(event.id, "A again", "a@x.com", "555-0199")
        .await
        .unwrap_err();
    assert_eq!(err, AdmissionError::DuplicateRegistration);
    assert_eq!(
        admission.get_event(event.id).await.unwrap().approved_count,
        before
    );

    // The dedup key is case-insensitive.
    let err = admission
        .submit_registration(event.id, "A shouting", "A@X.COM", "555-0199")
        .await
        .unwrap_err();
    assert_eq!(err, AdmissionError::DuplicateRegistration);

    assert_ledger_consistent(&admission, &store, event.id).await;
}

// Scenario D: manual event at capacity — approval fails, registration
// stays pending, ledger unchanged.
#[tokio::test]
async fn approval_at_capacity_leaves_registration_pending() {
    let (admission, store) = service();
    let (event, organizer) = create_event(&admission, 1, ApprovalMode::Manual).await;

    let first = admission
        .submit_registration(event.id, "A", "a@x.com", "555-0100")
        .await
        .unwrap();
    // Manual submissions are not capacity-checked: a second pending
    // registration is accepted even though only one slot exists.
    let second = admission
        .submit_registration(event.id, "B", "b@x.com", "555-0101")
        .await
        .unwrap();

    admission
        .decide_registration(first.id, "approved", organizer)
        .await
        .unwrap();

    let err = admission
        .decide_registration(second.id, "approved", organizer)
        .await
        .unwrap_err();
    assert_eq!(err, AdmissionError::CapacityExceeded);

    let stored = store.get(second.id).await.unwrap().unwrap();
    assert_eq!(stored.status, RegistrationStatus::Pending);
    assert!(stored.ticket_id.is_none());
    assert_eq!(admission.get_event(event.id).await.unwrap().approved_count, 1);

    // Rejection still works on the stranded pending registration.
    let rejected = admission
        .decide_registration(second.id, "rejected", organizer)
        .await
        .unwrap();
    assert_eq!(rejected.status, RegistrationStatus::Rejected);

    assert_ledger_consistent(&admission, &store, event.id).await;
}

// Scenario E: a non-organizer identity cannot decide.
#[tokio::test]
async fn non_organizer_cannot_decide() {
    let (admission, store) = service();
    let (event, _) = create_event(&admission, 5, ApprovalMode::Manual).await;

    let registration = admission
        .submit_registration(event.id, "A", "a@x.com", "555-0100")
        .await
        .unwrap();

    let err = admission
        .decide_registration(registration.id, "approved", OrganizerId::new())
        .await
        .unwrap_err();
    assert_eq!(err, AdmissionError::Unauthorized);

    let stored = store.get(registration.id).await.unwrap().unwrap();
    assert_eq!(stored.status, RegistrationStatus::Pending);
    assert_eq!(admission.get_event(event.id).await.unwrap().approved_count, 0);
}

// Idempotence-rejection: the second approval of the same registration
// fails, and the ledger moves exactly once.
#[tokio::test]
async fn second_decision_is_rejected() {
    let (admission, store) = service();
    let (event, organizer) = create_event(&admission, 5, ApprovalMode::Manual).await;

    let registration = admission
        .submit_registration(event.id, "A", "a@x.com", "555-0100")
        .await
        .unwrap();

    admission
        .decide_registration(registration.id, "approved", organizer)
        .await
        .unwrap();
    let err = admission
        .decide_registration(registration.id, "approved", organizer)
        .await
        .unwrap_err();
    assert_eq!(err, AdmissionError::AlreadyProcessed);
    assert_eq!(admission.get_event(event.id).await.unwrap().approved_count, 1);

    assert_ledger_consistent(&admission, &store, event.id).await;
}

// An unrecognised requested status is refused before anything is touched.
#[tokio::test]
async fn unknown_status_is_invalid() {
    let (admission, _) = service();
    let (event, organizer) = create_event(&admission, 5, ApprovalMode::Manual).await;

    let registration = admission
        .submit_registration(event.id, "A", "a@x.com", "555-0100")
        .await
        .unwrap();

    let err = admission
        .decide_registration(registration.id, "waitlisted", organizer)
        .await
        .unwrap_err();
    assert!(matches!(err, AdmissionError::InvalidStatus { .. }));
}

// Ticket lookup: present for the holder, absent for a made-up identifier.
#[tokio::test]
async fn ticket_lookup() {
    let (admission, _) = service();
    let (event, _) = create_event(&admission, 5, ApprovalMode::Auto).await;

    let registration = admission
        .submit_registration(event.id, "A", "a@x.com", "555-0100")
        .await
        .unwrap();
    let ticket = registration.ticket_id.clone().expect("approved without ticket");

    let found = admission.get_ticket(&ticket).await.unwrap();
    assert_eq!(found.id, registration.id);

    let err = admission
        .get_ticket(&gatehouse_core::TicketId::from_string("TKT-0-NOSUCHTICKET"))
        .await
        .unwrap_err();
    assert_eq!(err, AdmissionError::not_found("ticket"));
}

// Public status check by (event, email).
#[tokio::test]
async fn check_registration_by_email() {
    let (admission, _) = service();
    let (event, _) = create_event(&admission, 5, ApprovalMode::Manual).await;

    admission
        .submit_registration(event.id, "A", "a@x.com", "555-0100")
        .await
        .unwrap();

    let found = admission
        .check_registration(event.id, "A@x.com")
        .await
        .unwrap();
    assert_eq!(found.status, RegistrationStatus::Pending);

    let err = admission
        .check_registration(event.id, "nobody@x.com")
        .await
        .unwrap_err();
    assert_eq!(err, AdmissionError::not_found("registration"));
}

// Submitting against a missing event.
#[tokio::test]
async fn missing_event_is_not_found() {
    let (admission, _) = service();
    let err = admission
        .submit_registration(EventId::new(), "A", "a@x.com", "555-0100")
        .await
        .unwrap_err();
    assert_eq!(err, AdmissionError::not_found("event"));
}

// Validation failures leave no trace.
#[tokio::test]
async fn validation_rejects_blank_and_malformed_input() {
    let (admission, store) = service();
    let (event, _) = create_event(&admission, 5, ApprovalMode::Auto).await;

    for (name, email, phone) in [
        ("   ", "a@x.com", "555-0100"),
        ("A", "not-an-email", "555-0100"),
        ("A", "a@x.com", ""),
    ] {
        let err = admission
            .submit_registration(event.id, name, email, phone)
            .await
            .unwrap_err();
        assert!(matches!(err, AdmissionError::Validation { .. }));
    }
    assert!(store.list_for_event(event.id).await.unwrap().is_empty());
}

// Scenario F: two pending registrations race for the last slot — exactly
// one approval lands, the ledger moves by exactly 1.
#[tokio::test]
async fn concurrent_approvals_for_last_slot() {
    let (admission, store) = service();
    let (event, organizer) = create_event(&admission, 1, ApprovalMode::Manual).await;

    let first = admission
        .submit_registration(event.id, "A", "a@x.com", "555-0100")
        .await
        .unwrap();
    let second = admission
        .submit_registration(event.id, "B", "b@x.com", "555-0101")
        .await
        .unwrap();

    let a = {
        let admission = admission.clone();
        tokio::spawn(async move {
            admission
                .decide_registration(first.id, "approved", organizer)
                .await
        })
    };
    let b = {
        let admission = admission.clone();
        tokio::spawn(async move {
            admission
                .decide_registration(second.id, "approved", organizer)
                .await
        })
    };

    let results = [a.await.unwrap(), b.await.unwrap()];
    let successes = results.iter().filter(|r| r.is_ok()).count();
    let capacity_failures = results
        .iter()
        .filter(|r| matches!(r, Err(AdmissionError::CapacityExceeded)))
        .count();

    assert_eq!(successes, 1);
    assert_eq!(capacity_failures, 1);
    assert_eq!(admission.get_event(event.id).await.unwrap().approved_count, 1);

    assert_ledger_consistent(&admission, &store, event.id).await;
}

// 100 concurrent auto submissions against 10 slots — exactly 10 approved,
// the rest refused for capacity, ledger exact.
#[tokio::test]
async fn concurrent_submissions_never_overshoot() {
    let (admission, store) = service();
    let (event, _) = create_event(&admission, 10, ApprovalMode::Auto).await;

    let mut handles = Vec::new();
    for i in 0..100 {
        let admission = admission.clone();
        let event_id = event.id;
        handles.push(tokio::spawn(async move {
            admission
                .submit_registration(
                    event_id,
                    &format!("Attendee {i}"),
                    &format!("attendee{i}@example.com"),
                    "555-0100",
                )
                .await
        }));
    }

    let mut approved = 0usize;
    let mut refused = 0usize;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(registration) => {
                assert!(registration.is_approved());
                approved += 1;
            }
            Err(AdmissionError::CapacityExceeded) => refused += 1,
            Err(other) => panic!("unexpected error: {other}"),
        }
    }

    assert_eq!(approved, 10);
    assert_eq!(refused, 90);
    assert_eq!(
        admission.get_event(event.id).await.unwrap().approved_count,
        10
    );

    // Every issued ticket is distinct.
    let tickets: std::collections::HashSet<String> = store
        .list_for_event(event.id)
        .await
        .unwrap()
        .iter()
        .filter_map(|r| r.ticket_id.as_ref().map(|t| t.as_str().to_string()))
        .collect();
    assert_eq!(tickets.len(), 10);

    assert_ledger_consistent(&admission, &store, event.id).await;
}
