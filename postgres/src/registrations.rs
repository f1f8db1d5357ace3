//! Registration repository over `PostgreSQL`.
//!
//! The two compound units (`create_approved`, `commit_approval`) run inside
//! a transaction: the conditional ledger increment goes first, and a zero
//! row count on either statement aborts the unit (the dropped transaction
//! rolls back). Duplicate (event, email) pairs surface as unique-key
//! violations from the partial index.

use crate::{storage_error, PostgresStore};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use gatehouse_core::types::{EventId, Registration, RegistrationId, RegistrationStatus};
use gatehouse_core::{AdmissionError, RegistrationRepository, Result, TicketId};
use tracing::instrument;
use uuid::Uuid;

#[derive(sqlx::FromRow)]
struct RegistrationRow {
    id: Uuid,
    event_id: Uuid,
    name: String,
    email: String,
    phone: String,
    status: String,
    ticket_id: Option<String>,
    created_at: DateTime<Utc>,
}

impl TryFrom<RegistrationRow> for Registration {
    type Error = AdmissionError;

    fn try_from(row: RegistrationRow) -> Result<Self> {
        let status = RegistrationStatus::parse(&row.status).ok_or_else(|| {
            AdmissionError::Storage(format!("unknown status in storage: {}", row.status))
        })?;
        Ok(Self {
            id: RegistrationId::from_uuid(row.id),
            event_id: EventId::from_uuid(row.event_id),
            name: row.name,
            email: row.email,
            phone: row.phone,
            status,
            ticket_id: row.ticket_id.map(TicketId::from_string),
            created_at: row.created_at,
        })
    }
}

const SELECT_REGISTRATION: &str = "SELECT id, event_id, name, email, phone, status, ticket_id, \
     created_at FROM registrations";

const INSERT_REGISTRATION: &str = "INSERT INTO registrations \
        (id, event_id, name, email, phone, status, ticket_id, created_at) \
     VALUES ($1, $2, $3, $4, $5, $6, $7, $8)";

/// Increment only if still below limit; zero rows affected means the event
/// is full (or gone, which the controller has already ruled out).
const RESERVE_TICKET: &str = "UPDATE events SET approved_count = approved_count + 1 \
     WHERE id = $1 AND approved_count < ticket_limit";

fn map_insert_error(error: sqlx::Error) -> AdmissionError {
    if let sqlx::Error::Database(db_err) = &error {
        if db_err.is_unique_violation() {
            // The (event, email) index is the only unique key an insert can
            // trip: tickets are generated, not submitted.
            return AdmissionError::DuplicateRegistration;
        }
    }
    storage_error("failed to create registration", &error)
}

#[async_trait]
impl RegistrationRepository for PostgresStore {
    async fn create(&self, registration: &Registration) -> Result<()> {
        bind_registration(sqlx::query(INSERT_REGISTRATION), registration)
            .execute(self.pool())
            .await
            .map_err(map_insert_error)?;
        Ok(())
    }

    #[instrument(skip(self, registration), fields(event = %registration.event_id))]
    async fn create_approved(&self, registration: &Registration) -> Result<()> {
        let mut tx = self
            .pool()
            .begin()
            .await
            .map_err(|e| storage_error("failed to begin transaction", &e))?;

        let reserved = sqlx::query(RESERVE_TICKET)
            .bind(*registration.event_id.as_uuid())
            .execute(&mut *tx)
            .await
            .map_err(|e| storage_error("failed to reserve ticket", &e))?;
        if reserved.rows_affected() == 0 {
            return Err(AdmissionError::CapacityExceeded);
        }

        bind_registration(sqlx::query(INSERT_REGISTRATION), registration)
            .execute(&mut *tx)
            .await
            .map_err(map_insert_error)?;

        tx.commit()
            .await
            .map_err(|e| storage_error("failed to commit admission", &e))?;
        Ok(())
    }

    #[instrument(skip(self, registration), fields(registration = %registration.id))]
    async fn commit_approval(&self, registration: &Registration) -> Result<()> {
        let mut tx = self
            .pool()
            .begin()
            .await
            .map_err(|e| storage_error("failed to begin transaction", &e))?;

        let reserved = sqlx::query(RESERVE_TICKET)
            .bind(*registration.event_id.as_uuid())
            .execute(&mut *tx)
            .await
            .map_err(|e| storage_error("failed to reserve ticket", &e))?;
        if reserved.rows_affected() == 0 {
            return Err(AdmissionError::CapacityExceeded);
        }

        let ticket = registration
            .ticket_id
            .as_ref()
            .ok_or_else(|| AdmissionError::Storage("approval committed without ticket".to_string()))?;
        let updated = sqlx::query(
            "UPDATE registrations SET status = 'approved', ticket_id = $2 \
             WHERE id = $1 AND status = 'pending'",
        )
        .bind(*registration.id.as_uuid())
        .bind(ticket.as_str())
        .execute(&mut *tx)
        .await
        .map_err(|e| storage_error("failed to update registration", &e))?;
        if updated.rows_affected() == 0 {
            // Raced by another decision; the dropped transaction rolls the
            // increment back.
            return Err(AdmissionError::AlreadyProcessed);
        }

        tx.commit()
            .await
            .map_err(|e| storage_error("failed to commit approval", &e))?;
        Ok(())
    }

    async fn commit_rejection(&self, registration: &Registration) -> Result<()> {
        let updated = sqlx::query(
            "UPDATE registrations SET status = 'rejected' \
             WHERE id = $1 AND status = 'pending'",
        )
        .bind(*registration.id.as_uuid())
        .execute(self.pool())
        .await
        .map_err(|e| storage_error("failed to update registration", &e))?;
        if updated.rows_affected() == 0 {
            return Err(AdmissionError::AlreadyProcessed);
        }
        Ok(())
    }

    async fn get(&self, id: RegistrationId) -> Result<Option<Registration>> {
        let row: Option<RegistrationRow> =
            sqlx::query_as(&format!("{SELECT_REGISTRATION} WHERE id = $1"))
                .bind(*id.as_uuid())
                .fetch_optional(self.pool())
                .await
                .map_err(|e| storage_error("failed to get registration", &e))?;
        row.map(Registration::try_from).transpose()
    }

    async fn find_by_event_and_email(
        &self,
        event_id: EventId,
        email: &str,
    ) -> Result<Option<Registration>> {
        let row: Option<RegistrationRow> = sqlx::query_as(&format!(
            "{SELECT_REGISTRATION} WHERE event_id = $1 AND email = $2"
        ))
        .bind(*event_id.as_uuid())
        .bind(email)
        .fetch_optional(self.pool())
        .await
        .map_err(|e| storage_error("failed to find registration", &e))?;
        row.map(Registration::try_from).transpose()
    }

    async fn find_by_ticket(&self, ticket_id: &TicketId) -> Result<Option<Registration>> {
        let row: Option<RegistrationRow> = sqlx::query_as(&format!(
            "{SELECT_REGISTRATION} WHERE ticket_id = $1"
        ))
        .bind(ticket_id.as_str())
        .fetch_optional(self.pool())
        .await
        .map_err(|e| storage_error("failed to find ticket", &e))?;
        row.map(Registration::try_from).transpose()
    }

    async fn list_for_event(&self, event_id: EventId) -> Result<Vec<Registration>> {
        let rows: Vec<RegistrationRow> = sqlx::query_as(&format!(
            "{SELECT_REGISTRATION} WHERE event_id = $1 ORDER BY created_at DESC"
        ))
        .bind(*event_id.as_uuid())
        .fetch_all(self.pool())
        .await
        .map_err(|e| storage_error("failed to list registrations", &e))?;
        rows.into_iter().map(Registration::try_from).collect()
    }
}

type PgQuery<'q> =
    sqlx::query::Query<'q, sqlx::Postgres, sqlx::postgres::PgArguments>;

fn bind_registration<'q>(
    query: PgQuery<'q>,
    registration: &'q Registration,
) -> PgQuery<'q> {
    query
        .bind(*registration.id.as_uuid())
        .bind(*registration.event_id.as_uuid())
        .bind(&registration.name)
        .bind(&registration.email)
        .bind(&registration.phone)
        .bind(registration.status.as_str())
        .bind(registration.ticket_id.as_ref().map(TicketId::as_str))
        .bind(registration.created_at)
}
