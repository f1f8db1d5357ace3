//! Event repository over `PostgreSQL`.

use crate::{count_from_db, count_to_db, storage_error, PostgresStore};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use gatehouse_core::types::{ApprovalMode, Event, EventId, OrganizerId};
use gatehouse_core::{AdmissionError, EventRepository, Result};
use uuid::Uuid;

#[derive(sqlx::FromRow)]
struct EventRow {
    id: Uuid,
    organizer_id: Uuid,
    title: String,
    description: String,
    date: DateTime<Utc>,
    venue: String,
    ticket_limit: i32,
    approval_mode: String,
    approved_count: i32,
    created_at: DateTime<Utc>,
}

impl TryFrom<EventRow> for Event {
    type Error = AdmissionError;

    fn try_from(row: EventRow) -> Result<Self> {
        let approval_mode = ApprovalMode::parse(&row.approval_mode).ok_or_else(|| {
            AdmissionError::Storage(format!("unknown approval mode in storage: {}", row.approval_mode))
        })?;
        Ok(Self {
            id: EventId::from_uuid(row.id),
            organizer: OrganizerId::from_uuid(row.organizer_id),
            title: row.title,
            description: row.description,
            date: row.date,
            venue: row.venue,
            ticket_limit: count_from_db(row.ticket_limit)?,
            approval_mode,
            approved_count: count_from_db(row.approved_count)?,
            created_at: row.created_at,
        })
    }
}

const SELECT_EVENT: &str = "SELECT id, organizer_id, title, description, date, venue, \
     ticket_limit, approval_mode, approved_count, created_at FROM events";

#[async_trait]
impl EventRepository for PostgresStore {
    async fn create(&self, event: &Event) -> Result<()> {
        sqlx::query(
            "INSERT INTO events \
                (id, organizer_id, title, description, date, venue, \
                 ticket_limit, approval_mode, approved_count, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)",
        )
        .bind(*event.id.as_uuid())
        .bind(*event.organizer.as_uuid())
        .bind(&event.title)
        .bind(&event.description)
        .bind(event.date)
        .bind(&event.venue)
        .bind(count_to_db(event.ticket_limit)?)
        .bind(event.approval_mode.as_str())
        .bind(count_to_db(event.approved_count)?)
        .bind(event.created_at)
        .execute(self.pool())
        .await
        .map_err(|e| storage_error("failed to create event", &e))?;
        Ok(())
    }

    async fn get(&self, id: EventId) -> Result<Option<Event>> {
        let row: Option<EventRow> = sqlx::query_as(&format!("{SELECT_EVENT} WHERE id = $1"))
            .bind(*id.as_uuid())
            .fetch_optional(self.pool())
            .await
            .map_err(|e| storage_error("failed to get event", &e))?;
        row.map(Event::try_from).transpose()
    }

    async fn list_by_organizer(&self, organizer: OrganizerId) -> Result<Vec<Event>> {
        let rows: Vec<EventRow> = sqlx::query_as(&format!(
            "{SELECT_EVENT} WHERE organizer_id = $1 ORDER BY created_at DESC"
        ))
        .bind(*organizer.as_uuid())
        .fetch_all(self.pool())
        .await
        .map_err(|e| storage_error("failed to list events", &e))?;
        rows.into_iter().map(Event::try_from).collect()
    }
}
