//! `PostgreSQL` persistence for the Gatehouse registration service.
//!
//! Implements the `gatehouse-core` repository traits over a `PgPool`. The
//! capacity ledger is moved with a conditional `UPDATE` (`increment only if
//! still below limit`) so the check-and-increment is a single atomic
//! statement; the compound units couple it to the registration write inside
//! one transaction. Queries use the runtime-bound API so the workspace
//! builds without a live `DATABASE_URL`.

mod events;
mod registrations;

use gatehouse_core::{AdmissionError, Result};
use sqlx::PgPool;

/// `PostgreSQL`-backed store implementing both repository traits.
///
/// Cloning is cheap; the pool is internally reference-counted.
#[derive(Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Create a store over an existing connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// The underlying pool, for health checks.
    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Run database migrations.
    ///
    /// # Errors
    ///
    /// Returns `Storage` if migrations fail.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| AdmissionError::Storage(format!("migration failed: {e}")))?;
        Ok(())
    }
}

/// Map an unexpected backend failure into the domain's storage error.
pub(crate) fn storage_error(context: &str, error: &sqlx::Error) -> AdmissionError {
    AdmissionError::Storage(format!("{context}: {error}"))
}

/// Counters are stored as `INTEGER`; the schema's checks keep them
/// non-negative, so a failed conversion means a corrupted row.
pub(crate) fn count_from_db(value: i32) -> Result<u32> {
    u32::try_from(value)
        .map_err(|_| AdmissionError::Storage(format!("negative counter in storage: {value}")))
}

pub(crate) fn count_to_db(value: u32) -> Result<i32> {
    i32::try_from(value)
        .map_err(|_| AdmissionError::Storage(format!("counter exceeds storage range: {value}")))
}
