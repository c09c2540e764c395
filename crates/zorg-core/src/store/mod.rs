//! Read-only access to the care data snapshot.
//!
//! The engine never owns the durable store; it consumes these bulk-read
//! operations and does all matching in memory. [`SqliteStore`] is the
//! production implementation, [`MemoryStore`] holds an in-process
//! snapshot for tests and embedders.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::CoreError;
use crate::models::{CareDomain, DateRange, Event, Obligation, Report, ShiftAssignment, ShiftStatus};

mod memory;
mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// Bulk reads the reconciliation engine is built on. All implementations
/// must be side-effect free: two identical calls against an unchanged
/// snapshot return identical data.
#[async_trait]
pub trait CareStore: Send + Sync {
    /// Obligations for one client and domain whose active range overlaps
    /// the date range.
    async fn list_obligations(
        &self,
        client_id: Uuid,
        domain: CareDomain,
        range: DateRange,
    ) -> Result<Vec<Obligation>, CoreError>;

    /// Recorded events for one client and domain within the date range.
    async fn list_events(
        &self,
        client_id: Uuid,
        domain: CareDomain,
        range: DateRange,
    ) -> Result<Vec<Event>, CoreError>;

    /// Shift reports for one client within the date range.
    async fn list_reports(&self, client_id: Uuid, range: DateRange) -> Result<Vec<Report>, CoreError>;

    /// A caregiver's shifts within the date range, restricted to the
    /// given statuses. Ordered by date, then start time.
    async fn list_shifts_for_caregiver(
        &self,
        caregiver_id: Uuid,
        range: DateRange,
        statuses: &[ShiftStatus],
    ) -> Result<Vec<ShiftAssignment>, CoreError>;

    /// A client's shifts within the date range, restricted to the given
    /// statuses. Ordered by date, then start time.
    async fn list_shifts_for_client(
        &self,
        client_id: Uuid,
        range: DateRange,
        statuses: &[ShiftStatus],
    ) -> Result<Vec<ShiftAssignment>, CoreError>;
}
