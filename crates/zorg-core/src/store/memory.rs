use async_trait::async_trait;
use uuid::Uuid;

use crate::error::CoreError;
use crate::models::{CareDomain, DateRange, Event, Obligation, Report, ShiftAssignment, ShiftStatus};
use crate::store::CareStore;

/// In-process snapshot store. Primarily a test double, but also usable
/// by embedders that fetch care data from elsewhere and want to run the
/// engine over it.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    obligations: Vec<Obligation>,
    events: Vec<Event>,
    reports: Vec<Report>,
    shifts: Vec<ShiftAssignment>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_obligation(mut self, obligation: Obligation) -> Self {
        self.obligations.push(obligation);
        self
    }

    pub fn with_event(mut self, event: Event) -> Self {
        self.events.push(event);
        self
    }

    pub fn with_report(mut self, report: Report) -> Self {
        self.reports.push(report);
        self
    }

    pub fn with_shift(mut self, shift: ShiftAssignment) -> Self {
        self.shifts.push(shift);
        self
    }
}

#[async_trait]
impl CareStore for MemoryStore {
    async fn list_obligations(
        &self,
        client_id: Uuid,
        domain: CareDomain,
        range: DateRange,
    ) -> Result<Vec<Obligation>, CoreError> {
        Ok(self
            .obligations
            .iter()
            .filter(|o| {
                o.client_id == client_id
                    && o.domain() == domain
                    && o.start_date <= range.end
                    && o.end_date.map_or(true, |end| end >= range.start)
            })
            .cloned()
            .collect())
    }

    async fn list_events(
        &self,
        client_id: Uuid,
        domain: CareDomain,
        range: DateRange,
    ) -> Result<Vec<Event>, CoreError> {
        Ok(self
            .events
            .iter()
            .filter(|e| {
                e.client_id == client_id
                    && e.domain == domain
                    && e.occurred_on().map_or(false, |d| range.contains(d))
            })
            .cloned()
            .collect())
    }

    async fn list_reports(&self, client_id: Uuid, range: DateRange) -> Result<Vec<Report>, CoreError> {
        Ok(self
            .reports
            .iter()
            .filter(|r| r.client_id == client_id && range.contains(r.date))
            .cloned()
            .collect())
    }

    async fn list_shifts_for_caregiver(
        &self,
        caregiver_id: Uuid,
        range: DateRange,
        statuses: &[ShiftStatus],
    ) -> Result<Vec<ShiftAssignment>, CoreError> {
        let mut shifts: Vec<_> = self
            .shifts
            .iter()
            .filter(|s| {
                s.caregiver_id == caregiver_id
                    && range.contains(s.date)
                    && statuses.contains(&s.status)
            })
            .cloned()
            .collect();
        shifts.sort_by_key(|s| (s.date, s.start_time));
        Ok(shifts)
    }

    async fn list_shifts_for_client(
        &self,
        client_id: Uuid,
        range: DateRange,
        statuses: &[ShiftStatus],
    ) -> Result<Vec<ShiftAssignment>, CoreError> {
        let mut shifts: Vec<_> = self
            .shifts
            .iter()
            .filter(|s| {
                s.client_id == client_id && range.contains(s.date) && statuses.contains(&s.status)
            })
            .cloned()
            .collect();
        shifts.sort_by_key(|s| (s.date, s.start_time));
        Ok(shifts)
    }
}
