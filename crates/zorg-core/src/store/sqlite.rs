//! SQLite implementation of [`CareStore`].
//!
//! This is the parse-once boundary: the write side stores loosely-typed
//! payloads (a JSON list of times, a comma-separated weekday list, a
//! meal-type name) and everything is converted to strongly-typed model
//! values here. A malformed payload degrades to zero occurrences for the
//! affected obligation and is logged; it never propagates as an error
//! into a reconciliation call.

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Weekday};
use sqlx::{FromRow, QueryBuilder, Sqlite};
use tracing::warn;
use uuid::Uuid;

use crate::db::DbPool;
use crate::error::CoreError;
use crate::models::{
    CareDomain, DateRange, Event, MealType, Obligation, ObligationKind, RecurrenceType, Report,
    ShiftAssignment, ShiftStatus,
};
use crate::store::CareStore;

pub struct SqliteStore {
    pool: DbPool,
}

impl SqliteStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

#[derive(Debug, FromRow)]
struct ObligationRow {
    id: Uuid,
    client_id: Uuid,
    domain: String,
    name: String,
    is_active: bool,
    start_date: NaiveDate,
    end_date: Option<NaiveDate>,
    recurrence: String,
    days_of_week: Option<String>,
    times: Option<String>,
    dose: Option<String>,
    meal_type: Option<String>,
    next_due_date: Option<NaiveDate>,
}

impl ObligationRow {
    fn into_obligation(self) -> Option<Obligation> {
        let domain: CareDomain = match self.domain.parse() {
            Ok(d) => d,
            Err(_) => {
                warn!(obligation = %self.id, domain = %self.domain, "unknown obligation domain, row skipped");
                return None;
            }
        };

        let kind = match domain {
            CareDomain::Medication | CareDomain::TubeFeeding | CareDomain::FluidIntake => {
                ObligationKind::Timed {
                    domain,
                    times: parse_times(self.id, self.times.as_deref()),
                    dose: self.dose,
                }
            }
            CareDomain::Meal => {
                let meal_type = match self.meal_type.as_deref().map(str::parse::<MealType>) {
                    Some(Ok(mt)) => mt,
                    _ => {
                        warn!(obligation = %self.id, "meal schedule without a usable meal type, row skipped");
                        return None;
                    }
                };
                ObligationKind::Meal { meal_type }
            }
            CareDomain::Nursing | CareDomain::WoundCare => ObligationKind::DueDate {
                domain,
                next_due: self.next_due_date,
            },
        };

        Some(Obligation {
            id: self.id,
            client_id: self.client_id,
            name: self.name,
            is_active: self.is_active,
            start_date: self.start_date,
            end_date: self.end_date,
            recurrence: RecurrenceType::from_raw(&self.recurrence),
            days_of_week: parse_days_of_week(self.id, self.days_of_week.as_deref()),
            kind,
        })
    }
}

/// JSON array of "HH:MM" strings. An unparsable list degrades to an
/// empty one: the obligation stays listed but contributes zero
/// occurrences.
fn parse_times(obligation_id: Uuid, raw: Option<&str>) -> Vec<NaiveTime> {
    let Some(raw) = raw else {
        return Vec::new();
    };
    let entries: Vec<String> = match serde_json::from_str(raw) {
        Ok(entries) => entries,
        Err(_) => {
            warn!(obligation = %obligation_id, "unparsable time list, treating as zero occurrences");
            return Vec::new();
        }
    };
    let mut times = Vec::with_capacity(entries.len());
    for entry in entries {
        let parsed = NaiveTime::parse_from_str(&entry, "%H:%M")
            .or_else(|_| NaiveTime::parse_from_str(&entry, "%H:%M:%S"));
        match parsed {
            Ok(t) => times.push(t),
            Err(_) => {
                warn!(obligation = %obligation_id, time = %entry, "unparsable time entry, dropped");
            }
        }
    }
    times
}

/// Comma-separated weekday names. Any unparsable entry invalidates the
/// whole set (`None`), which the recurrence evaluator fails closed on.
fn parse_days_of_week(obligation_id: Uuid, raw: Option<&str>) -> Option<Vec<Weekday>> {
    let raw = raw?;
    let mut days = Vec::new();
    for entry in raw.split(',') {
        match entry.trim().parse::<Weekday>() {
            Ok(day) => days.push(day),
            Err(_) => {
                warn!(obligation = %obligation_id, day = %entry, "unparsable weekday list, failing closed");
                return None;
            }
        }
    }
    Some(days)
}

#[derive(Debug, FromRow)]
struct EventRow {
    id: Uuid,
    obligation_id: Option<Uuid>,
    client_id: Uuid,
    caregiver_id: Uuid,
    domain: String,
    scheduled_at: Option<NaiveDateTime>,
    record_date: Option<NaiveDate>,
    record_time: Option<NaiveTime>,
    meal_type: Option<String>,
    was_given: bool,
    skip_reason: Option<String>,
}

impl EventRow {
    fn into_event(self) -> Option<Event> {
        let domain: CareDomain = match self.domain.parse() {
            Ok(d) => d,
            Err(_) => {
                warn!(event = %self.id, domain = %self.domain, "unknown event domain, row skipped");
                return None;
            }
        };
        let meal_type = match self.meal_type.as_deref().map(str::parse::<MealType>) {
            Some(Ok(mt)) => Some(mt),
            Some(Err(_)) => {
                warn!(event = %self.id, "unparsable meal type on event, ignored");
                None
            }
            None => None,
        };
        Some(Event {
            id: self.id,
            obligation_id: self.obligation_id,
            client_id: self.client_id,
            caregiver_id: self.caregiver_id,
            domain,
            scheduled_at: self.scheduled_at,
            record_date: self.record_date,
            record_time: self.record_time,
            meal_type,
            was_given: self.was_given,
            skip_reason: self.skip_reason,
        })
    }
}

#[async_trait]
impl CareStore for SqliteStore {
    async fn list_obligations(
        &self,
        client_id: Uuid,
        domain: CareDomain,
        range: DateRange,
    ) -> Result<Vec<Obligation>, CoreError> {
        let rows: Vec<ObligationRow> = sqlx::query_as(
            r#"SELECT id, client_id, domain, name, is_active, start_date, end_date,
                      recurrence, days_of_week, times, dose, meal_type, next_due_date
               FROM obligations
               WHERE client_id = $1 AND domain = $2 AND is_active = 1
                 AND start_date <= $3
                 AND (end_date IS NULL OR end_date >= $4)"#,
        )
        .bind(client_id)
        .bind(domain.to_string())
        .bind(range.end)
        .bind(range.start)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().filter_map(ObligationRow::into_obligation).collect())
    }

    async fn list_events(
        &self,
        client_id: Uuid,
        domain: CareDomain,
        range: DateRange,
    ) -> Result<Vec<Event>, CoreError> {
        let rows: Vec<EventRow> = sqlx::query_as(
            r#"SELECT id, obligation_id, client_id, caregiver_id, domain, scheduled_at,
                      record_date, record_time, meal_type, was_given, skip_reason
               FROM events
               WHERE client_id = $1 AND domain = $2
                 AND COALESCE(record_date, date(scheduled_at)) BETWEEN $3 AND $4
               ORDER BY COALESCE(record_date, date(scheduled_at)), id"#,
        )
        .bind(client_id)
        .bind(domain.to_string())
        .bind(range.start)
        .bind(range.end)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().filter_map(EventRow::into_event).collect())
    }

    async fn list_reports(&self, client_id: Uuid, range: DateRange) -> Result<Vec<Report>, CoreError> {
        let reports = sqlx::query_as(
            "SELECT id, client_id, caregiver_id, date FROM reports
             WHERE client_id = $1 AND date BETWEEN $2 AND $3",
        )
        .bind(client_id)
        .bind(range.start)
        .bind(range.end)
        .fetch_all(&self.pool)
        .await?;
        Ok(reports)
    }

    async fn list_shifts_for_caregiver(
        &self,
        caregiver_id: Uuid,
        range: DateRange,
        statuses: &[ShiftStatus],
    ) -> Result<Vec<ShiftAssignment>, CoreError> {
        self.list_shifts("caregiver_id", caregiver_id, range, statuses).await
    }

    async fn list_shifts_for_client(
        &self,
        client_id: Uuid,
        range: DateRange,
        statuses: &[ShiftStatus],
    ) -> Result<Vec<ShiftAssignment>, CoreError> {
        self.list_shifts("client_id", client_id, range, statuses).await
    }
}

impl SqliteStore {
    async fn list_shifts(
        &self,
        key_column: &str,
        key: Uuid,
        range: DateRange,
        statuses: &[ShiftStatus],
    ) -> Result<Vec<ShiftAssignment>, CoreError> {
        if statuses.is_empty() {
            return Ok(Vec::new());
        }

        let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new(
            "SELECT id, caregiver_id, client_id, date, start_time, end_time, status FROM shift_assignments WHERE ",
        );
        builder.push(key_column);
        builder.push(" = ");
        builder.push_bind(key);
        builder.push(" AND date BETWEEN ");
        builder.push_bind(range.start);
        builder.push(" AND ");
        builder.push_bind(range.end);
        builder.push(" AND status IN (");
        let mut separated = builder.separated(", ");
        for status in statuses {
            separated.push_bind(status.clone());
        }
        builder.push(") ORDER BY date, start_time");

        let shifts = builder.build_query_as().fetch_all(&self.pool).await?;
        Ok(shifts)
    }
}
