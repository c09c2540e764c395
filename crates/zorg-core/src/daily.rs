//! Daily task aggregation: for one caregiver and one date, which tasks
//! are due per client, which are satisfied, and how the day classifies.
//!
//! The aggregator resolves the caregiver's shifts to clients, expands
//! every client's obligations for the date (two passes when the shift
//! crosses midnight), matches them against recorded events and rolls the
//! results up into per-domain and global summaries. Clients are
//! evaluated concurrently; within a client every domain fetch runs
//! concurrently as well. The whole computation is a pure function of the
//! store snapshot plus the explicit `date` and `today` inputs.

use chrono::{NaiveDate, NaiveTime};
use futures::future::try_join_all;
use serde::Serialize;
use uuid::Uuid;

use crate::error::CoreError;
use crate::matching;
use crate::models::{
    CareDomain, DateRange, DayStatus, DomainSummary, Event, Obligation, ObligationKind,
    ShiftAssignment, ShiftStatus, TaskInstance,
};
use crate::recurrence;
use crate::store::CareStore;
use crate::window::{self, DayPart};

/// One caregiver-day, all clients.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyOverview {
    pub date: NaiveDate,
    pub clients: Vec<ClientDayTasks>,
    pub global_summary: TaskSummary,
}

/// The representative shift window used to filter a client's timed
/// obligations.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShiftWindow {
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub overnight: bool,
}

/// Items plus counts for one timed or meal domain.
#[derive(Debug, Serialize)]
pub struct DomainTasks {
    pub items: Vec<TaskInstance>,
    pub summary: DomainSummary,
}

/// Items for a due-date domain (nursing, wound care); only due-or-overdue
/// items are ever included.
#[derive(Debug, Serialize)]
pub struct ItemList {
    pub items: Vec<TaskInstance>,
}

#[derive(Debug, Serialize)]
pub struct ReportCount {
    pub count: usize,
}

/// Rolled-up counts with the tri-state badge; used per client-day and as
/// the global summary.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskSummary {
    pub total_tasks: usize,
    pub completed: usize,
    pub pending: usize,
    pub overdue: usize,
    pub status: DayStatus,
}

impl TaskSummary {
    fn from_counts(total_tasks: usize, completed: usize, pending: usize, overdue: usize) -> Self {
        Self {
            total_tasks,
            completed,
            pending,
            overdue,
            status: DayStatus::classify(overdue, pending),
        }
    }

    fn absorb(&mut self, other: &TaskSummary) {
        self.total_tasks += other.total_tasks;
        self.completed += other.completed;
        self.pending += other.pending;
        self.overdue += other.overdue;
        self.status = DayStatus::classify(self.overdue, self.pending);
    }
}

/// Everything due for one client during the caregiver's shift.
#[derive(Debug, Serialize)]
pub struct ClientDayTasks {
    #[serde(rename = "clientId")]
    pub client_id: Uuid,
    pub shift: ShiftWindow,
    #[serde(rename = "medicatie")]
    pub medication: DomainTasks,
    #[serde(rename = "sondevoeding")]
    pub tube_feeding: DomainTasks,
    #[serde(rename = "verpleegtechnisch")]
    pub nursing: ItemList,
    #[serde(rename = "wondzorg")]
    pub wound_care: ItemList,
    #[serde(rename = "io")]
    pub fluid_intake: DomainTasks,
    #[serde(rename = "voeding")]
    pub meals: DomainTasks,
    #[serde(rename = "rapportage")]
    pub reports: ReportCount,
    pub summary: TaskSummary,
}

pub struct DailyTaskAggregator<'a, S: CareStore + ?Sized> {
    store: &'a S,
}

impl<'a, S: CareStore + ?Sized> DailyTaskAggregator<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Resolves the caregiver's qualifying shifts on `date` and produces
    /// the per-client task lists. A caregiver without shifts gets an
    /// empty overview; a store failure fails the whole call, so a
    /// client is never returned half-populated.
    pub async fn aggregate(
        &self,
        caregiver_id: Uuid,
        date: NaiveDate,
        today: NaiveDate,
    ) -> Result<DailyOverview, CoreError> {
        let shifts = self
            .store
            .list_shifts_for_caregiver(caregiver_id, DateRange::single(date), ShiftStatus::ACTIVE)
            .await?;

        // Group by client in first-seen order. The first shift per client
        // is the authoritative window; later shifts only qualify the
        // client for inclusion.
        let mut groups: Vec<(Uuid, ShiftAssignment)> = Vec::new();
        for shift in shifts {
            if !groups.iter().any(|(client, _)| *client == shift.client_id) {
                groups.push((shift.client_id, shift));
            }
        }

        let clients = try_join_all(
            groups
                .into_iter()
                .map(|(client_id, shift)| self.client_day(client_id, shift, date, today)),
        )
        .await?;

        let mut global_summary = TaskSummary::from_counts(0, 0, 0, 0);
        for client in &clients {
            global_summary.absorb(&client.summary);
        }

        Ok(DailyOverview { date, clients, global_summary })
    }

    async fn client_day(
        &self,
        client_id: Uuid,
        shift: ShiftAssignment,
        date: NaiveDate,
        today: NaiveDate,
    ) -> Result<ClientDayTasks, CoreError> {
        let passes = window::window_passes(&shift);
        // Overnight shifts need obligations and events for date+1 too.
        let fetch_range = DateRange::new(date, passes.last().map(|(d, _)| *d).unwrap_or(date));

        let (
            med_plans,
            med_events,
            tube_plans,
            tube_events,
            fluid_plans,
            fluid_events,
            meal_plans,
            meal_events,
            nursing_plans,
            nursing_events,
            wound_plans,
            wound_events,
            reports,
        ) = tokio::try_join!(
            self.store.list_obligations(client_id, CareDomain::Medication, fetch_range),
            self.store.list_events(client_id, CareDomain::Medication, fetch_range),
            self.store.list_obligations(client_id, CareDomain::TubeFeeding, fetch_range),
            self.store.list_events(client_id, CareDomain::TubeFeeding, fetch_range),
            self.store.list_obligations(client_id, CareDomain::FluidIntake, fetch_range),
            self.store.list_events(client_id, CareDomain::FluidIntake, fetch_range),
            self.store.list_obligations(client_id, CareDomain::Meal, fetch_range),
            self.store.list_events(client_id, CareDomain::Meal, fetch_range),
            self.store.list_obligations(client_id, CareDomain::Nursing, fetch_range),
            self.store.list_events(client_id, CareDomain::Nursing, fetch_range),
            self.store.list_obligations(client_id, CareDomain::WoundCare, fetch_range),
            self.store.list_events(client_id, CareDomain::WoundCare, fetch_range),
            self.store.list_reports(client_id, DateRange::single(date)),
        )?;

        let medication = domain_tasks(timed_items(&med_plans, &med_events, &shift, &passes, today));
        let tube_feeding = domain_tasks(timed_items(&tube_plans, &tube_events, &shift, &passes, today));
        let fluid_intake = domain_tasks(timed_items(&fluid_plans, &fluid_events, &shift, &passes, today));
        let meals = domain_tasks(meal_items(&meal_plans, &meal_events, date, today));
        let nursing = ItemList { items: due_date_items(&nursing_plans, &nursing_events, date, today) };
        let wound_care = ItemList { items: due_date_items(&wound_plans, &wound_events, date, today) };

        let summary = client_summary(&[
            &medication.items,
            &tube_feeding.items,
            &fluid_intake.items,
            &meals.items,
            &nursing.items,
            &wound_care.items,
        ]);

        Ok(ClientDayTasks {
            client_id,
            shift: ShiftWindow {
                start_time: shift.start_time,
                end_time: shift.end_time,
                overnight: shift.is_overnight(),
            },
            medication,
            tube_feeding,
            nursing,
            wound_care,
            fluid_intake,
            meals,
            reports: ReportCount { count: reports.len() },
            summary,
        })
    }
}

fn domain_tasks(items: Vec<TaskInstance>) -> DomainTasks {
    let summary = DomainSummary::from_items(&items);
    DomainTasks { items, summary }
}

/// Expands timed obligations over the shift's window passes and matches
/// each occurrence. Results are sorted by date then time-of-day, with a
/// stable tie-break on insertion order.
pub(crate) fn timed_items(
    plans: &[Obligation],
    events: &[Event],
    shift: &ShiftAssignment,
    passes: &[(NaiveDate, DayPart)],
    today: NaiveDate,
) -> Vec<TaskInstance> {
    let mut items = Vec::new();
    for &(day, part) in passes {
        for plan in plans {
            if !recurrence::applies(plan, day) {
                continue;
            }
            let ObligationKind::Timed { domain, times, dose } = &plan.kind else {
                continue;
            };
            for &time in times {
                if !window::in_window(time, shift.start_time, shift.end_time, part) {
                    continue;
                }
                let event = match domain {
                    CareDomain::FluidIntake => matching::match_fluid(plan.id, day, time, events),
                    _ => matching::match_timed(plan.id, day, time, events),
                };
                let status = matching::instance_status(event, day, today);
                items.push(TaskInstance {
                    obligation_id: plan.id,
                    client_id: plan.client_id,
                    domain: *domain,
                    date: day,
                    scheduled_time: Some(time),
                    name: plan.name.clone(),
                    dose: dose.clone(),
                    status,
                    is_overdue: false,
                    event_id: event.map(|e| e.id),
                    skip_reason: event.and_then(|e| e.skip_reason.clone()),
                });
            }
        }
    }
    items.sort_by_key(|item| (item.date, item.scheduled_time));
    items
}

/// Meal occurrences for the shift's own date. Meal records carry no
/// time-of-day, so the overnight split does not apply here.
pub(crate) fn meal_items(
    plans: &[Obligation],
    events: &[Event],
    date: NaiveDate,
    today: NaiveDate,
) -> Vec<TaskInstance> {
    let mut items = Vec::new();
    for plan in plans {
        if !recurrence::applies(plan, date) {
            continue;
        }
        let ObligationKind::Meal { meal_type } = &plan.kind else {
            continue;
        };
        let event = matching::match_meal(plan.client_id, date, *meal_type, events);
        let status = matching::instance_status(event, date, today);
        items.push(TaskInstance {
            obligation_id: plan.id,
            client_id: plan.client_id,
            domain: CareDomain::Meal,
            date,
            scheduled_time: None,
            name: plan.name.clone(),
            dose: None,
            status,
            is_overdue: false,
            event_id: event.map(|e| e.id),
            skip_reason: event.and_then(|e| e.skip_reason.clone()),
        });
    }
    items
}

/// Due-date items (nursing, wound care). Only due-or-overdue items are
/// included; a plan that has never been completed (`next_due = None`) is
/// always due, the first-care case.
pub(crate) fn due_date_items(
    plans: &[Obligation],
    events: &[Event],
    date: NaiveDate,
    today: NaiveDate,
) -> Vec<TaskInstance> {
    let mut items = Vec::new();
    for plan in plans {
        if !plan.covers(date) {
            continue;
        }
        let ObligationKind::DueDate { domain, next_due } = &plan.kind else {
            continue;
        };
        let due_today = next_due.map_or(true, |due| due <= date);
        if !due_today {
            continue;
        }
        let is_overdue = next_due.map_or(false, |due| due < date);
        let event = matching::match_due_date(plan.id, date, events);
        let status = matching::instance_status(event, date, today);
        items.push(TaskInstance {
            obligation_id: plan.id,
            client_id: plan.client_id,
            domain: *domain,
            date,
            scheduled_time: None,
            name: plan.name.clone(),
            dose: None,
            status,
            is_overdue,
            event_id: event.map(|e| e.id),
            skip_reason: event.and_then(|e| e.skip_reason.clone()),
        });
    }
    items
}

/// Rolls every domain's items into the client summary. An unmet overdue
/// item counts as overdue, not pending, so the two never double count.
fn client_summary(domains: &[&Vec<TaskInstance>]) -> TaskSummary {
    let mut total = 0;
    let mut completed = 0;
    let mut pending = 0;
    let mut overdue = 0;
    for items in domains {
        for item in items.iter() {
            total += 1;
            if item.status.is_unmet() {
                if item.is_overdue {
                    overdue += 1;
                } else {
                    pending += 1;
                }
            } else {
                completed += 1;
            }
        }
    }
    TaskSummary::from_counts(total, completed, pending, overdue)
}
