//! Multi-day lookback scanning: which past days have unreported or unmet
//! care, and which medication doses were never administered.
//!
//! Works over the same three primitives as the daily aggregator but at
//! higher volume: one bulk fetch per data domain over the whole window,
//! then in-memory indices keyed by client and date before the day loop,
//! never one query per day. Only strictly past days are judged; a
//! morning-pass dose of an overnight shift is attributed to the day it
//! falls on, which may be the day after the shift.

use std::collections::{HashMap, HashSet};

use chrono::{Datelike, Days, NaiveDate, NaiveTime};
use futures::future::try_join_all;
use serde::Serialize;
use tracing::debug;
use uuid::Uuid;

use crate::error::CoreError;
use crate::matching;
use crate::models::{
    CareDomain, DateRange, Event, Obligation, ObligationKind, ShiftAssignment, ShiftStatus,
    TaskStatus,
};
use crate::recurrence;
use crate::store::CareStore;
use crate::window::{self, DayPart};

/// Whose lookback window is being scanned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanScope {
    Caregiver(Uuid),
    Client(Uuid),
}

/// Sparse per-day report: days and clients without issues are omitted.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MissedDaysReport {
    pub missed_days: Vec<MissedDay>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MissedDay {
    pub date: NaiveDate,
    pub date_label: String,
    pub clients: Vec<MissedClientDay>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MissedClientDay {
    pub client_id: Uuid,
    pub pending_medications: usize,
    pub total_medications: usize,
    /// The date the unmet doses fall on; for an overnight shift this can
    /// be the day after the shift.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub medication_date: Option<NaiveDate>,
    pub pending_sondevoeding: usize,
    pub total_sondevoeding: usize,
    pub pending_io: usize,
    pub pending_voeding: usize,
    pub has_report: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MissingMedicationReport {
    pub summary: MissingMedicationSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub missing_administrations: Option<Vec<MissedDose>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skipped_administrations: Option<Vec<MissedDose>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MissingMedicationSummary {
    pub total_missing: usize,
    pub total_skipped: usize,
    pub unique_medications: usize,
    pub unique_days: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub oldest_missing: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MissedDose {
    pub obligation_id: Uuid,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dose: Option<String>,
    pub date: NaiveDate,
    pub time: NaiveTime,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip_reason: Option<String>,
}

/// Per-client bulk data, indexed by date before the day loop runs.
struct ClientIndex {
    med_plans: Vec<Obligation>,
    tube_plans: Vec<Obligation>,
    fluid_plans: Vec<Obligation>,
    meal_plans: Vec<Obligation>,
    med_events: HashMap<NaiveDate, Vec<Event>>,
    tube_events: HashMap<NaiveDate, Vec<Event>>,
    fluid_events: HashMap<NaiveDate, Vec<Event>>,
    meal_events: HashMap<NaiveDate, Vec<Event>>,
    report_counts: HashMap<NaiveDate, usize>,
}

#[derive(Debug, Default)]
struct TimedTally {
    total: usize,
    pending: usize,
    next_day_pending: usize,
}

pub struct MissedTaskScanner<'a, S: CareStore + ?Sized> {
    store: &'a S,
}

impl<'a, S: CareStore + ?Sized> MissedTaskScanner<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Walks `[today - lookback_days, today)` and reports every
    /// shift-day with unmet or unreported care; today itself is still
    /// open and never judged. Zero shifts in the window produce an
    /// empty report.
    pub async fn scan(
        &self,
        scope: ScanScope,
        lookback_days: u32,
        today: NaiveDate,
    ) -> Result<MissedDaysReport, CoreError> {
        let range = lookback_range(lookback_days, today)?;
        debug!(?scope, %range.start, %range.end, "missed-task scan");

        let shifts = match scope {
            ScanScope::Caregiver(id) => {
                self.store
                    .list_shifts_for_caregiver(id, range, ShiftStatus::ACTIVE)
                    .await?
            }
            ScanScope::Client(id) => {
                self.store
                    .list_shifts_for_client(id, range, ShiftStatus::ACTIVE)
                    .await?
            }
        };
        if shifts.is_empty() {
            return Ok(MissedDaysReport { missed_days: Vec::new() });
        }

        let mut client_ids: Vec<Uuid> = Vec::new();
        for shift in &shifts {
            if !client_ids.contains(&shift.client_id) {
                client_ids.push(shift.client_id);
            }
        }

        // Events one day past the window end so morning-pass doses of the
        // last judged day's overnight shifts can still match.
        let event_range = DateRange::new(range.start, today);
        let indices = try_join_all(
            client_ids
                .iter()
                .map(|&client_id| self.client_index(client_id, range, event_range)),
        )
        .await?;
        let indices: HashMap<Uuid, ClientIndex> =
            client_ids.into_iter().zip(indices).collect();

        let mut shifts_by_day: HashMap<NaiveDate, Vec<&ShiftAssignment>> = HashMap::new();
        for shift in &shifts {
            shifts_by_day.entry(shift.date).or_default().push(shift);
        }

        let days: Vec<NaiveDate> = range.days().collect();
        let mut missed_days = Vec::new();
        // Most recent day first.
        for day in days.into_iter().rev() {
            let Some(day_shifts) = shifts_by_day.get(&day) else {
                continue;
            };
            // Every shift on the day counts: a client with a split
            // service (say 08:00-12:00 and 16:00-20:00) gets one entry
            // covering both windows.
            let mut per_client: Vec<(Uuid, Vec<&ShiftAssignment>)> = Vec::new();
            for &shift in day_shifts {
                match per_client.iter_mut().find(|(id, _)| *id == shift.client_id) {
                    Some((_, shifts)) => shifts.push(shift),
                    None => per_client.push((shift.client_id, vec![shift])),
                }
            }
            let mut clients = Vec::new();
            for (client_id, client_shifts) in per_client {
                let Some(index) = indices.get(&client_id) else {
                    continue;
                };
                if let Some(entry) = scan_client_day(index, client_id, day, &client_shifts, today) {
                    clients.push(entry);
                }
            }
            if !clients.is_empty() {
                missed_days.push(MissedDay { date: day, date_label: date_label(day), clients });
            }
        }

        Ok(MissedDaysReport { missed_days })
    }

    /// Client-scoped medication reconciliation over the lookback window:
    /// every scheduled dose, shift or no shift, resolved to missing or
    /// skipped.
    pub async fn missing_medication(
        &self,
        client_id: Uuid,
        lookback_days: u32,
        today: NaiveDate,
        include_details: bool,
    ) -> Result<MissingMedicationReport, CoreError> {
        let range = lookback_range(lookback_days, today)?;
        debug!(client = %client_id, %range.start, %range.end, "missing-medication scan");

        let (plans, events) = tokio::try_join!(
            self.store.list_obligations(client_id, CareDomain::Medication, range),
            self.store.list_events(client_id, CareDomain::Medication, range),
        )?;

        let mut missing = Vec::new();
        let mut skipped = Vec::new();
        for day in range.days() {
            for plan in &plans {
                if !recurrence::applies(plan, day) {
                    continue;
                }
                let ObligationKind::Timed { times, dose, .. } = &plan.kind else {
                    continue;
                };
                for &time in times {
                    let event = matching::match_timed(plan.id, day, time, &events);
                    match matching::instance_status(event, day, today) {
                        TaskStatus::Missing => missing.push(MissedDose {
                            obligation_id: plan.id,
                            name: plan.name.clone(),
                            dose: dose.clone(),
                            date: day,
                            time,
                            skip_reason: None,
                        }),
                        TaskStatus::Skipped => skipped.push(MissedDose {
                            obligation_id: plan.id,
                            name: plan.name.clone(),
                            dose: dose.clone(),
                            date: day,
                            time,
                            skip_reason: event.and_then(|e| e.skip_reason.clone()),
                        }),
                        TaskStatus::Given | TaskStatus::Pending => {}
                    }
                }
            }
        }

        let unique_medications = missing
            .iter()
            .map(|dose| dose.obligation_id)
            .collect::<HashSet<_>>()
            .len();
        let unique_days = missing.iter().map(|dose| dose.date).collect::<HashSet<_>>().len();
        let summary = MissingMedicationSummary {
            total_missing: missing.len(),
            total_skipped: skipped.len(),
            unique_medications,
            unique_days,
            oldest_missing: missing.iter().map(|dose| dose.date).min(),
        };

        Ok(MissingMedicationReport {
            summary,
            missing_administrations: include_details.then_some(missing),
            skipped_administrations: include_details.then_some(skipped),
        })
    }

    async fn client_index(
        &self,
        client_id: Uuid,
        range: DateRange,
        event_range: DateRange,
    ) -> Result<ClientIndex, CoreError> {
        let (
            med_plans,
            tube_plans,
            fluid_plans,
            meal_plans,
            med_events,
            tube_events,
            fluid_events,
            meal_events,
            reports,
        ) = tokio::try_join!(
            self.store.list_obligations(client_id, CareDomain::Medication, range),
            self.store.list_obligations(client_id, CareDomain::TubeFeeding, range),
            self.store.list_obligations(client_id, CareDomain::FluidIntake, range),
            self.store.list_obligations(client_id, CareDomain::Meal, range),
            self.store.list_events(client_id, CareDomain::Medication, event_range),
            self.store.list_events(client_id, CareDomain::TubeFeeding, event_range),
            self.store.list_events(client_id, CareDomain::FluidIntake, event_range),
            self.store.list_events(client_id, CareDomain::Meal, event_range),
            self.store.list_reports(client_id, range),
        )?;

        let mut report_counts: HashMap<NaiveDate, usize> = HashMap::new();
        for report in reports {
            *report_counts.entry(report.date).or_default() += 1;
        }

        Ok(ClientIndex {
            med_plans,
            tube_plans,
            fluid_plans,
            meal_plans,
            med_events: index_by_date(med_events),
            tube_events: index_by_date(tube_events),
            fluid_events: index_by_date(fluid_events),
            meal_events: index_by_date(meal_events),
            report_counts,
        })
    }
}

fn lookback_range(lookback_days: u32, today: NaiveDate) -> Result<DateRange, CoreError> {
    if lookback_days == 0 {
        return Err(CoreError::InvalidInput("lookback window must cover at least one day".to_string()));
    }
    let start = today
        .checked_sub_days(Days::new(lookback_days as u64))
        .ok_or_else(|| CoreError::InvalidInput("lookback window out of range".to_string()))?;
    let end = today
        .pred_opt()
        .ok_or_else(|| CoreError::InvalidInput("lookback window out of range".to_string()))?;
    Ok(DateRange::new(start, end))
}

fn index_by_date(events: Vec<Event>) -> HashMap<NaiveDate, Vec<Event>> {
    let mut index: HashMap<NaiveDate, Vec<Event>> = HashMap::new();
    for event in events {
        if let Some(date) = event.occurred_on() {
            index.entry(date).or_default().push(event);
        }
    }
    index
}

/// Events on the date itself plus its neighbours, for tolerance matching
/// that may cross midnight.
fn events_around(index: &HashMap<NaiveDate, Vec<Event>>, date: NaiveDate) -> Vec<Event> {
    let mut events = Vec::new();
    for candidate in [date.checked_sub_days(Days::new(1)), Some(date), date.checked_add_days(Days::new(1))]
        .into_iter()
        .flatten()
    {
        if let Some(day_events) = index.get(&candidate) {
            events.extend(day_events.iter().cloned());
        }
    }
    events
}

fn scan_client_day(
    index: &ClientIndex,
    client_id: Uuid,
    date: NaiveDate,
    shifts: &[&ShiftAssignment],
    today: NaiveDate,
) -> Option<MissedClientDay> {
    let medication = timed_tally(&index.med_plans, &index.med_events, shifts, today, false);
    let tube_feeding = timed_tally(&index.tube_plans, &index.tube_events, shifts, today, false);
    let fluid = timed_tally(&index.fluid_plans, &index.fluid_events, shifts, today, true);
    let meals = meal_tally(&index.meal_plans, &index.meal_events, date, today);
    let report_count = index.report_counts.get(&date).copied().unwrap_or(0);

    let pending_medications = medication.pending + medication.next_day_pending;
    let pending_sondevoeding = tube_feeding.pending + tube_feeding.next_day_pending;
    let pending_io = fluid.pending + fluid.next_day_pending;
    let has_issues = report_count == 0
        || pending_medications > 0
        || pending_sondevoeding > 0
        || pending_io > 0
        || meals > 0;
    if !has_issues {
        return None;
    }

    let medication_date = if medication.pending > 0 {
        Some(date)
    } else if medication.next_day_pending > 0 {
        date.checked_add_days(Days::new(1))
    } else {
        None
    };

    Some(MissedClientDay {
        client_id,
        pending_medications,
        total_medications: medication.total,
        medication_date,
        pending_sondevoeding,
        total_sondevoeding: tube_feeding.total,
        pending_io,
        pending_voeding: meals,
        has_report: report_count > 0,
    })
}

/// Scheduled-vs-administered doses for one timed domain over all of a
/// client's shifts on one day, using the same overnight two-pass split
/// as the daily aggregation. Overlapping shift windows never double
/// count: each (obligation, date, time) occurrence is tallied once.
/// Occurrences on days that are still open are not judged at all; unmet
/// morning-pass doses are tallied separately so they can be attributed
/// to the day after the shift.
fn timed_tally(
    plans: &[Obligation],
    events: &HashMap<NaiveDate, Vec<Event>>,
    shifts: &[&ShiftAssignment],
    today: NaiveDate,
    tolerance: bool,
) -> TimedTally {
    let mut tally = TimedTally::default();
    let mut counted: HashSet<(Uuid, NaiveDate, NaiveTime)> = HashSet::new();
    for &shift in shifts {
        for (day, part) in window::window_passes(shift) {
            if day >= today {
                continue;
            }
            let day_events = if tolerance {
                events_around(events, day)
            } else {
                events.get(&day).cloned().unwrap_or_default()
            };
            for plan in plans {
                if !recurrence::applies(plan, day) {
                    continue;
                }
                let ObligationKind::Timed { times, .. } = &plan.kind else {
                    continue;
                };
                for &time in times {
                    if !window::in_window(time, shift.start_time, shift.end_time, part) {
                        continue;
                    }
                    if !counted.insert((plan.id, day, time)) {
                        continue;
                    }
                    tally.total += 1;
                    let event = if tolerance {
                        matching::match_fluid(plan.id, day, time, &day_events)
                    } else {
                        matching::match_timed(plan.id, day, time, &day_events)
                    };
                    if matching::instance_status(event, day, today) == TaskStatus::Missing {
                        if part == DayPart::Morning {
                            tally.next_day_pending += 1;
                        } else {
                            tally.pending += 1;
                        }
                    }
                }
            }
        }
    }
    tally
}

/// Unrecorded meals for one date. Meal records carry no time-of-day, so
/// there is no window or overnight handling here.
fn meal_tally(
    plans: &[Obligation],
    events: &HashMap<NaiveDate, Vec<Event>>,
    date: NaiveDate,
    today: NaiveDate,
) -> usize {
    let day_events = events.get(&date).cloned().unwrap_or_default();
    let mut pending = 0;
    for plan in plans {
        if !recurrence::applies(plan, date) {
            continue;
        }
        let ObligationKind::Meal { meal_type } = &plan.kind else {
            continue;
        };
        let event = matching::match_meal(plan.client_id, date, *meal_type, &day_events);
        if matching::instance_status(event, date, today) == TaskStatus::Missing {
            pending += 1;
        }
    }
    pending
}

/// Dutch human-readable label, e.g. "maandag 10 juni 2024".
fn date_label(date: NaiveDate) -> String {
    const DAYS: [&str; 7] = [
        "maandag", "dinsdag", "woensdag", "donderdag", "vrijdag", "zaterdag", "zondag",
    ];
    const MONTHS: [&str; 12] = [
        "januari", "februari", "maart", "april", "mei", "juni", "juli", "augustus",
        "september", "oktober", "november", "december",
    ];
    format!(
        "{} {} {} {}",
        DAYS[date.weekday().num_days_from_monday() as usize],
        date.day(),
        MONTHS[date.month0() as usize],
        date.year()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn date_label_is_dutch() {
        // 2024-06-10 is a Monday.
        let date = NaiveDate::from_ymd_opt(2024, 6, 10).unwrap();
        assert_eq!(date_label(date), "maandag 10 juni 2024");
    }

    #[test]
    fn lookback_range_excludes_today() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 10).unwrap();
        let range = lookback_range(60, today).unwrap();
        assert_eq!(range.end, NaiveDate::from_ymd_opt(2024, 6, 9).unwrap());
        assert_eq!(range.start, NaiveDate::from_ymd_opt(2024, 4, 11).unwrap());
        assert!(lookback_range(0, today).is_err());
    }
}
