//! Administration matching: pairs a concrete scheduled occurrence with a
//! recorded event.
//!
//! Medication and tube feeding match exactly on calendar date plus
//! (hour, minute); meals match by meal type for the date; fluid intake is
//! the only domain with a tolerance window, because intake timing is
//! inherently imprecise. When several events satisfy a predicate the
//! first in iteration order wins: the write side enforces uniqueness,
//! and reconciliation must never fail on a duplicate that slipped
//! through.

use chrono::{NaiveDate, NaiveTime, Timelike};
use uuid::Uuid;

use crate::models::{Event, MealType, TaskStatus};

/// Tolerance for fluid-intake matching, in minutes either side of the
/// scheduled time.
pub const FLUID_TOLERANCE_MINUTES: i64 = 60;

/// Exact match for medication and tube-feeding occurrences: obligation
/// identity plus calendar date plus (hour, minute) of the scheduled time.
pub fn match_timed<'a>(
    obligation_id: Uuid,
    date: NaiveDate,
    time: NaiveTime,
    events: &'a [Event],
) -> Option<&'a Event> {
    events.iter().find(|event| {
        event.obligation_id == Some(obligation_id)
            && event.scheduled_at.map_or(false, |at| {
                at.date() == date
                    && at.time().hour() == time.hour()
                    && at.time().minute() == time.minute()
            })
    })
}

/// Tolerance match for fluid-intake occurrences: any record for the
/// obligation within [`FLUID_TOLERANCE_MINUTES`] of the scheduled
/// datetime. Computed on full datetimes so a dose scheduled at 23:30 can
/// match a record at 00:15 on the next date.
pub fn match_fluid<'a>(
    obligation_id: Uuid,
    date: NaiveDate,
    time: NaiveTime,
    events: &'a [Event],
) -> Option<&'a Event> {
    let scheduled = date.and_time(time);
    events.iter().find(|event| {
        if event.obligation_id != Some(obligation_id) {
            return false;
        }
        let recorded = match (event.record_date, event.record_time) {
            (Some(d), Some(t)) => d.and_time(t),
            _ => return false,
        };
        (recorded - scheduled).num_minutes().abs() <= FLUID_TOLERANCE_MINUTES
    })
}

/// Presence match for meal occurrences: any record for the client on the
/// date whose meal type equals the schedule's. No time component.
pub fn match_meal<'a>(
    client_id: Uuid,
    date: NaiveDate,
    meal_type: MealType,
    events: &'a [Event],
) -> Option<&'a Event> {
    events.iter().find(|event| {
        event.client_id == client_id
            && event.record_date == Some(date)
            && event.meal_type == Some(meal_type)
    })
}

/// Completion match for due-date obligations (nursing, wound care): any
/// record for the obligation on the given date.
pub fn match_due_date<'a>(
    obligation_id: Uuid,
    date: NaiveDate,
    events: &'a [Event],
) -> Option<&'a Event> {
    events.iter().find(|event| {
        event.obligation_id == Some(obligation_id) && event.occurred_on() == Some(date)
    })
}

/// Status of one occurrence given its matched event (if any).
///
/// An unmatched occurrence on a day that is still open is pending, not
/// missing; only strictly past days are judged.
pub fn instance_status(event: Option<&Event>, date: NaiveDate, today: NaiveDate) -> TaskStatus {
    match event {
        Some(e) if e.was_given => TaskStatus::Given,
        Some(_) => TaskStatus::Skipped,
        None if date < today => TaskStatus::Missing,
        None => TaskStatus::Pending,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CareDomain;
    use proptest::prelude::*;
    use rstest::rstest;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn timed_event(obligation_id: Uuid, d: NaiveDate, t: NaiveTime, was_given: bool) -> Event {
        Event {
            obligation_id: Some(obligation_id),
            scheduled_at: Some(d.and_time(t)),
            was_given,
            ..Default::default()
        }
    }

    fn fluid_event(obligation_id: Uuid, d: NaiveDate, t: NaiveTime) -> Event {
        Event {
            obligation_id: Some(obligation_id),
            domain: CareDomain::FluidIntake,
            record_date: Some(d),
            record_time: Some(t),
            ..Default::default()
        }
    }

    #[test]
    fn timed_match_requires_exact_hour_and_minute() {
        let id = Uuid::now_v7();
        let d = date(2024, 3, 1);
        let events = vec![timed_event(id, d, time(8, 0), true)];

        assert!(match_timed(id, d, time(8, 0), &events).is_some());
        assert!(match_timed(id, d, time(8, 1), &events).is_none());
        assert!(match_timed(id, date(2024, 3, 2), time(8, 0), &events).is_none());
        assert!(match_timed(Uuid::now_v7(), d, time(8, 0), &events).is_none());
    }

    #[test]
    fn timed_match_ignores_seconds() {
        let id = Uuid::now_v7();
        let d = date(2024, 3, 1);
        let at = d.and_time(NaiveTime::from_hms_opt(8, 0, 42).unwrap());
        let events = vec![Event {
            obligation_id: Some(id),
            scheduled_at: Some(at),
            ..Default::default()
        }];
        assert!(match_timed(id, d, time(8, 0), &events).is_some());
    }

    #[test]
    fn duplicate_events_resolve_to_the_first() {
        let id = Uuid::now_v7();
        let d = date(2024, 3, 1);
        let first = timed_event(id, d, time(8, 0), false);
        let second = timed_event(id, d, time(8, 0), true);
        let first_id = first.id;
        let events = vec![first, second];

        let matched = match_timed(id, d, time(8, 0), &events).unwrap();
        assert_eq!(matched.id, first_id);
    }

    #[rstest]
    #[case(time(14, 45), true)] // 45 min <= tolerance
    #[case(time(15, 0), true)] // exactly 60 min
    #[case(time(15, 5), false)] // 65 min > tolerance
    #[case(time(13, 0), true)]
    #[case(time(12, 59), false)]
    fn fluid_match_uses_sixty_minute_tolerance(#[case] recorded: NaiveTime, #[case] expected: bool) {
        let id = Uuid::now_v7();
        let d = date(2024, 3, 1);
        let events = vec![fluid_event(id, d, recorded)];
        assert_eq!(match_fluid(id, d, time(14, 0), &events).is_some(), expected);
    }

    #[test]
    fn fluid_tolerance_spans_midnight() {
        let id = Uuid::now_v7();
        let events = vec![fluid_event(id, date(2024, 3, 2), time(0, 15))];
        assert!(match_fluid(id, date(2024, 3, 1), time(23, 30), &events).is_some());
    }

    proptest! {
        #[test]
        fn fluid_match_iff_within_tolerance(offset in -180i64..=180) {
            let id = Uuid::now_v7();
            let d = date(2024, 3, 1);
            let scheduled = d.and_time(time(12, 0));
            let recorded = scheduled + chrono::Duration::minutes(offset);
            let events = vec![fluid_event(id, recorded.date(), recorded.time())];
            let matched = match_fluid(id, d, time(12, 0), &events).is_some();
            prop_assert_eq!(matched, offset.abs() <= FLUID_TOLERANCE_MINUTES);
        }
    }

    #[test]
    fn meal_match_is_by_type_and_date_only() {
        let client = Uuid::now_v7();
        let d = date(2024, 3, 1);
        let events = vec![Event {
            client_id: client,
            domain: CareDomain::Meal,
            record_date: Some(d),
            meal_type: Some(MealType::Lunch),
            ..Default::default()
        }];

        assert!(match_meal(client, d, MealType::Lunch, &events).is_some());
        assert!(match_meal(client, d, MealType::Dinner, &events).is_none());
        assert!(match_meal(client, date(2024, 3, 2), MealType::Lunch, &events).is_none());
    }

    #[test]
    fn status_distinguishes_open_and_past_days() {
        let today = date(2024, 3, 2);
        // Unmatched on a past day: missing.
        assert_eq!(instance_status(None, date(2024, 3, 1), today), TaskStatus::Missing);
        // Unmatched on the open day (or a future one): pending.
        assert_eq!(instance_status(None, today, today), TaskStatus::Pending);
        assert_eq!(instance_status(None, date(2024, 3, 3), today), TaskStatus::Pending);

        let given = Event { was_given: true, ..Default::default() };
        let skipped = Event { was_given: false, ..Default::default() };
        assert_eq!(instance_status(Some(&given), date(2024, 3, 1), today), TaskStatus::Given);
        assert_eq!(instance_status(Some(&skipped), date(2024, 3, 1), today), TaskStatus::Skipped);
    }
}
