//! Recurrence evaluation: decides whether a dated or recurring obligation
//! applies on a given calendar date.
//!
//! This is the single shared evaluator for every call site (daily
//! aggregation, missed-task scanning, standalone checks); the source
//! system duplicated this logic per endpoint and drifted.

use chrono::{Datelike, NaiveDate};

use crate::models::{Obligation, RecurrenceType};

/// Whether `obligation` is due on `date`.
///
/// All comparisons are calendar-date equality; time-of-day never enters
/// into it. Two deliberate asymmetric defaults are preserved from the
/// source system:
///
/// - an *unrecognized* recurrence type fails open (due on every covered
///   date), so a new type introduced by the write side degrades to
///   over-reporting rather than silently dropping care;
/// - an *absent or unparsable* weekday set on weekly/specific_days fails
///   closed (never due), because without the day set there is no way to
///   pick the right dates.
pub fn applies(obligation: &Obligation, date: NaiveDate) -> bool {
    if !obligation.covers(date) {
        return false;
    }
    match &obligation.recurrence {
        RecurrenceType::OneTime => date == obligation.start_date,
        RecurrenceType::Daily => true,
        RecurrenceType::Weekly | RecurrenceType::SpecificDays => obligation
            .days_of_week
            .as_ref()
            .map(|days| days.contains(&date.weekday()))
            .unwrap_or(false),
        // Caregiver-initiated only; excluded from every due calculation.
        RecurrenceType::AsNeeded => false,
        RecurrenceType::Other(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CareDomain, ObligationKind};
    use chrono::Weekday;
    use rstest::rstest;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn obligation(recurrence: RecurrenceType) -> Obligation {
        Obligation {
            start_date: date(2024, 3, 1),
            recurrence,
            kind: ObligationKind::Timed {
                domain: CareDomain::Medication,
                times: Vec::new(),
                dose: None,
            },
            ..Default::default()
        }
    }

    #[test]
    fn one_time_applies_only_on_start_date() {
        let ob = obligation(RecurrenceType::OneTime);
        assert!(applies(&ob, date(2024, 3, 1)));
        assert!(!applies(&ob, date(2024, 3, 2)));
        assert!(!applies(&ob, date(2024, 2, 29)));
    }

    #[rstest]
    #[case(date(2024, 3, 1))]
    #[case(date(2024, 3, 15))]
    #[case(date(2026, 12, 31))]
    fn daily_without_end_applies_on_every_date_from_start(#[case] d: NaiveDate) {
        let ob = obligation(RecurrenceType::Daily);
        assert!(applies(&ob, d));
    }

    #[test]
    fn daily_respects_end_date() {
        let ob = Obligation {
            end_date: Some(date(2024, 3, 10)),
            ..obligation(RecurrenceType::Daily)
        };
        assert!(applies(&ob, date(2024, 3, 10)));
        assert!(!applies(&ob, date(2024, 3, 11)));
    }

    #[rstest]
    // 2024-03-04 is a Monday.
    #[case(RecurrenceType::Weekly)]
    #[case(RecurrenceType::SpecificDays)]
    fn weekday_grammars_follow_the_day_set(#[case] recurrence: RecurrenceType) {
        let ob = Obligation {
            days_of_week: Some(vec![Weekday::Mon, Weekday::Thu]),
            ..obligation(recurrence)
        };
        assert!(applies(&ob, date(2024, 3, 4)));
        assert!(applies(&ob, date(2024, 3, 7)));
        assert!(!applies(&ob, date(2024, 3, 5)));
    }

    #[rstest]
    #[case(RecurrenceType::Weekly)]
    #[case(RecurrenceType::SpecificDays)]
    fn missing_day_set_fails_closed(#[case] recurrence: RecurrenceType) {
        let ob = obligation(recurrence);
        assert!(!applies(&ob, date(2024, 3, 4)));
    }

    #[test]
    fn as_needed_is_never_due() {
        let ob = obligation(RecurrenceType::AsNeeded);
        assert!(!applies(&ob, date(2024, 3, 1)));
        assert!(!applies(&ob, date(2024, 3, 15)));
    }

    #[test]
    fn unknown_recurrence_fails_open_within_range() {
        let ob = Obligation {
            end_date: Some(date(2024, 3, 10)),
            ..obligation(RecurrenceType::Other("biweekly".to_string()))
        };
        assert!(applies(&ob, date(2024, 3, 5)));
        assert!(!applies(&ob, date(2024, 3, 11)));
    }

    #[test]
    fn inactive_obligation_never_applies() {
        let ob = Obligation {
            is_active: false,
            ..obligation(RecurrenceType::Daily)
        };
        assert!(!applies(&ob, date(2024, 3, 5)));
    }
}
