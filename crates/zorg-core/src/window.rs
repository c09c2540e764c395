//! Shift-window classification, including the two-pass split for shifts
//! that cross midnight.
//!
//! An overnight shift (end time earlier than start time) is never
//! evaluated as one window. It is split into an evening pass against the
//! shift's own date and a morning pass against the next date, and the
//! same split is applied everywhere shifts are considered: daily
//! aggregation, the missed-task scan and standalone in-shift checks.

use chrono::{Days, NaiveDate, NaiveTime};

use crate::models::ShiftAssignment;

/// Which half of a shift a pass evaluates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayPart {
    /// Non-overnight shift, single pass over the full window.
    Full,
    /// Overnight shift, the part on the shift's own date.
    Evening,
    /// Overnight shift, the part on the next date.
    Morning,
}

/// Whether a time-of-day falls inside the given shift window half.
pub fn in_window(time: NaiveTime, shift_start: NaiveTime, shift_end: NaiveTime, part: DayPart) -> bool {
    match part {
        DayPart::Full => shift_start <= time && time <= shift_end,
        DayPart::Evening => time >= shift_start,
        DayPart::Morning => time <= shift_end,
    }
}

/// The evaluation passes for one shift: `(date, part)` pairs.
///
/// Non-overnight shifts get a single full pass; overnight shifts get an
/// evening pass on their own date and a morning pass on the next date.
pub fn window_passes(shift: &ShiftAssignment) -> Vec<(NaiveDate, DayPart)> {
    if shift.is_overnight() {
        let next = shift.date.checked_add_days(Days::new(1)).unwrap_or(shift.date);
        vec![(shift.date, DayPart::Evening), (next, DayPart::Morning)]
    } else {
        vec![(shift.date, DayPart::Full)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ShiftStatus;
    use rstest::rstest;
    use uuid::Uuid;

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn shift(start: NaiveTime, end: NaiveTime) -> ShiftAssignment {
        ShiftAssignment {
            id: Uuid::now_v7(),
            caregiver_id: Uuid::now_v7(),
            client_id: Uuid::now_v7(),
            date: NaiveDate::from_ymd_opt(2024, 6, 10).unwrap(),
            start_time: start,
            end_time: end,
            status: ShiftStatus::Filled,
        }
    }

    #[rstest]
    #[case(time(9, 0), true)]
    #[case(time(12, 30), true)]
    #[case(time(17, 0), true)]
    #[case(time(8, 59), false)]
    #[case(time(17, 1), false)]
    fn full_window_is_inclusive_on_both_ends(#[case] t: NaiveTime, #[case] expected: bool) {
        assert_eq!(in_window(t, time(9, 0), time(17, 0), DayPart::Full), expected);
    }

    #[test]
    fn overnight_shift_splits_across_two_dates() {
        // 22:00-06:00 on 2024-06-10: 23:30 belongs to the evening pass on
        // the 10th, 05:00 to the morning pass on the 11th, 12:00 to
        // neither.
        let s = shift(time(22, 0), time(6, 0));
        let passes = window_passes(&s);
        assert_eq!(
            passes,
            vec![
                (NaiveDate::from_ymd_opt(2024, 6, 10).unwrap(), DayPart::Evening),
                (NaiveDate::from_ymd_opt(2024, 6, 11).unwrap(), DayPart::Morning),
            ]
        );

        assert!(in_window(time(23, 30), s.start_time, s.end_time, DayPart::Evening));
        assert!(!in_window(time(23, 30), s.start_time, s.end_time, DayPart::Morning));
        assert!(in_window(time(5, 0), s.start_time, s.end_time, DayPart::Morning));
        assert!(!in_window(time(5, 0), s.start_time, s.end_time, DayPart::Evening));
        assert!(!in_window(time(12, 0), s.start_time, s.end_time, DayPart::Evening));
        assert!(!in_window(time(12, 0), s.start_time, s.end_time, DayPart::Morning));
    }

    #[test]
    fn day_shift_gets_a_single_full_pass() {
        let s = shift(time(9, 0), time(17, 0));
        assert_eq!(window_passes(&s), vec![(s.date, DayPart::Full)]);
    }

    #[test]
    fn shift_boundaries_are_in_window() {
        let s = shift(time(22, 0), time(6, 0));
        assert!(in_window(time(22, 0), s.start_time, s.end_time, DayPart::Evening));
        assert!(in_window(time(6, 0), s.start_time, s.end_time, DayPart::Morning));
    }
}
