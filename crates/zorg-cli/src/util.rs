use chrono::{NaiveDate, Utc};
use chrono_tz::Tz;

/// The current calendar date in the configured timezone. "Today" decides
/// which tasks count as still open versus missed, so it has to follow the
/// care organisation's wall clock, not UTC.
pub fn local_today(tz: &Tz) -> NaiveDate {
    Utc::now().with_timezone(tz).date_naive()
}
