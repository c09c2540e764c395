use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

/// Care domain an obligation or event belongs to.
///
/// The wire names (`medicatie`, `sondevoeding`, ...) live on the output
/// structs; internally everything is keyed by this enum.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum CareDomain {
    Medication,
    TubeFeeding,
    FluidIntake,
    Meal,
    Nursing,
    WoundCare,
}

#[derive(Error, Debug, PartialEq)]
#[error("Invalid care domain: {0}")]
pub struct ParseCareDomainError(String);

impl FromStr for CareDomain {
    type Err = ParseCareDomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "medication" => Ok(CareDomain::Medication),
            "tube_feeding" => Ok(CareDomain::TubeFeeding),
            "fluid_intake" => Ok(CareDomain::FluidIntake),
            "meal" => Ok(CareDomain::Meal),
            "nursing" => Ok(CareDomain::Nursing),
            "wound_care" => Ok(CareDomain::WoundCare),
            _ => Err(ParseCareDomainError(s.to_string())),
        }
    }
}

impl std::fmt::Display for CareDomain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CareDomain::Medication => write!(f, "medication"),
            CareDomain::TubeFeeding => write!(f, "tube_feeding"),
            CareDomain::FluidIntake => write!(f, "fluid_intake"),
            CareDomain::Meal => write!(f, "meal"),
            CareDomain::Nursing => write!(f, "nursing"),
            CareDomain::WoundCare => write!(f, "wound_care"),
        }
    }
}

/// Recurrence grammar of an obligation.
///
/// Parsing never fails: an unrecognized type is kept verbatim as `Other`
/// so the evaluator can apply its fail-open default and callers can log
/// what the write side actually stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecurrenceType {
    OneTime,
    Daily,
    Weekly,
    SpecificDays,
    AsNeeded,
    Other(String),
}

impl RecurrenceType {
    pub fn from_raw(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "one_time" => RecurrenceType::OneTime,
            "daily" => RecurrenceType::Daily,
            "weekly" => RecurrenceType::Weekly,
            "specific_days" => RecurrenceType::SpecificDays,
            "as_needed" => RecurrenceType::AsNeeded,
            _ => RecurrenceType::Other(s.to_string()),
        }
    }
}

impl FromStr for RecurrenceType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_raw(s))
    }
}

impl std::fmt::Display for RecurrenceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecurrenceType::OneTime => write!(f, "one_time"),
            RecurrenceType::Daily => write!(f, "daily"),
            RecurrenceType::Weekly => write!(f, "weekly"),
            RecurrenceType::SpecificDays => write!(f, "specific_days"),
            RecurrenceType::AsNeeded => write!(f, "as_needed"),
            RecurrenceType::Other(raw) => write!(f, "{}", raw),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
}

#[derive(Error, Debug, PartialEq)]
#[error("Invalid meal type: {0}")]
pub struct ParseMealTypeError(String);

impl FromStr for MealType {
    type Err = ParseMealTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "breakfast" => Ok(MealType::Breakfast),
            "lunch" => Ok(MealType::Lunch),
            "dinner" => Ok(MealType::Dinner),
            "snack" => Ok(MealType::Snack),
            _ => Err(ParseMealTypeError(s.to_string())),
        }
    }
}

impl std::fmt::Display for MealType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MealType::Breakfast => write!(f, "breakfast"),
            MealType::Lunch => write!(f, "lunch"),
            MealType::Dinner => write!(f, "dinner"),
            MealType::Snack => write!(f, "snack"),
        }
    }
}

/// Domain-specific payload of an obligation.
#[derive(Debug, Clone, PartialEq)]
pub enum ObligationKind {
    /// Medication, tube feeding or fluid intake: one or more scheduled
    /// times per covered day. An empty time list contributes zero
    /// occurrences (the degraded form of a malformed payload).
    Timed {
        domain: CareDomain,
        times: Vec<NaiveTime>,
        dose: Option<String>,
    },
    /// Meal schedule: matched per date by meal type, no time component.
    Meal { meal_type: MealType },
    /// Nursing procedure or wound care: a single rolling due date that
    /// the write side recomputes after each completion. `None` means no
    /// completion has ever been recorded, which counts as due.
    DueDate {
        domain: CareDomain,
        next_due: Option<NaiveDate>,
    },
}

impl ObligationKind {
    pub fn domain(&self) -> CareDomain {
        match self {
            ObligationKind::Timed { domain, .. } => *domain,
            ObligationKind::Meal { .. } => CareDomain::Meal,
            ObligationKind::DueDate { domain, .. } => *domain,
        }
    }
}

/// A definition of recurring or one-time care that ought to happen.
///
/// Treated as an immutable snapshot for the duration of one
/// reconciliation call; only the external write paths mutate these.
#[derive(Debug, Clone, PartialEq)]
pub struct Obligation {
    pub id: Uuid,
    pub client_id: Uuid,
    pub name: String,
    pub is_active: bool,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub recurrence: RecurrenceType,
    /// Only meaningful for weekly/specific_days. `None` covers both the
    /// absent and the unparsable case; the evaluator fails closed on it.
    pub days_of_week: Option<Vec<Weekday>>,
    pub kind: ObligationKind,
}

impl Obligation {
    pub fn domain(&self) -> CareDomain {
        self.kind.domain()
    }

    /// Whether the obligation's active range covers `date`.
    ///
    /// Date-only comparison; the store boundary already stripped any
    /// time-of-day from the bounds.
    pub fn covers(&self, date: NaiveDate) -> bool {
        self.is_active
            && self.start_date <= date
            && self.end_date.map_or(true, |end| date <= end)
    }
}

impl Default for Obligation {
    fn default() -> Self {
        Self {
            id: Uuid::now_v7(),
            client_id: Uuid::nil(),
            name: String::new(),
            is_active: true,
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            end_date: None,
            recurrence: RecurrenceType::Daily,
            days_of_week: None,
            kind: ObligationKind::Timed {
                domain: CareDomain::Medication,
                times: Vec::new(),
                dose: None,
            },
        }
    }
}

/// A recorded occurrence of care having been given, skipped or observed.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub id: Uuid,
    pub obligation_id: Option<Uuid>,
    pub client_id: Uuid,
    pub caregiver_id: Uuid,
    pub domain: CareDomain,
    /// Set for timed administrations (medication, tube feeding).
    pub scheduled_at: Option<NaiveDateTime>,
    /// Set for meal and fluid records.
    pub record_date: Option<NaiveDate>,
    pub record_time: Option<NaiveTime>,
    pub meal_type: Option<MealType>,
    pub was_given: bool,
    pub skip_reason: Option<String>,
}

impl Event {
    /// The calendar date this event belongs to.
    pub fn occurred_on(&self) -> Option<NaiveDate> {
        self.record_date.or_else(|| self.scheduled_at.map(|at| at.date()))
    }
}

impl Default for Event {
    fn default() -> Self {
        Self {
            id: Uuid::now_v7(),
            obligation_id: None,
            client_id: Uuid::nil(),
            caregiver_id: Uuid::nil(),
            domain: CareDomain::Medication,
            scheduled_at: None,
            record_date: None,
            record_time: None,
            meal_type: None,
            was_given: true,
            skip_reason: None,
        }
    }
}

/// A caregiver's shift report for one client and one date.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Report {
    pub id: Uuid,
    pub client_id: Uuid,
    pub caregiver_id: Uuid,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "TEXT", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ShiftStatus {
    Unfilled,
    Filled,
    Completed,
    Cancelled,
}

impl ShiftStatus {
    /// The statuses under which a shift actually qualifies a caregiver
    /// for a client's tasks.
    pub const ACTIVE: &'static [ShiftStatus] = &[ShiftStatus::Filled, ShiftStatus::Completed];
}

#[derive(Error, Debug, PartialEq)]
#[error("Invalid shift status: {0}")]
pub struct ParseShiftStatusError(String);

impl FromStr for ShiftStatus {
    type Err = ParseShiftStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "unfilled" => Ok(ShiftStatus::Unfilled),
            "filled" => Ok(ShiftStatus::Filled),
            "completed" => Ok(ShiftStatus::Completed),
            "cancelled" => Ok(ShiftStatus::Cancelled),
            _ => Err(ParseShiftStatusError(s.to_string())),
        }
    }
}

/// A caregiver's assignment to one client on one date.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct ShiftAssignment {
    pub id: Uuid,
    pub caregiver_id: Uuid,
    pub client_id: Uuid,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub status: ShiftStatus,
}

impl ShiftAssignment {
    /// An end time earlier than the start time denotes a shift spanning
    /// into the next calendar date. Overnight-ness is derived, never
    /// stored.
    pub fn is_overnight(&self) -> bool {
        self.end_time < self.start_time
    }
}

/// Status of one matched obligation occurrence.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Given,
    Skipped,
    Pending,
    Missing,
}

impl TaskStatus {
    /// Pending and missing are both unmet; they differ only in whether
    /// the date is still open.
    pub fn is_unmet(&self) -> bool {
        matches!(self, TaskStatus::Pending | TaskStatus::Missing)
    }
}

/// One concrete due occurrence of an obligation on one date, after
/// matching against events. Exists only transiently inside one engine
/// invocation.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TaskInstance {
    pub obligation_id: Uuid,
    pub client_id: Uuid,
    pub domain: CareDomain,
    pub date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheduled_time: Option<NaiveTime>,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dose: Option<String>,
    pub status: TaskStatus,
    pub is_overdue: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip_reason: Option<String>,
}

/// Tri-state badge for a client-day or a whole period.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DayStatus {
    AllDone,
    Pending,
    Overdue,
}

impl DayStatus {
    /// Pure classification from counts, applied identically at client-day
    /// and period granularity.
    pub fn classify(overdue: usize, pending: usize) -> Self {
        if overdue > 0 {
            DayStatus::Overdue
        } else if pending > 0 {
            DayStatus::Pending
        } else {
            DayStatus::AllDone
        }
    }
}

/// Per-domain counts for one client and one date.
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
pub struct DomainSummary {
    pub total: usize,
    pub given: usize,
    pub skipped: usize,
    pub pending: usize,
}

impl DomainSummary {
    pub fn record(&mut self, status: TaskStatus) {
        self.total += 1;
        match status {
            TaskStatus::Given => self.given += 1,
            TaskStatus::Skipped => self.skipped += 1,
            TaskStatus::Pending | TaskStatus::Missing => self.pending += 1,
        }
    }

    pub fn from_items(items: &[TaskInstance]) -> Self {
        let mut summary = Self::default();
        for item in items {
            summary.record(item.status);
        }
        summary
    }
}

/// Inclusive calendar-date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    pub fn single(date: NaiveDate) -> Self {
        Self { start: date, end: date }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Every date in the range, ascending. Empty when start > end.
    pub fn days(self) -> impl Iterator<Item = NaiveDate> {
        std::iter::successors(Some(self.start), |d| d.succ_opt())
            .take_while(move |d| *d <= self.end)
    }
}
