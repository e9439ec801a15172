//! Check-in domain model.
//!
//! # Responsibility
//! - Define the persisted check-in record and toggle outcome.
//! - Provide the inclusive `DateRange` used by history queries.
//!
//! # Invariants
//! - At most one check-in per `(habit_uuid, date)`.
//! - Check-ins are created or removed, never updated.

use crate::model::habit::{HabitId, ValidationError};
use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};

/// Persisted check-in record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checkin {
    pub id: i64,
    pub habit_uuid: HabitId,
    pub date: NaiveDate,
    /// Unix epoch milliseconds.
    pub created_at: i64,
}

/// Resulting state of one `(habit, date)` pair after a toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckinState {
    Checked,
    Unchecked,
}

impl CheckinState {
    pub fn is_checked(self) -> bool {
        matches!(self, Self::Checked)
    }
}

impl From<bool> for CheckinState {
    fn from(checked: bool) -> Self {
        if checked {
            Self::Checked
        } else {
            Self::Unchecked
        }
    }
}

/// Returns `date` if it can be stored as `YYYY-MM-DD` text.
///
/// Stored dates compare lexically, which matches calendar order only for
/// four-digit, non-negative years.
pub fn ensure_storable_date(date: NaiveDate) -> Result<NaiveDate, ValidationError> {
    if (0..=9999).contains(&date.year()) {
        Ok(date)
    } else {
        Err(ValidationError::DateOutOfRange { date })
    }
}

/// Inclusive calendar date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    /// Builds `start..=end`; rejects `start > end` and unstorable bounds.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, ValidationError> {
        ensure_storable_date(start)?;
        ensure_storable_date(end)?;
        if start > end {
            return Err(ValidationError::InvalidDateRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// The `days` calendar days ending at `end` (inclusive).
    ///
    /// `days == 0` is treated as a single-day range.
    pub fn ending_at(end: NaiveDate, days: u32) -> Self {
        let back = u64::from(days.saturating_sub(1));
        let start = end.checked_sub_days(Days::new(back)).unwrap_or(NaiveDate::MIN);
        Self { start, end }
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Iterates every date in the range, ascending.
    pub fn iter_days(&self) -> impl Iterator<Item = NaiveDate> {
        let end = self.end;
        self.start.iter_days().take_while(move |date| *date <= end)
    }
}
