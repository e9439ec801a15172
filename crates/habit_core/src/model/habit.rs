//! Habit domain model.
//!
//! # Responsibility
//! - Define the persisted habit record and its creation input.
//! - Normalize and validate user-supplied names/descriptions.
//!
//! # Invariants
//! - `name` is trimmed, non-empty and at most `HABIT_NAME_MAX_CHARS` chars.
//! - A blank description is stored as `None`.
//! - `archived` only ever transitions `false -> true`.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for a habit.
pub type HabitId = Uuid;

/// Maximum habit name length, in characters.
pub const HABIT_NAME_MAX_CHARS: usize = 120;

/// Input rejected before it reaches storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Name is empty after trimming.
    EmptyName,
    /// Name exceeds `HABIT_NAME_MAX_CHARS`.
    NameTooLong { max: usize, actual: usize },
    /// Range start is after range end.
    InvalidDateRange { start: NaiveDate, end: NaiveDate },
    /// Date falls outside years 0000..=9999, which dates are stored as.
    DateOutOfRange { date: NaiveDate },
    /// Field was not trimmed/normalized before reaching storage.
    NotNormalized { field: &'static str },
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName => write!(f, "habit name must not be blank"),
            Self::NameTooLong { max, actual } => {
                write!(f, "habit name is {actual} characters; maximum is {max}")
            }
            Self::InvalidDateRange { start, end } => {
                write!(f, "date range start {start} is after end {end}")
            }
            Self::DateOutOfRange { date } => {
                write!(f, "date {date} is outside supported years 0000-9999")
            }
            Self::NotNormalized { field } => {
                write!(f, "habit {field} must be trimmed and non-blank")
            }
        }
    }
}

impl Error for ValidationError {}

/// Persisted habit record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Habit {
    pub uuid: HabitId,
    pub name: String,
    pub description: Option<String>,
    /// Unix epoch milliseconds.
    pub created_at: i64,
    pub archived: bool,
}

impl Habit {
    /// Returns whether this habit shows up in the active list.
    pub fn is_active(&self) -> bool {
        !self.archived
    }
}

/// Validated input for creating a habit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewHabit {
    pub uuid: HabitId,
    pub name: String,
    pub description: Option<String>,
}

impl NewHabit {
    /// Normalizes and validates creation input, assigning a fresh id.
    pub fn new(name: &str, description: Option<&str>) -> Result<Self, ValidationError> {
        Self::with_id(Uuid::new_v4(), name, description)
    }

    /// Same as [`NewHabit::new`] with a caller-provided id.
    ///
    /// Used by imports and tests that need deterministic identity.
    pub fn with_id(
        uuid: HabitId,
        name: &str,
        description: Option<&str>,
    ) -> Result<Self, ValidationError> {
        let name = normalize_name(name)?;
        let description = description
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_string);
        Ok(Self {
            uuid,
            name,
            description,
        })
    }

    /// Re-checks invariants; write paths call this before SQL mutations.
    ///
    /// Fields are public, so a hand-built value must already be in the
    /// normalized form `with_id` would produce.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if normalize_name(&self.name)? != self.name {
            return Err(ValidationError::NotNormalized { field: "name" });
        }
        if let Some(description) = &self.description {
            if description.trim() != description || description.is_empty() {
                return Err(ValidationError::NotNormalized {
                    field: "description",
                });
            }
        }
        Ok(())
    }
}

/// Trims `name` and enforces non-empty/max-length rules.
pub fn normalize_name(name: &str) -> Result<String, ValidationError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyName);
    }
    let actual = trimmed.chars().count();
    if actual > HABIT_NAME_MAX_CHARS {
        return Err(ValidationError::NameTooLong {
            max: HABIT_NAME_MAX_CHARS,
            actual,
        });
    }
    Ok(trimmed.to_string())
}
