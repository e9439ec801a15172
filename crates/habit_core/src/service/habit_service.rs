//! Habit use-case service.
//!
//! # Responsibility
//! - Provide stable entry points for habit and check-in callers.
//! - Normalize raw user input before delegating to the repository.
//!
//! # Invariants
//! - Service APIs never bypass repository validation/persistence contracts.
//! - Service layer remains storage-agnostic and never reads the clock.

use crate::model::checkin::{Checkin, CheckinState, DateRange};
use crate::model::habit::{Habit, HabitId, NewHabit};
use crate::repo::habit_repo::{HabitListQuery, HabitRepository, RepoError, RepoResult};
use chrono::NaiveDate;

/// Use-case service wrapper for habit store operations.
pub struct HabitService<R: HabitRepository> {
    repo: R,
}

impl<R: HabitRepository> HabitService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates a habit from raw form input.
    ///
    /// # Contract
    /// - `name` is trimmed; blank fails with `RepoError::Validation` and
    ///   writes nothing.
    /// - Blank `description` is stored as `None`.
    pub fn create_habit(&self, name: &str, description: Option<&str>) -> RepoResult<HabitId> {
        let habit = NewHabit::new(name, description)?;
        self.repo.create_habit(&habit)
    }

    /// Gets one habit by id, archived or not.
    pub fn get_habit(&self, id: HabitId) -> RepoResult<Habit> {
        self.repo.get_habit(id)?.ok_or(RepoError::NotFound(id))
    }

    /// Lists non-archived habits, oldest first.
    pub fn list_active_habits(&self) -> RepoResult<Vec<Habit>> {
        self.repo.list_habits(&HabitListQuery::active())
    }

    /// Lists habits, optionally including archived ones.
    pub fn list_habits(&self, include_archived: bool) -> RepoResult<Vec<Habit>> {
        self.repo.list_habits(&HabitListQuery { include_archived })
    }

    /// Flips the check-in for `date` and returns the resulting state.
    pub fn toggle_checkin(&self, id: HabitId, date: NaiveDate) -> RepoResult<CheckinState> {
        self.repo.toggle_checkin(id, date)
    }

    /// Forces the check-in for `date` on or off.
    pub fn set_checkin(
        &self,
        id: HabitId,
        date: NaiveDate,
        checked: bool,
    ) -> RepoResult<CheckinState> {
        self.repo.set_checkin(id, date, checked)
    }

    /// Lists checked-in dates in `start..=end`, ascending.
    ///
    /// Returns `RepoError::Validation` when `start > end`.
    pub fn list_checkins_in_range(
        &self,
        id: HabitId,
        start: NaiveDate,
        end: NaiveDate,
    ) -> RepoResult<Vec<NaiveDate>> {
        let range = DateRange::new(start, end)?;
        self.repo.list_checkin_dates(id, Some(range))
    }

    /// Lists checked-in dates, ascending. `None` means full history.
    pub fn list_checkin_dates(
        &self,
        id: HabitId,
        range: Option<DateRange>,
    ) -> RepoResult<Vec<NaiveDate>> {
        self.repo.list_checkin_dates(id, range)
    }

    /// Lists check-in records, ascending by date.
    pub fn list_checkins(&self, id: HabitId, range: Option<DateRange>) -> RepoResult<Vec<Checkin>> {
        self.repo.list_checkins(id, range)
    }

    /// Archives a habit; its history is kept.
    pub fn archive_habit(&self, id: HabitId) -> RepoResult<()> {
        self.repo.archive_habit(id)
    }

    /// Deletes a habit and all of its check-ins.
    pub fn delete_habit(&self, id: HabitId) -> RepoResult<()> {
        self.repo.delete_habit(id)
    }
}
