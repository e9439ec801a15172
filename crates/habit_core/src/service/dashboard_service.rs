//! Dashboard read models for habit list and detail screens.
//!
//! # Responsibility
//! - Compose habit store reads with streak computation for display.
//! - Build the fixed-size daily history grid shown on a habit's detail view.
//!
//! # Invariants
//! - "Today" is always supplied by the caller.
//! - Grid cells are contiguous, ascending, and end at `today`.

use crate::model::checkin::{CheckinState, DateRange};
use crate::model::habit::{Habit, HabitId};
use crate::repo::habit_repo::{HabitListQuery, HabitRepository, RepoError, RepoResult};
use crate::streak::compute_streak;
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::HashSet;

/// Number of days shown in the detail history grid.
pub const HISTORY_WINDOW_DAYS: u32 = 30;

/// One row of the active habit list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HabitSummary {
    pub habit: Habit,
    pub streak: u32,
    pub checked_today: bool,
}

/// One day of the history grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DayCell {
    pub date: NaiveDate,
    pub checked: bool,
}

/// Detail view of a single habit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HabitDetail {
    pub habit: Habit,
    pub days: Vec<DayCell>,
    pub streak: u32,
    pub checked_today: bool,
    pub total_checkins: u64,
}

pub struct DashboardService<R: HabitRepository> {
    repo: R,
}

impl<R: HabitRepository> DashboardService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Active habits, oldest first, each with its current streak.
    pub fn overview(&self, today: NaiveDate) -> RepoResult<Vec<HabitSummary>> {
        self.overview_with(&HabitListQuery::active(), today)
    }

    /// Like `overview`, for any habit selection. Rows keep the store's
    /// creation order, archived habits interleaved with active ones.
    pub fn overview_with(
        &self,
        query: &HabitListQuery,
        today: NaiveDate,
    ) -> RepoResult<Vec<HabitSummary>> {
        let habits = self.repo.list_habits(query)?;
        let mut summaries = Vec::with_capacity(habits.len());
        for habit in habits {
            let dates = self.repo.list_checkin_dates(habit.uuid, None)?;
            let checked_today = dates.binary_search(&today).is_ok();
            summaries.push(HabitSummary {
                streak: compute_streak(dates, today),
                checked_today,
                habit,
            });
        }
        Ok(summaries)
    }

    /// Detail view with a `HISTORY_WINDOW_DAYS` grid ending at `today`.
    pub fn detail(&self, id: HabitId, today: NaiveDate) -> RepoResult<HabitDetail> {
        let habit = self.repo.get_habit(id)?.ok_or(RepoError::NotFound(id))?;

        let window = DateRange::ending_at(today, HISTORY_WINDOW_DAYS);
        let in_window: HashSet<NaiveDate> = self
            .repo
            .list_checkin_dates(id, Some(window))?
            .into_iter()
            .collect();
        let days = window
            .iter_days()
            .map(|date| DayCell {
                date,
                checked: in_window.contains(&date),
            })
            .collect();

        let history = self.repo.list_checkin_dates(id, None)?;
        let total_checkins = self.repo.count_checkins(id)?;

        Ok(HabitDetail {
            habit,
            days,
            streak: compute_streak(history, today),
            checked_today: in_window.contains(&today),
            total_checkins,
        })
    }

    /// Toggles today's check-in for one habit.
    pub fn toggle_today(&self, id: HabitId, today: NaiveDate) -> RepoResult<CheckinState> {
        self.repo.toggle_checkin(id, today)
    }
}
