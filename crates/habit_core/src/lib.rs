//! Core domain logic for the habit tracker.
//! This crate is the single source of truth for habit and check-in invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod streak;

pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::checkin::{Checkin, CheckinState, DateRange};
pub use model::habit::{Habit, HabitId, NewHabit, ValidationError, HABIT_NAME_MAX_CHARS};
pub use repo::habit_repo::{
    HabitListQuery, HabitRepository, RepoError, RepoResult, SqliteHabitRepository,
};
pub use service::dashboard_service::{
    DashboardService, DayCell, HabitDetail, HabitSummary, HISTORY_WINDOW_DAYS,
};
pub use service::habit_service::HabitService;
pub use streak::compute_streak;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
