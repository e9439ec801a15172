//! Daily streak computation.
//!
//! Pure over its inputs: the caller supplies "today", so results never depend
//! on the system clock.

use chrono::{Days, NaiveDate};
use std::collections::HashSet;

/// Returns the length of the current consecutive-day streak.
///
/// The streak ends today when today is checked in, otherwise yesterday. If
/// neither day is present the streak is broken and `0` is returned.
/// Duplicates and ordering in `dates` are irrelevant; dates after `today`
/// never contribute.
pub fn compute_streak<I>(dates: I, today: NaiveDate) -> u32
where
    I: IntoIterator<Item = NaiveDate>,
{
    let date_set: HashSet<NaiveDate> = dates.into_iter().collect();
    if date_set.is_empty() {
        return 0;
    }

    let anchor = if date_set.contains(&today) {
        today
    } else {
        match today.pred_opt() {
            Some(yesterday) => yesterday,
            None => return 0,
        }
    };

    let mut streak = 0;
    let mut cursor = Some(anchor);
    while let Some(day) = cursor.filter(|day| date_set.contains(day)) {
        streak += 1;
        cursor = day.checked_sub_days(Days::new(1));
    }
    streak
}

#[cfg(test)]
mod tests {
    use super::compute_streak;
    use chrono::{Days, NaiveDate};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
    }

    fn ago(days: u64) -> NaiveDate {
        today().checked_sub_days(Days::new(days)).unwrap()
    }

    #[test]
    fn empty_set_has_no_streak() {
        assert_eq!(compute_streak(Vec::new(), today()), 0);
    }

    #[test]
    fn yesterday_and_today_count_two() {
        assert_eq!(compute_streak([ago(1), ago(0)], today()), 2);
    }

    #[test]
    fn gap_before_today_breaks_chain() {
        assert_eq!(compute_streak([ago(2), ago(0)], today()), 1);
    }

    #[test]
    fn yesterday_only_keeps_streak_alive() {
        assert_eq!(compute_streak([ago(1)], today()), 1);
    }

    #[test]
    fn two_days_ago_only_is_broken() {
        assert_eq!(compute_streak([ago(2), ago(3), ago(4)], today()), 0);
    }

    #[test]
    fn duplicates_and_order_do_not_matter() {
        let dates = [ago(0), ago(2), ago(1), ago(0), ago(1)];
        assert_eq!(compute_streak(dates, today()), 3);
    }

    #[test]
    fn future_dates_are_ignored() {
        let tomorrow = today().succ_opt().unwrap();
        assert_eq!(compute_streak([tomorrow], today()), 0);
        assert_eq!(compute_streak([tomorrow, ago(0)], today()), 1);
    }

    #[test]
    fn streak_walks_across_month_and_leap_day() {
        let dates = (0..5).map(ago).collect::<Vec<_>>();
        assert_eq!(dates[1], NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
        assert_eq!(compute_streak(dates, today()), 5);
    }

    #[test]
    fn any_set_containing_today_is_at_least_one() {
        for offsets in [vec![0], vec![0, 5], vec![0, 1, 9, 40], vec![0, 2, 4]] {
            let dates = offsets.into_iter().map(ago);
            assert!(compute_streak(dates, today()) >= 1);
        }
    }
}
