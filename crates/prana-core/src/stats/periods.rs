//! Calendar windows for the period counters.
//!
//! Each window stores the marker of the period it was counted in. At load
//! time (and before any increment) the stored markers are compared against
//! today's; a differing marker zeroes that window. Totals and points are
//! never touched by a rollover.

use chrono::{Datelike, Local, NaiveDate};
use serde::{Deserialize, Serialize};

use super::ledger::StatsRecord;

/// Sessions counted for one calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyWindow {
    pub sessions: u32,
    pub date: NaiveDate,
}

/// Sessions counted for one week of the year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyWindow {
    pub sessions: u32,
    pub week_number: u32,
}

/// Sessions counted for one month, `month` being zero-based (0 = January).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyWindow {
    pub sessions: u32,
    pub month: u32,
}

impl DailyWindow {
    pub fn for_date(date: NaiveDate) -> Self {
        Self { sessions: 0, date }
    }
}

impl WeeklyWindow {
    pub fn for_date(date: NaiveDate) -> Self {
        Self {
            sessions: 0,
            week_number: week_number(date),
        }
    }
}

impl MonthlyWindow {
    pub fn for_date(date: NaiveDate) -> Self {
        Self {
            sessions: 0,
            month: date.month0(),
        }
    }
}

impl Default for DailyWindow {
    fn default() -> Self {
        Self::for_date(Local::now().date_naive())
    }
}

impl Default for WeeklyWindow {
    fn default() -> Self {
        Self::for_date(Local::now().date_naive())
    }
}

impl Default for MonthlyWindow {
    fn default() -> Self {
        Self::for_date(Local::now().date_naive())
    }
}

/// Week of the year, 1-based, with weeks running Sunday to Saturday:
/// `ceil((day_of_year + weekday_of_jan_1) / 7)` where Sunday counts as 0.
pub fn week_number(date: NaiveDate) -> u32 {
    let jan_1 = NaiveDate::from_ymd_opt(date.year(), 1, 1).unwrap_or(date);
    let offset = jan_1.weekday().num_days_from_sunday();
    (date.ordinal() + offset).div_ceil(7)
}

/// Zero every window whose stored marker no longer matches `today`.
/// Returns whether anything was reset.
pub fn roll_periods(stats: &mut StatsRecord, today: NaiveDate) -> bool {
    let mut rolled = false;
    if stats.today.date != today {
        stats.today = DailyWindow::for_date(today);
        rolled = true;
    }
    if stats.week.week_number != week_number(today) {
        stats.week = WeeklyWindow::for_date(today);
        rolled = true;
    }
    if stats.month.month != today.month0() {
        stats.month = MonthlyWindow::for_date(today);
        rolled = true;
    }
    rolled
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn week_number_advances_on_sundays() {
        // 2024-01-01 is a Monday, so the first week ends Saturday the 6th.
        assert_eq!(week_number(date(2024, 1, 1)), 1);
        assert_eq!(week_number(date(2024, 1, 6)), 1);
        assert_eq!(week_number(date(2024, 1, 7)), 2);
        assert_eq!(week_number(date(2024, 12, 31)), 53);
    }

    #[test]
    fn week_number_accounts_for_jan_1_weekday() {
        // 2023-01-01 is a Sunday: no offset, week 2 starts on the 8th.
        assert_eq!(week_number(date(2023, 1, 1)), 1);
        assert_eq!(week_number(date(2023, 1, 7)), 1);
        assert_eq!(week_number(date(2023, 1, 8)), 2);
    }

    #[test]
    fn same_day_rolls_nothing() {
        let today = date(2026, 8, 22);
        let mut stats = StatsRecord::for_date(today);
        stats.today.sessions = 2;
        stats.week.sessions = 5;
        stats.month.sessions = 9;

        assert!(!roll_periods(&mut stats, today));
        assert_eq!(stats.today.sessions, 2);
        assert_eq!(stats.week.sessions, 5);
        assert_eq!(stats.month.sessions, 9);
    }

    #[test]
    fn next_day_in_same_week_resets_only_the_day() {
        // Both dates sit in the same Sunday-based week and month.
        let monday = date(2026, 8, 17);
        let tuesday = date(2026, 8, 18);
        let mut stats = StatsRecord::for_date(monday);
        stats.today.sessions = 3;
        stats.week.sessions = 4;
        stats.month.sessions = 6;
        stats.total_reps = 120;

        assert!(roll_periods(&mut stats, tuesday));
        assert_eq!(stats.today.sessions, 0);
        assert_eq!(stats.today.date, tuesday);
        assert_eq!(stats.week.sessions, 4);
        assert_eq!(stats.month.sessions, 6);
        assert_eq!(stats.total_reps, 120);
    }

    #[test]
    fn new_week_resets_weekly_sessions() {
        let saturday = date(2026, 8, 15);
        let sunday = date(2026, 8, 16);
        assert_ne!(week_number(saturday), week_number(sunday));

        let mut stats = StatsRecord::for_date(saturday);
        stats.week.sessions = 11;
        roll_periods(&mut stats, sunday);
        assert_eq!(stats.week.sessions, 0);
        assert_eq!(stats.week.week_number, week_number(sunday));
    }

    #[test]
    fn new_month_resets_monthly_sessions() {
        let august = date(2026, 8, 31);
        let september = date(2026, 9, 1);
        let mut stats = StatsRecord::for_date(august);
        stats.month.sessions = 20;
        roll_periods(&mut stats, september);
        assert_eq!(stats.month.sessions, 0);
        assert_eq!(stats.month.month, 8);
    }
}
