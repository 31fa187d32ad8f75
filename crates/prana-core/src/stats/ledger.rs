//! The stats ledger: single writer of the persisted profile.
//!
//! The profile is loaded once when the ledger opens; every mutation is
//! written back through the store before the call returns. A missing or
//! unreadable profile falls back to a fresh one, never to an error.
//!
//! Counting discipline: `total_reps` advances exactly once per completed
//! rep, through `on_rep_completed()`. Session completion adds points and
//! the period counters but does not touch `total_reps` again.

use chrono::{Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::badges;
use super::motivation::MotivationTier;
use super::periods::{self, DailyWindow, MonthlyWindow, WeeklyWindow};
use crate::error::{CoreError, StorageError};
use crate::events::Event;
use crate::reminders;
use crate::storage::{Profile, ProfileStore};

/// Fixed award for every completed session.
pub const POINTS_PER_SESSION: u64 = 10;

const DEFAULT_DAILY_CAP: u32 = 3;

/// Persisted counters, period markers, points and badges.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StatsRecord {
    pub today: DailyWindow,
    pub week: WeeklyWindow,
    pub month: MonthlyWindow,
    pub total_reps: u64,
    pub points: u64,
    pub badges: Vec<String>,
}

impl StatsRecord {
    pub fn for_date(date: NaiveDate) -> Self {
        Self {
            today: DailyWindow::for_date(date),
            week: WeeklyWindow::for_date(date),
            month: MonthlyWindow::for_date(date),
            total_reps: 0,
            points: 0,
            badges: Vec::new(),
        }
    }
}

impl Default for StatsRecord {
    fn default() -> Self {
        Self::for_date(Local::now().date_naive())
    }
}

/// Owns the loaded profile and the store it came from.
pub struct StatsLedger<S: ProfileStore> {
    store: S,
    profile: Profile,
    daily_cap: u32,
}

impl<S: ProfileStore> StatsLedger<S> {
    /// Load the profile, or start a fresh one if the store has none or
    /// cannot be read. Period windows are normalized for today.
    pub fn open(store: S) -> Self {
        Self::open_at(store, Local::now().date_naive())
    }

    fn open_at(store: S, today: NaiveDate) -> Self {
        let mut profile = match store.load() {
            Ok(Some(profile)) => profile,
            Ok(None) => Profile::for_date(today),
            Err(e) => {
                eprintln!("Warning: starting with a fresh profile: {e}");
                Profile::for_date(today)
            }
        };
        periods::roll_periods(&mut profile.stats, today);
        Self {
            store,
            profile,
            daily_cap: DEFAULT_DAILY_CAP,
        }
    }

    /// Cap applied to the `sessions today` counter. Minimum 1.
    pub fn with_daily_cap(mut self, cap: u32) -> Self {
        self.daily_cap = cap.max(1);
        self
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    /// Sessions completed today. Reads as zero once the stored day marker
    /// falls behind the calendar, even before the next rollover is saved.
    pub fn sessions_today(&self) -> u32 {
        if self.profile.stats.today.date == Local::now().date_naive() {
            self.profile.stats.today.sessions
        } else {
            0
        }
    }

    pub fn motivation(&self, daily_goal: u32) -> MotivationTier {
        MotivationTier::for_day(self.sessions_today(), daily_goal)
    }

    // ── Recording ────────────────────────────────────────────────────

    /// Record one finished rep. Persists before returning.
    pub fn on_rep_completed(&mut self) -> Result<(), StorageError> {
        self.profile.stats.total_reps += 1;
        self.save()
    }

    /// Record one finished session and award any badges that now apply.
    /// A report of zero reps is ignored. Returns the badge events.
    pub fn on_session_completed(&mut self, reps: u32) -> Result<Vec<Event>, StorageError> {
        self.on_session_completed_at(reps, Local::now().date_naive())
    }

    fn on_session_completed_at(
        &mut self,
        reps: u32,
        today: NaiveDate,
    ) -> Result<Vec<Event>, StorageError> {
        if reps == 0 {
            return Ok(Vec::new());
        }
        let stats = &mut self.profile.stats;
        periods::roll_periods(stats, today);
        stats.today.sessions = (stats.today.sessions + 1).min(self.daily_cap);
        stats.week.sessions += 1;
        stats.month.sessions += 1;
        stats.points += POINTS_PER_SESSION;
        let awarded = badges::evaluate(stats);
        self.save()?;
        Ok(awarded
            .into_iter()
            .map(|badge| Event::BadgeAwarded {
                badge,
                at: Utc::now(),
            })
            .collect())
    }

    // ── Profile upkeep ───────────────────────────────────────────────

    pub fn set_user_name(&mut self, name: &str) -> Result<(), StorageError> {
        self.profile.user_name = name.trim().to_string();
        self.save()
    }

    /// Add a reminder time, stored in canonical `HH:MM` form.
    /// Returns false when the time was already scheduled.
    pub fn add_reminder(&mut self, time: &str) -> Result<bool, CoreError> {
        let normalized = reminders::normalize(time)?;
        if self
            .profile
            .notification_times
            .iter()
            .any(|t| t == &normalized)
        {
            return Ok(false);
        }
        self.profile.notification_times.push(normalized);
        self.save()?;
        Ok(true)
    }

    /// Remove a reminder time. Returns false when it was not scheduled.
    pub fn remove_reminder(&mut self, time: &str) -> Result<bool, CoreError> {
        let normalized = reminders::normalize(time)?;
        let before = self.profile.notification_times.len();
        self.profile
            .notification_times
            .retain(|t| t != &normalized);
        if self.profile.notification_times.len() == before {
            return Ok(false);
        }
        self.save()?;
        Ok(true)
    }

    /// Throw everything away and persist a fresh profile.
    pub fn reset(&mut self) -> Result<(), StorageError> {
        self.profile = Profile::for_date(Local::now().date_naive());
        self.save()
    }

    fn save(&self) -> Result<(), StorageError> {
        self.store.save(&self.profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::Badge;
    use crate::storage::MemoryStore;
    use proptest::prelude::*;
    use std::path::PathBuf;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    struct FailingStore;

    impl ProfileStore for FailingStore {
        fn load(&self) -> Result<Option<Profile>, StorageError> {
            Err(StorageError::ParseFailed {
                path: PathBuf::from("profile.json"),
                source: serde_json::from_str::<Profile>("not json").unwrap_err(),
            })
        }

        fn save(&self, _profile: &Profile) -> Result<(), StorageError> {
            Ok(())
        }
    }

    #[test]
    fn opens_fresh_when_store_is_empty() {
        let ledger = StatsLedger::open(MemoryStore::default());
        assert_eq!(ledger.sessions_today(), 0);
        assert_eq!(ledger.profile().stats.total_reps, 0);
        assert!(ledger.profile().stats.badges.is_empty());
    }

    #[test]
    fn unreadable_profile_falls_back_to_fresh() {
        let ledger = StatsLedger::open(FailingStore);
        assert_eq!(ledger.sessions_today(), 0);
        assert_eq!(ledger.profile().stats.points, 0);
    }

    #[test]
    fn session_completion_updates_every_counter() {
        let today = date(2026, 8, 22);
        let mut ledger = StatsLedger::open_at(MemoryStore::default(), today);
        let events = ledger.on_session_completed_at(15, today).unwrap();
        assert!(events.is_empty());

        let stats = &ledger.profile().stats;
        assert_eq!(stats.today.sessions, 1);
        assert_eq!(stats.week.sessions, 1);
        assert_eq!(stats.month.sessions, 1);
        assert_eq!(stats.points, POINTS_PER_SESSION);
        // Reps are counted by on_rep_completed alone.
        assert_eq!(stats.total_reps, 0);
    }

    #[test]
    fn zero_rep_sessions_are_ignored() {
        let today = date(2026, 8, 22);
        let mut ledger = StatsLedger::open_at(MemoryStore::default(), today);
        ledger.on_session_completed_at(0, today).unwrap();
        assert_eq!(ledger.profile().stats.points, 0);
        assert_eq!(ledger.profile().stats.today.sessions, 0);
    }

    #[test]
    fn sessions_today_saturates_at_the_cap() {
        let today = date(2026, 8, 22);
        let mut ledger = StatsLedger::open_at(MemoryStore::default(), today);
        for _ in 0..5 {
            ledger.on_session_completed_at(15, today).unwrap();
        }
        let stats = &ledger.profile().stats;
        assert_eq!(stats.today.sessions, 3);
        // Weekly and monthly counters have no cap.
        assert_eq!(stats.week.sessions, 5);
        assert_eq!(stats.points, 5 * POINTS_PER_SESSION);
    }

    #[test]
    fn mutations_are_persisted_through_the_store() {
        let store = MemoryStore::default();
        {
            let mut ledger = StatsLedger::open(store.clone());
            ledger.on_rep_completed().unwrap();
            ledger.on_rep_completed().unwrap();
            ledger.on_session_completed(15).unwrap();
            ledger.set_user_name("Asha").unwrap();
        }
        let reopened = StatsLedger::open(store);
        assert_eq!(reopened.profile().stats.total_reps, 2);
        assert_eq!(reopened.profile().stats.points, POINTS_PER_SESSION);
        assert_eq!(reopened.profile().user_name, "Asha");
    }

    #[test]
    fn stale_day_marker_rolls_over_on_open() {
        let store = MemoryStore::default();
        let yesterday = date(2026, 8, 21);
        let today = date(2026, 8, 22);
        {
            let mut ledger = StatsLedger::open_at(store.clone(), yesterday);
            for _ in 0..3 {
                ledger.on_session_completed_at(15, yesterday).unwrap();
            }
        }
        let ledger = StatsLedger::open_at(store, today);
        assert_eq!(ledger.profile().stats.today.sessions, 0);
        assert_eq!(ledger.profile().stats.today.date, today);
        // Same week, so the weekly counter carries over.
        assert_eq!(ledger.profile().stats.week.sessions, 3);
        assert_eq!(ledger.profile().stats.points, 3 * POINTS_PER_SESSION);
    }

    #[test]
    fn champion_badge_lands_on_the_150th_rep_session() {
        let today = date(2026, 8, 22);
        let store = MemoryStore::default();
        let mut profile = Profile::for_date(today);
        profile.stats.total_reps = 149;
        store.save(&profile).unwrap();

        let mut ledger = StatsLedger::open_at(store, today);
        ledger.on_rep_completed().unwrap();
        assert_eq!(ledger.profile().stats.total_reps, 150);

        let events = ledger.on_session_completed_at(15, today).unwrap();
        assert!(matches!(
            events.as_slice(),
            [Event::BadgeAwarded {
                badge: Badge::BreathingChampion,
                ..
            }]
        ));

        // The next completed session must not re-award it.
        let events = ledger.on_session_completed_at(15, today).unwrap();
        assert!(events.is_empty());
        assert_eq!(ledger.profile().stats.badges, vec!["breathing-champion"]);
    }

    #[test]
    fn weekly_pro_lands_on_the_tenth_session_of_a_week() {
        let today = date(2026, 8, 22);
        let mut ledger = StatsLedger::open_at(MemoryStore::default(), today);
        for _ in 0..9 {
            assert!(ledger.on_session_completed_at(15, today).unwrap().is_empty());
        }
        let events = ledger.on_session_completed_at(15, today).unwrap();
        assert!(matches!(
            events.as_slice(),
            [Event::BadgeAwarded {
                badge: Badge::WeeklyPro,
                ..
            }]
        ));
    }

    #[test]
    fn reminders_are_normalized_and_deduplicated() {
        let mut ledger = StatsLedger::open(MemoryStore::default());
        assert!(ledger.add_reminder("7:30").unwrap());
        assert!(!ledger.add_reminder("07:30").unwrap());
        assert_eq!(ledger.profile().notification_times, vec!["07:30"]);

        assert!(ledger.add_reminder("evening").is_err());

        assert!(ledger.remove_reminder("07:30").unwrap());
        assert!(!ledger.remove_reminder("07:30").unwrap());
        assert!(ledger.profile().notification_times.is_empty());
    }

    #[test]
    fn reset_clears_everything() {
        let store = MemoryStore::default();
        let mut ledger = StatsLedger::open(store.clone());
        ledger.on_rep_completed().unwrap();
        ledger.set_user_name("Asha").unwrap();
        ledger.reset().unwrap();

        assert_eq!(ledger.profile().stats.total_reps, 0);
        assert_eq!(ledger.profile().user_name, "");
        let reopened = StatsLedger::open(store);
        assert_eq!(reopened.profile().stats.total_reps, 0);
    }

    proptest! {
        /// N rep reports always add exactly N to the total.
        #[test]
        fn total_reps_counts_every_rep(n in 0u32..200) {
            let mut ledger = StatsLedger::open(MemoryStore::default());
            for _ in 0..n {
                ledger.on_rep_completed().unwrap();
            }
            prop_assert_eq!(ledger.profile().stats.total_reps, u64::from(n));
        }

        /// Completed sessions move each period counter by exactly one,
        /// except for the capped daily counter.
        #[test]
        fn sessions_move_period_counters_in_step(n in 1u32..12) {
            let today = date(2026, 8, 22);
            let mut ledger = StatsLedger::open_at(MemoryStore::default(), today);
            for _ in 0..n {
                ledger.on_session_completed_at(15, today).unwrap();
            }
            let stats = &ledger.profile().stats;
            prop_assert_eq!(stats.week.sessions, n);
            prop_assert_eq!(stats.month.sessions, n);
            prop_assert_eq!(stats.today.sessions, n.min(3));
            prop_assert_eq!(stats.points, u64::from(n) * POINTS_PER_SESSION);
        }
    }
}
