//! Reminder times and their scheduling arithmetic.
//!
//! Times are stored as `HH:MM` local wall-clock strings. A watcher keeps
//! at most one pending alert per entry: each entry maps to its single
//! next occurrence, and firing re-arms it for the following day.

use chrono::{DateTime, Days, Local, NaiveTime};

use crate::error::ValidationError;

/// Parse a user-supplied `HH:MM` (24-hour) time.
pub fn parse_time(value: &str) -> Result<NaiveTime, ValidationError> {
    NaiveTime::parse_from_str(value.trim(), "%H:%M").map_err(|_| ValidationError::InvalidTime {
        value: value.to_string(),
    })
}

/// Canonical `HH:MM` form of a user-supplied time.
pub fn normalize(value: &str) -> Result<String, ValidationError> {
    Ok(parse_time(value)?.format("%H:%M").to_string())
}

/// The next local occurrence of `time` strictly after `now`.
///
/// Days that skip the wall-clock time entirely (DST gaps) are passed
/// over; ambiguous times resolve to their earliest reading.
pub fn next_occurrence(time: NaiveTime, now: DateTime<Local>) -> DateTime<Local> {
    let today = now.date_naive();
    for offset in 0..3 {
        if let Some(day) = today.checked_add_days(Days::new(offset)) {
            if let Some(candidate) = day.and_time(time).and_local_timezone(Local).earliest() {
                if candidate > now {
                    return candidate;
                }
            }
        }
    }
    now + chrono::Duration::days(1)
}

/// A pending alert: which entry it is for and when it fires.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reminder {
    pub time: NaiveTime,
    pub due_at: DateTime<Local>,
}

/// Parsed reminder entries, deduplicated and sorted by clock time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReminderSchedule {
    times: Vec<NaiveTime>,
}

impl ReminderSchedule {
    /// Build from stored entries. Unparseable entries are dropped with a
    /// warning instead of poisoning the whole schedule.
    pub fn from_entries(entries: &[String]) -> Self {
        let mut times = Vec::new();
        for entry in entries {
            match parse_time(entry) {
                Ok(time) => {
                    if !times.contains(&time) {
                        times.push(time);
                    }
                }
                Err(e) => eprintln!("Warning: skipping reminder entry: {e}"),
            }
        }
        times.sort();
        Self { times }
    }

    pub fn times(&self) -> &[NaiveTime] {
        &self.times
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// The nearest upcoming alert across all entries.
    pub fn next_after(&self, now: DateTime<Local>) -> Option<Reminder> {
        self.times
            .iter()
            .map(|&time| Reminder {
                time,
                due_at: next_occurrence(time, now),
            })
            .min_by_key(|reminder| reminder.due_at)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(h: u32, m: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(2026, 8, 22, h, m, 0).unwrap()
    }

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn parses_and_normalizes_clock_times() {
        assert_eq!(normalize("08:30").unwrap(), "08:30");
        assert_eq!(normalize("8:30").unwrap(), "08:30");
        assert_eq!(normalize(" 20:00 ").unwrap(), "20:00");

        assert!(normalize("24:00").is_err());
        assert!(normalize("08:61").is_err());
        assert!(normalize("evening").is_err());
        assert!(normalize("08:30:00").is_err());
        assert!(normalize("").is_err());
    }

    #[test]
    fn next_occurrence_lands_today_or_tomorrow() {
        let now = at(9, 0);

        let later_today = next_occurrence(time(9, 30), now);
        assert_eq!(later_today.date_naive(), now.date_naive());

        let earlier = next_occurrence(time(8, 0), now);
        assert_eq!(earlier.date_naive(), now.date_naive().succ_opt().unwrap());

        // Exactly now re-arms for tomorrow: "strictly after".
        let exact = next_occurrence(time(9, 0), now);
        assert_eq!(exact.date_naive(), now.date_naive().succ_opt().unwrap());
    }

    #[test]
    fn schedule_picks_the_nearest_entry() {
        let entries = vec!["20:00".to_string(), "08:30".to_string()];
        let schedule = ReminderSchedule::from_entries(&entries);
        assert_eq!(schedule.times(), &[time(8, 30), time(20, 0)]);

        let morning = schedule.next_after(at(9, 0)).unwrap();
        assert_eq!(morning.time, time(20, 0));

        let evening = schedule.next_after(at(21, 0)).unwrap();
        assert_eq!(evening.time, time(8, 30));
        assert_eq!(
            evening.due_at.date_naive(),
            at(21, 0).date_naive().succ_opt().unwrap()
        );
    }

    #[test]
    fn unparseable_entries_are_dropped() {
        let entries = vec![
            "08:30".to_string(),
            "soon".to_string(),
            "08:30".to_string(),
        ];
        let schedule = ReminderSchedule::from_entries(&entries);
        assert_eq!(schedule.times().len(), 1);
    }

    #[test]
    fn empty_schedule_has_no_next() {
        assert!(ReminderSchedule::default().next_after(at(9, 0)).is_none());
    }
}
