//! Badge rules and idempotent awarding.

use serde::{Deserialize, Serialize};

use super::ledger::StatsRecord;

pub const CHAMPION_TOTAL_REPS: u64 = 150;
pub const WEEKLY_PRO_SESSIONS: u32 = 10;

/// Achievements tied to counter thresholds. Awarded at most once; the
/// stored badge set keeps insertion order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Badge {
    BreathingChampion,
    WeeklyPro,
}

impl Badge {
    pub const ALL: [Badge; 2] = [Badge::BreathingChampion, Badge::WeeklyPro];

    /// Stable identifier used in the persisted badge set.
    pub fn id(&self) -> &'static str {
        match self {
            Badge::BreathingChampion => "breathing-champion",
            Badge::WeeklyPro => "weekly-pro",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Badge::BreathingChampion => "Breathing Champion",
            Badge::WeeklyPro => "Weekly Pro",
        }
    }

    pub fn describe(&self) -> String {
        match self {
            Badge::BreathingChampion => {
                format!("Complete {CHAMPION_TOTAL_REPS} breathing reps in total")
            }
            Badge::WeeklyPro => format!("Complete {WEEKLY_PRO_SESSIONS} sessions in one week"),
        }
    }

    pub fn earned_by(&self, stats: &StatsRecord) -> bool {
        match self {
            Badge::BreathingChampion => stats.total_reps >= CHAMPION_TOTAL_REPS,
            Badge::WeeklyPro => stats.week.sessions >= WEEKLY_PRO_SESSIONS,
        }
    }
}

/// Award every badge whose rule now holds and is not yet in the set.
/// Returns only the newly awarded badges, so each award is observable
/// exactly once.
pub fn evaluate(stats: &mut StatsRecord) -> Vec<Badge> {
    let mut awarded = Vec::new();
    for badge in Badge::ALL {
        if badge.earned_by(stats) && !stats.badges.iter().any(|held| held == badge.id()) {
            stats.badges.push(badge.id().to_string());
            awarded.push(badge);
        }
    }
    awarded
}
