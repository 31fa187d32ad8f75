//! Motivational state derived from today's session count.

use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

/// Congratulatory lines for a finished day, picked at random.
pub const CONGRATULATIONS: [&str; 5] = [
    "Wonderful! You reached your breathing goal for today.",
    "All sessions done. Enjoy the calm you built today.",
    "Goal reached. Your breath carried you all the way.",
    "Beautiful work. Today's practice is complete.",
    "Every session done for today. Breathe easy.",
];

/// Three-tier read on how today's practice is going.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MotivationTier {
    NotYetToday,
    InProgress,
    GoalReached,
}

impl MotivationTier {
    /// Pure tier selection from today's count against the daily goal.
    pub fn for_day(sessions_today: u32, daily_goal: u32) -> Self {
        if sessions_today == 0 {
            MotivationTier::NotYetToday
        } else if sessions_today >= daily_goal {
            MotivationTier::GoalReached
        } else {
            MotivationTier::InProgress
        }
    }

    /// User-facing message. Deterministic except for the goal tier, which
    /// draws from the congratulations pool.
    pub fn message(&self) -> &'static str {
        match self {
            MotivationTier::NotYetToday => {
                "No practice yet today. A few calm breaths are a good way to begin."
            }
            MotivationTier::InProgress => "Nice start. Keep going and finish today's sessions.",
            MotivationTier::GoalReached => congratulation(),
        }
    }
}

fn congratulation() -> &'static str {
    CONGRATULATIONS
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or(CONGRATULATIONS[0])
}
