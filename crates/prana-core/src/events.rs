use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::session::Phase;
use crate::stats::Badge;

/// Every state change in the system produces an Event.
/// The CLI renders them live; any frontend can subscribe to the same stream.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    /// A new breathing phase was entered and its timer armed.
    PhaseChanged {
        phase: Phase,
        rep: u32,
        duration_secs: u64,
        at: DateTime<Utc>,
    },
    /// One full inhale-hold-exhale cycle finished.
    RepCompleted {
        rep: u32,
        at: DateTime<Utc>,
    },
    /// All reps of the session finished.
    SessionCompleted {
        reps: u32,
        at: DateTime<Utc>,
    },
    SessionPaused {
        phase: Phase,
        rep: u32,
        at: DateTime<Utc>,
    },
    SessionResumed {
        phase: Phase,
        at: DateTime<Utc>,
    },
    SessionStopped {
        at: DateTime<Utc>,
    },
    /// Start was refused because today's session quota is used up.
    DailyLimitReached {
        sessions_today: u32,
        limit: u32,
        at: DateTime<Utc>,
    },
    BadgeAwarded {
        badge: Badge,
        at: DateTime<Utc>,
    },
}
