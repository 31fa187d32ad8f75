//! Breathing phases and the per-session plan.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

pub const DEFAULT_INHALE_SECS: u64 = 4;
pub const DEFAULT_HOLD_SECS: u64 = 4;
pub const DEFAULT_EXHALE_SECS: u64 = 6;
pub const DEFAULT_REPS_PER_SESSION: u32 = 15;
pub const DEFAULT_MAX_SESSIONS_PER_DAY: u32 = 3;

/// The phase a session is currently in. `Idle` means no session is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Idle,
    Inhale,
    Hold,
    Exhale,
}

impl Phase {
    pub fn label(&self) -> &'static str {
        match self {
            Phase::Idle => "idle",
            Phase::Inhale => "inhale",
            Phase::Hold => "hold",
            Phase::Exhale => "exhale",
        }
    }

    /// Whether this phase is part of an active breathing cycle.
    pub fn is_breathing(&self) -> bool {
        !matches!(self, Phase::Idle)
    }
}

/// Durations and limits for one guided session.
///
/// All durations are whole seconds and must be at least 1; the limits
/// must be at least 1 as well.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhasePlan {
    pub inhale_secs: u64,
    pub hold_secs: u64,
    pub exhale_secs: u64,
    pub reps_per_session: u32,
    pub max_sessions_per_day: u32,
}

impl PhasePlan {
    pub fn new(
        inhale_secs: u64,
        hold_secs: u64,
        exhale_secs: u64,
        reps_per_session: u32,
        max_sessions_per_day: u32,
    ) -> Result<Self, ValidationError> {
        fn require_positive(field: &str, value: u64) -> Result<(), ValidationError> {
            if value == 0 {
                return Err(ValidationError::InvalidValue {
                    field: field.to_string(),
                    message: "must be at least 1".to_string(),
                });
            }
            Ok(())
        }

        require_positive("inhale_secs", inhale_secs)?;
        require_positive("hold_secs", hold_secs)?;
        require_positive("exhale_secs", exhale_secs)?;
        require_positive("reps_per_session", u64::from(reps_per_session))?;
        require_positive("max_sessions_per_day", u64::from(max_sessions_per_day))?;

        Ok(PhasePlan {
            inhale_secs,
            hold_secs,
            exhale_secs,
            reps_per_session,
            max_sessions_per_day,
        })
    }

    /// Duration of the given phase under this plan. `Idle` has no timer.
    pub fn duration_secs(&self, phase: Phase) -> u64 {
        match phase {
            Phase::Idle => 0,
            Phase::Inhale => self.inhale_secs,
            Phase::Hold => self.hold_secs,
            Phase::Exhale => self.exhale_secs,
        }
    }

    /// Total breathing time for a full session, in seconds.
    pub fn session_secs(&self) -> u64 {
        (self.inhale_secs + self.hold_secs + self.exhale_secs) * u64::from(self.reps_per_session)
    }
}

impl Default for PhasePlan {
    fn default() -> Self {
        PhasePlan {
            inhale_secs: DEFAULT_INHALE_SECS,
            hold_secs: DEFAULT_HOLD_SECS,
            exhale_secs: DEFAULT_EXHALE_SECS,
            reps_per_session: DEFAULT_REPS_PER_SESSION,
            max_sessions_per_day: DEFAULT_MAX_SESSIONS_PER_DAY,
        }
    }
}

/// What a resumed session goes back to after a pause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResumeBehavior {
    /// Restart the interrupted rep from its inhale.
    RestartRep,
    /// Restart only the interrupted phase, keeping cycle position.
    RestartPhase,
}

impl Default for ResumeBehavior {
    fn default() -> Self {
        ResumeBehavior::RestartRep
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_plan_is_4_4_6_by_15() {
        let plan = PhasePlan::default();
        assert_eq!(plan.inhale_secs, 4);
        assert_eq!(plan.hold_secs, 4);
        assert_eq!(plan.exhale_secs, 6);
        assert_eq!(plan.reps_per_session, 15);
        assert_eq!(plan.max_sessions_per_day, 3);
        assert_eq!(plan.session_secs(), 14 * 15);
    }

    #[test]
    fn plan_rejects_zero_values() {
        assert!(PhasePlan::new(0, 4, 6, 15, 3).is_err());
        assert!(PhasePlan::new(4, 0, 6, 15, 3).is_err());
        assert!(PhasePlan::new(4, 4, 0, 15, 3).is_err());
        assert!(PhasePlan::new(4, 4, 6, 0, 3).is_err());
        assert!(PhasePlan::new(4, 4, 6, 15, 0).is_err());
        assert!(PhasePlan::new(1, 1, 1, 1, 1).is_ok());
    }

    #[test]
    fn idle_has_no_duration() {
        let plan = PhasePlan::default();
        assert_eq!(plan.duration_secs(Phase::Idle), 0);
        assert_eq!(plan.duration_secs(Phase::Exhale), 6);
        assert!(!Phase::Idle.is_breathing());
        assert!(Phase::Hold.is_breathing());
    }
}
