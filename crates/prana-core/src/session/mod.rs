mod engine;
mod phase;
mod runner;

pub use engine::{ArmedPhase, PhaseToken, SessionEngine, SessionState};
pub use phase::{
    Phase, PhasePlan, ResumeBehavior, DEFAULT_EXHALE_SECS, DEFAULT_HOLD_SECS, DEFAULT_INHALE_SECS,
    DEFAULT_MAX_SESSIONS_PER_DAY, DEFAULT_REPS_PER_SESSION,
};
pub use runner::{SessionCommand, SessionRunner};
