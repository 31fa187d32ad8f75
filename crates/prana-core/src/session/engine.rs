//! Session engine implementation.
//!
//! The session engine is a phase state machine. It does not own timers -
//! the caller arms one timer per phase entry and reports expiry through
//! `phase_elapsed()` with the token it was given.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Running -> Paused -> Running -> ... -> Idle
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = SessionEngine::new(PhasePlan::default());
//! let events = engine.start(sessions_today);
//! // Sleep until engine.armed() is due, then:
//! let events = engine.phase_elapsed(token); // Advances the cycle.
//! ```
//!
//! Every command returns the events it produced; an empty vec means the
//! command was ignored in the current state. Tokens are generation-stamped
//! so that a timer armed before a pause, stop or resume can never advance
//! the session it no longer belongs to, even when the re-entered phase has
//! the same name.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::phase::{Phase, PhasePlan, ResumeBehavior};
use crate::events::Event;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
    Idle,
    Running,
    Paused,
}

/// Identifies one phase entry. A fresh token is issued every time a phase
/// is entered; expiry reports carrying any older token are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseToken(u64);

/// The timer the caller should be running right now.
#[derive(Debug, Clone, Copy)]
pub struct ArmedPhase {
    pub token: PhaseToken,
    pub phase: Phase,
    pub due_at: DateTime<Utc>,
}

/// Core session engine.
///
/// Holds no timers and performs no IO. Commands mutate the state machine
/// and return the resulting events for the caller to act on.
#[derive(Debug, Clone)]
pub struct SessionEngine {
    plan: PhasePlan,
    resume_behavior: ResumeBehavior,
    phase: Phase,
    running: bool,
    /// Reps fully finished in the active session.
    reps_completed: u32,
    /// Bumped on every phase entry; stamps the tokens handed out.
    generation: u64,
    armed: Option<ArmedPhase>,
}

impl SessionEngine {
    /// Create a new engine for the given plan, starting idle.
    pub fn new(plan: PhasePlan) -> Self {
        Self::with_resume_behavior(plan, ResumeBehavior::default())
    }

    pub fn with_resume_behavior(plan: PhasePlan, resume_behavior: ResumeBehavior) -> Self {
        Self {
            plan,
            resume_behavior,
            phase: Phase::Idle,
            running: false,
            reps_completed: 0,
            generation: 0,
            armed: None,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> SessionState {
        if self.running {
            SessionState::Running
        } else if self.phase.is_breathing() {
            SessionState::Paused
        } else {
            SessionState::Idle
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn reps_completed(&self) -> u32 {
        self.reps_completed
    }

    /// Rep currently being breathed, 1-based. Zero when idle.
    pub fn current_rep(&self) -> u32 {
        if self.phase.is_breathing() {
            self.reps_completed + 1
        } else {
            0
        }
    }

    pub fn plan(&self) -> &PhasePlan {
        &self.plan
    }

    /// The timer that should be live, if any. `None` while idle or paused.
    pub fn armed(&self) -> Option<&ArmedPhase> {
        self.armed.as_ref()
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Begin a fresh session. `sessions_today` is checked against the
    /// plan's daily limit before anything starts.
    pub fn start(&mut self, sessions_today: u32) -> Vec<Event> {
        if self.state() != SessionState::Idle {
            return Vec::new();
        }
        if sessions_today >= self.plan.max_sessions_per_day {
            return vec![Event::DailyLimitReached {
                sessions_today,
                limit: self.plan.max_sessions_per_day,
                at: Utc::now(),
            }];
        }
        self.reps_completed = 0;
        self.running = true;
        vec![self.enter_phase(Phase::Inhale)]
    }

    /// Freeze the session. The armed timer is disarmed; its token dies here.
    pub fn pause(&mut self) -> Vec<Event> {
        if !self.running {
            return Vec::new();
        }
        self.running = false;
        self.armed = None;
        vec![Event::SessionPaused {
            phase: self.phase,
            rep: self.current_rep(),
            at: Utc::now(),
        }]
    }

    /// Continue a paused session by re-entering a phase with a fresh token.
    pub fn resume(&mut self) -> Vec<Event> {
        if self.state() != SessionState::Paused {
            return Vec::new();
        }
        self.running = true;
        let target = match self.resume_behavior {
            ResumeBehavior::RestartRep => Phase::Inhale,
            ResumeBehavior::RestartPhase => self.phase,
        };
        vec![
            Event::SessionResumed {
                phase: target,
                at: Utc::now(),
            },
            self.enter_phase(target),
        ]
    }

    /// Abort the session without counting anything. Works from Running and
    /// Paused alike; idle engines ignore it.
    pub fn stop(&mut self) -> Vec<Event> {
        if self.state() == SessionState::Idle {
            return Vec::new();
        }
        self.running = false;
        self.phase = Phase::Idle;
        self.reps_completed = 0;
        self.armed = None;
        vec![Event::SessionStopped { at: Utc::now() }]
    }

    /// Report that the timer for `token` fired. Stale tokens (anything but
    /// the currently armed one) are ignored, so late or duplicate expiry
    /// reports cannot double-advance the cycle.
    pub fn phase_elapsed(&mut self, token: PhaseToken) -> Vec<Event> {
        match self.armed {
            Some(armed) if armed.token == token && self.running => {}
            _ => return Vec::new(),
        }
        match self.phase {
            Phase::Idle => Vec::new(),
            Phase::Inhale => vec![self.enter_phase(Phase::Hold)],
            Phase::Hold => vec![self.enter_phase(Phase::Exhale)],
            Phase::Exhale => {
                self.reps_completed += 1;
                let rep = self.reps_completed;
                let mut events = vec![Event::RepCompleted {
                    rep,
                    at: Utc::now(),
                }];
                if rep < self.plan.reps_per_session {
                    events.push(self.enter_phase(Phase::Inhale));
                } else {
                    self.running = false;
                    self.phase = Phase::Idle;
                    self.reps_completed = 0;
                    self.armed = None;
                    events.push(Event::SessionCompleted {
                        reps: rep,
                        at: Utc::now(),
                    });
                }
                events
            }
        }
    }

    // ── Internal ─────────────────────────────────────────────────────

    /// Switch to `phase`, arm its timer and hand out a fresh token.
    fn enter_phase(&mut self, phase: Phase) -> Event {
        self.phase = phase;
        self.generation += 1;
        let duration_secs = self.plan.duration_secs(phase);
        let at = Utc::now();
        self.armed = Some(ArmedPhase {
            token: PhaseToken(self.generation),
            phase,
            due_at: at + Duration::seconds(duration_secs as i64),
        });
        Event::PhaseChanged {
            phase,
            rep: self.current_rep(),
            duration_secs,
            at,
        }
    }
}
