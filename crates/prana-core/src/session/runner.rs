//! Async session driver.
//!
//! Owns a `SessionEngine` and the stats ledger and gives the engine real
//! timers: one sleep per armed phase, raced against a command channel.
//! Each sleep carries the token it was armed with, so an expiry that lost
//! a race against pause/resume/stop is rejected by the engine.
//!
//! Rep and session completions are written to the ledger before their
//! events are forwarded, so a frontend never sees a completion that was
//! not persisted (a failed write is logged and the session continues).

use chrono::Utc;
use tokio::sync::mpsc;
use tokio::time::sleep;

use super::engine::{SessionEngine, SessionState};
use crate::events::Event;
use crate::stats::StatsLedger;
use crate::storage::ProfileStore;

/// Control messages accepted while a session runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionCommand {
    Pause,
    Resume,
    Stop,
}

/// Drives one session from start to its terminal state.
pub struct SessionRunner<S: ProfileStore> {
    engine: SessionEngine,
    ledger: StatsLedger<S>,
}

impl<S: ProfileStore> SessionRunner<S> {
    pub fn new(engine: SessionEngine, ledger: StatsLedger<S>) -> Self {
        Self { engine, ledger }
    }

    /// Run one session to its end and hand the ledger back.
    ///
    /// The session starts immediately, subject to the daily limit. Closing
    /// the command channel does not stop a running session; a session left
    /// paused with no sender able to resume it is stopped and discarded.
    pub async fn run(
        mut self,
        mut commands: mpsc::Receiver<SessionCommand>,
        events: mpsc::Sender<Event>,
    ) -> StatsLedger<S> {
        let sessions_today = self.ledger.sessions_today();
        let opening = self.engine.start(sessions_today);
        let started = opening
            .iter()
            .any(|e| matches!(e, Event::PhaseChanged { .. }));
        self.dispatch(opening, &events).await;
        if !started {
            return self.ledger;
        }

        let mut commands_open = true;
        loop {
            match self.engine.armed().map(|armed| (armed.token, armed.due_at)) {
                Some((token, due_at)) => {
                    let wait = (due_at - Utc::now()).to_std().unwrap_or_default();
                    tokio::select! {
                        _ = sleep(wait) => {
                            let produced = self.engine.phase_elapsed(token);
                            self.dispatch(produced, &events).await;
                        }
                        command = commands.recv(), if commands_open => match command {
                            Some(command) => self.apply(command, &events).await,
                            None => commands_open = false,
                        },
                    }
                }
                None => {
                    // Paused: no timer to wait for, only commands can move us.
                    if !commands_open {
                        let produced = self.engine.stop();
                        self.dispatch(produced, &events).await;
                        break;
                    }
                    match commands.recv().await {
                        Some(command) => self.apply(command, &events).await,
                        None => commands_open = false,
                    }
                }
            }
            if self.engine.state() == SessionState::Idle {
                break;
            }
        }
        self.ledger
    }

    async fn apply(&mut self, command: SessionCommand, events: &mpsc::Sender<Event>) {
        let produced = match command {
            SessionCommand::Pause => self.engine.pause(),
            SessionCommand::Resume => self.engine.resume(),
            SessionCommand::Stop => self.engine.stop(),
        };
        self.dispatch(produced, events).await;
    }

    /// Persist what needs persisting, then forward the events in order.
    async fn dispatch(&mut self, produced: Vec<Event>, events: &mpsc::Sender<Event>) {
        for event in produced {
            let mut follow_ups = Vec::new();
            match &event {
                Event::RepCompleted { .. } => {
                    if let Err(e) = self.ledger.on_rep_completed() {
                        eprintln!("Warning: failed to persist rep count: {e}");
                    }
                }
                Event::SessionCompleted { reps, .. } => {
                    match self.ledger.on_session_completed(*reps) {
                        Ok(badges) => follow_ups = badges,
                        Err(e) => eprintln!("Warning: failed to persist session stats: {e}"),
                    }
                }
                _ => {}
            }
            // A dropped receiver must not abort the session; stats still land.
            let _ = events.send(event).await;
            for follow_up in follow_ups {
                let _ = events.send(follow_up).await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::phase::PhasePlan;
    use crate::storage::MemoryStore;

    fn runner(reps: u32) -> SessionRunner<MemoryStore> {
        let plan = PhasePlan::new(1, 1, 1, reps, 3).unwrap();
        SessionRunner::new(
            SessionEngine::new(plan),
            StatsLedger::open(MemoryStore::default()),
        )
    }

    async fn drain(mut events: mpsc::Receiver<Event>) -> Vec<Event> {
        let mut seen = Vec::new();
        while let Some(event) = events.recv().await {
            seen.push(event);
        }
        seen
    }

    #[tokio::test(start_paused = true)]
    async fn runs_a_whole_session_and_persists_stats() {
        let (_command_tx, command_rx) = mpsc::channel(4);
        let (event_tx, event_rx) = mpsc::channel(64);

        let handle = tokio::spawn(runner(2).run(command_rx, event_tx));
        let seen = drain(event_rx).await;
        let ledger = handle.await.expect("runner task should not panic");

        let reps: Vec<u32> = seen
            .iter()
            .filter_map(|e| match e {
                Event::RepCompleted { rep, .. } => Some(*rep),
                _ => None,
            })
            .collect();
        assert_eq!(reps, vec![1, 2]);
        assert!(seen
            .iter()
            .any(|e| matches!(e, Event::SessionCompleted { reps: 2, .. })));

        let stats = &ledger.profile().stats;
        assert_eq!(stats.total_reps, 2);
        assert_eq!(stats.points, 10);
        assert_eq!(ledger.sessions_today(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn pause_and_resume_mid_session() {
        let (command_tx, command_rx) = mpsc::channel(4);
        let (event_tx, event_rx) = mpsc::channel(64);
        command_tx.send(SessionCommand::Pause).await.unwrap();
        command_tx.send(SessionCommand::Resume).await.unwrap();
        drop(command_tx);

        let handle = tokio::spawn(runner(1).run(command_rx, event_tx));
        let seen = drain(event_rx).await;
        let ledger = handle.await.expect("runner task should not panic");

        assert!(seen.iter().any(|e| matches!(e, Event::SessionPaused { .. })));
        assert!(seen
            .iter()
            .any(|e| matches!(e, Event::SessionResumed { .. })));
        assert!(seen
            .iter()
            .any(|e| matches!(e, Event::SessionCompleted { reps: 1, .. })));
        assert_eq!(ledger.profile().stats.total_reps, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn session_left_paused_is_discarded() {
        let (command_tx, command_rx) = mpsc::channel(4);
        let (event_tx, event_rx) = mpsc::channel(64);
        command_tx.send(SessionCommand::Pause).await.unwrap();
        drop(command_tx);

        let handle = tokio::spawn(runner(2).run(command_rx, event_tx));
        let seen = drain(event_rx).await;
        let ledger = handle.await.expect("runner task should not panic");

        assert!(seen
            .iter()
            .any(|e| matches!(e, Event::SessionStopped { .. })));
        assert!(!seen
            .iter()
            .any(|e| matches!(e, Event::SessionCompleted { .. })));
        assert_eq!(ledger.profile().stats.total_reps, 0);
        assert_eq!(ledger.sessions_today(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn stop_command_ends_the_session_without_credit() {
        let (command_tx, command_rx) = mpsc::channel(4);
        let (event_tx, event_rx) = mpsc::channel(64);
        command_tx.send(SessionCommand::Stop).await.unwrap();
        drop(command_tx);

        let handle = tokio::spawn(runner(2).run(command_rx, event_tx));
        let seen = drain(event_rx).await;
        let ledger = handle.await.expect("runner task should not panic");

        assert!(seen
            .iter()
            .any(|e| matches!(e, Event::SessionStopped { .. })));
        assert_eq!(ledger.sessions_today(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn daily_limit_refuses_a_fourth_session() {
        let mut ledger = StatsLedger::open(MemoryStore::default());
        for _ in 0..3 {
            ledger.on_session_completed(15).unwrap();
        }
        let plan = PhasePlan::new(1, 1, 1, 2, 3).unwrap();
        let runner = SessionRunner::new(SessionEngine::new(plan), ledger);

        let (_command_tx, command_rx) = mpsc::channel(4);
        let (event_tx, event_rx) = mpsc::channel(64);
        let handle = tokio::spawn(runner.run(command_rx, event_tx));
        let seen = drain(event_rx).await;
        let ledger = handle.await.expect("runner task should not panic");

        assert!(matches!(
            seen.as_slice(),
            [Event::DailyLimitReached {
                sessions_today: 3,
                limit: 3,
                ..
            }]
        ));
        assert_eq!(ledger.sessions_today(), 3);
    }
}
