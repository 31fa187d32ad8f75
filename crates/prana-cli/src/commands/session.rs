//! The live guided session.
//!
//! Drives a `SessionRunner` in the foreground: one line per event, audio
//! cues on inhale/exhale entry, and `p`/`r`/`q` + Enter on stdin to
//! pause, resume or stop. Closing stdin leaves the session running to
//! completion.

use std::io::{BufRead, Write};

use clap::Subcommand;
use tokio::sync::mpsc;

use prana_core::storage::SoundConfig;
use prana_core::{
    content, Config, Event, Phase, PhasePlan, SessionCommand, SessionEngine, SessionRunner,
};

#[derive(Subcommand)]
pub enum SessionAction {
    /// Run one guided breathing session in the terminal
    Run {
        /// Reps in this session (defaults to the configured plan)
        #[arg(long)]
        reps: Option<u32>,
        /// Inhale duration in seconds
        #[arg(long)]
        inhale: Option<u64>,
        /// Hold duration in seconds
        #[arg(long)]
        hold: Option<u64>,
        /// Exhale duration in seconds
        #[arg(long)]
        exhale: Option<u64>,
        /// Skip audio cues for this session
        #[arg(long)]
        no_sound: bool,
    },
}

pub fn run(action: SessionAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        SessionAction::Run {
            reps,
            inhale,
            hold,
            exhale,
            no_sound,
        } => run_session(reps, inhale, hold, exhale, no_sound),
    }
}

fn run_session(
    reps: Option<u32>,
    inhale: Option<u64>,
    hold: Option<u64>,
    exhale: Option<u64>,
    no_sound: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let base = config.plan();
    let plan = PhasePlan::new(
        inhale.unwrap_or(base.inhale_secs),
        hold.unwrap_or(base.hold_secs),
        exhale.unwrap_or(base.exhale_secs),
        reps.unwrap_or(base.reps_per_session),
        base.max_sessions_per_day,
    )?;

    if config.ui.show_verse {
        println!("\"{}\"", content::pick().text);
        println!();
    }
    println!(
        "{} reps of {}-{}-{} breathing. p = pause, r = resume, q = stop.",
        plan.reps_per_session, plan.inhale_secs, plan.hold_secs, plan.exhale_secs
    );

    let engine = SessionEngine::with_resume_behavior(plan, config.session.resume_behavior);
    let ledger = super::open_ledger()?.with_daily_cap(plan.max_sessions_per_day);
    let runner = SessionRunner::new(engine, ledger);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    runtime.block_on(drive(runner, plan, no_sound))
}

async fn drive(
    runner: SessionRunner<prana_core::JsonFileStore>,
    plan: PhasePlan,
    no_sound: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let (command_tx, command_rx) = mpsc::channel(8);
    let (event_tx, mut event_rx) = mpsc::channel(64);

    std::thread::spawn(move || read_commands(command_tx));
    let handle = tokio::spawn(runner.run(command_rx, event_tx));

    let mut completed = false;
    while let Some(event) = event_rx.recv().await {
        render(&event, plan.reps_per_session);
        if let Event::PhaseChanged { phase, .. } = &event {
            if matches!(phase, Phase::Inhale | Phase::Exhale) && !no_sound {
                // The sound flag is re-read on every phase entry, so
                // toggling it mid-session takes effect immediately.
                let sound = Config::load_or_default().sound;
                if sound.enabled {
                    play_cue(&sound);
                }
            }
        }
        if matches!(event, Event::SessionCompleted { .. }) {
            completed = true;
        }
    }

    let ledger = handle.await?;
    if completed {
        println!("Points: {}", ledger.profile().stats.points);
        println!("{}", ledger.motivation(plan.max_sessions_per_day).message());
    }
    Ok(())
}

fn render(event: &Event, total_reps: u32) {
    match event {
        Event::PhaseChanged {
            phase,
            rep,
            duration_secs,
            ..
        } => println!("[rep {rep}/{total_reps}] {} for {duration_secs}s", phase.label()),
        Event::RepCompleted { rep, .. } => println!("[rep {rep}/{total_reps}] done"),
        Event::SessionCompleted { reps, .. } => println!("Session complete: {reps} reps."),
        Event::SessionPaused { phase, .. } => {
            println!("Paused during {} (r to resume, q to stop).", phase.label())
        }
        Event::SessionResumed { phase, .. } => println!("Resumed at {}.", phase.label()),
        Event::SessionStopped { .. } => println!("Session stopped."),
        Event::DailyLimitReached {
            sessions_today,
            limit,
            ..
        } => println!("Daily limit reached: {sessions_today}/{limit} sessions today."),
        Event::BadgeAwarded { badge, .. } => {
            println!("Badge earned: {} ({})", badge.title(), badge.describe())
        }
    }
}

fn read_commands(tx: mpsc::Sender<SessionCommand>) {
    let stdin = std::io::stdin();
    for line in stdin.lock().lines() {
        let Ok(line) = line else { break };
        let command = match line.trim() {
            "p" | "pause" => SessionCommand::Pause,
            "r" | "resume" => SessionCommand::Resume,
            "q" | "quit" | "stop" => SessionCommand::Stop,
            "" => continue,
            other => {
                eprintln!("unknown command: {other} (p / r / q)");
                continue;
            }
        };
        if tx.blocking_send(command).is_err() {
            break;
        }
    }
}

/// Play the phase-entry cue. Failures never interrupt the session.
fn play_cue(sound: &SoundConfig) {
    if let Some(command) = &sound.cue_command {
        let spawned = std::process::Command::new("sh")
            .arg("-c")
            .arg(command)
            .stdout(std::process::Stdio::null())
            .stderr(std::process::Stdio::null())
            .spawn();
        if let Err(e) = spawned {
            eprintln!("Warning: audio cue failed: {e}");
        }
        return;
    }
    // Terminal bell as the built-in cue.
    print!("\u{7}");
    let _ = std::io::stdout().flush();
}
