//! Reminder times and the foreground notification watcher.

use chrono::Local;
use clap::Subcommand;
use notify_rust::Notification;

use prana_core::reminders::{Reminder, ReminderSchedule};

#[derive(Subcommand)]
pub enum RemindersAction {
    /// List scheduled reminder times
    List,
    /// Add a reminder time (HH:MM, 24-hour)
    Add { time: String },
    /// Remove a reminder time
    Remove { time: String },
    /// Show the next pending reminder
    Next,
    /// Run in the foreground and fire desktop notifications
    Watch,
}

pub fn run(action: RemindersAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        RemindersAction::List => {
            let ledger = super::open_ledger()?;
            let times = &ledger.profile().notification_times;
            if times.is_empty() {
                println!("no reminders scheduled");
            }
            for time in times {
                println!("{time}");
            }
        }
        RemindersAction::Add { time } => {
            let mut ledger = super::open_ledger()?;
            if ledger.add_reminder(&time)? {
                println!("ok");
            } else {
                println!("already scheduled");
            }
        }
        RemindersAction::Remove { time } => {
            let mut ledger = super::open_ledger()?;
            if ledger.remove_reminder(&time)? {
                println!("ok");
            } else {
                eprintln!("not scheduled: {time}");
                std::process::exit(1);
            }
        }
        RemindersAction::Next => {
            let ledger = super::open_ledger()?;
            let schedule = ReminderSchedule::from_entries(&ledger.profile().notification_times);
            match schedule.next_after(Local::now()) {
                Some(reminder) => {
                    println!("{}", reminder.due_at.format("%Y-%m-%d %H:%M"))
                }
                None => println!("no reminders scheduled"),
            }
        }
        RemindersAction::Watch => {
            let runtime = tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .build()?;
            runtime.block_on(watch())?;
        }
    }
    Ok(())
}

/// Sleep until the nearest reminder, fire it, re-arm. The profile is
/// re-read each round, so edits made while waiting take effect and each
/// fired entry comes back for the following day.
async fn watch() -> Result<(), Box<dyn std::error::Error>> {
    loop {
        let ledger = super::open_ledger()?;
        let schedule = ReminderSchedule::from_entries(&ledger.profile().notification_times);
        let Some(reminder) = schedule.next_after(Local::now()) else {
            println!("No reminders scheduled; nothing to watch.");
            return Ok(());
        };
        println!(
            "Next reminder at {}.",
            reminder.due_at.format("%Y-%m-%d %H:%M")
        );
        let wait = (reminder.due_at - Local::now()).to_std().unwrap_or_default();
        tokio::time::sleep(wait).await;
        notify(&reminder);
    }
}

fn notify(reminder: &Reminder) {
    let body = format!(
        "Time to breathe. Your {} session is waiting.",
        reminder.time.format("%H:%M")
    );
    if let Err(e) = Notification::new().summary("Prana").body(&body).show() {
        eprintln!("Warning: could not send notification: {e}");
    }
}
