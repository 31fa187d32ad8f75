use clap::Subcommand;
use prana_core::{Badge, Config};

#[derive(Subcommand)]
pub enum StatsAction {
    /// Today's sessions and motivational state
    Today,
    /// The full stats record
    All,
    /// Badge progress
    Badges,
}

pub fn run(action: StatsAction) -> Result<(), Box<dyn std::error::Error>> {
    let ledger = super::open_ledger()?;

    match action {
        StatsAction::Today => {
            let goal = Config::load_or_default().session.max_sessions_per_day;
            let tier = ledger.motivation(goal);
            let summary = serde_json::json!({
                "sessions": ledger.sessions_today(),
                "limit": goal,
                "motivation": tier,
                "message": tier.message(),
            });
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        StatsAction::All => {
            println!(
                "{}",
                serde_json::to_string_pretty(&ledger.profile().stats)?
            );
        }
        StatsAction::Badges => {
            let held = &ledger.profile().stats.badges;
            let listing: Vec<_> = Badge::ALL
                .iter()
                .map(|badge| {
                    serde_json::json!({
                        "id": badge.id(),
                        "title": badge.title(),
                        "description": badge.describe(),
                        "earned": held.iter().any(|h| h == badge.id()),
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&listing)?);
        }
    }
    Ok(())
}
