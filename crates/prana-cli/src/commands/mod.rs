pub mod config;
pub mod profile;
pub mod reminders;
pub mod session;
pub mod stats;
pub mod verse;

use prana_core::{JsonFileStore, StatsLedger};

/// Open the ledger over the default on-disk profile.
pub(crate) fn open_ledger() -> Result<StatsLedger<JsonFileStore>, Box<dyn std::error::Error>> {
    let store = JsonFileStore::open_default()?;
    Ok(StatsLedger::open(store))
}
