use clap::Subcommand;

#[derive(Subcommand)]
pub enum ProfileAction {
    /// Print the stored profile as JSON
    Show,
    /// Set the display name
    SetName { name: String },
    /// Wipe the profile and start fresh
    Reset,
}

pub fn run(action: ProfileAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ProfileAction::Show => {
            let ledger = super::open_ledger()?;
            println!("{}", serde_json::to_string_pretty(ledger.profile())?);
        }
        ProfileAction::SetName { name } => {
            let mut ledger = super::open_ledger()?;
            ledger.set_user_name(&name)?;
            println!("ok");
        }
        ProfileAction::Reset => {
            let mut ledger = super::open_ledger()?;
            ledger.reset()?;
            println!("profile reset");
        }
    }
    Ok(())
}
