use clap::Subcommand;
use prana_core::content;

#[derive(Subcommand)]
pub enum VerseAction {
    /// Print a verse from the pool
    Show {
        /// Emit JSON (text and audio asset) instead of plain text
        #[arg(long)]
        json: bool,
    },
}

pub fn run(action: VerseAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        VerseAction::Show { json } => {
            let verse = content::pick();
            if json {
                println!("{}", serde_json::to_string_pretty(&verse)?);
            } else {
                println!("{}", verse.text);
            }
        }
    }
    Ok(())
}
