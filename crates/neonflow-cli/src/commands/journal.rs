use clap::Subcommand;
use neonflow_core::ValidationError;

use super::{open_engine, print_json};

#[derive(Subcommand)]
pub enum JournalAction {
    /// Recent focus sessions that can be journaled
    List {
        #[arg(long, default_value = "10")]
        limit: usize,
    },
    /// Attach a note to a session, replacing any existing one
    Add {
        session_id: String,
        text: String,
    },
    /// Sessions that already carry a note
    Entries,
}

pub fn run(action: JournalAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut engine = open_engine()?;

    match action {
        JournalAction::List { limit } => {
            print_json(&engine.recent_focus_sessions(limit))?;
        }
        JournalAction::Add { session_id, text } => {
            let text = text.trim();
            if text.is_empty() {
                return Err(ValidationError::Empty { field: "text" }.into());
            }
            match engine.add_journal_entry(&session_id, text) {
                Some(event) => print_json(&event)?,
                None => return Err(format!("session not found: {session_id}").into()),
            }
        }
        JournalAction::Entries => {
            print_json(&engine.journaled_sessions())?;
        }
    }
    Ok(())
}
