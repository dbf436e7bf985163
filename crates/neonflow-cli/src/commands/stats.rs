use clap::Subcommand;
use serde_json::json;

use super::{open_engine, print_json};

#[derive(Subcommand)]
pub enum StatsAction {
    /// Focus sessions completed today
    Today,
    /// Focus totals over the last seven days
    Week,
    /// Consecutive days with at least one focus session
    Streak,
    /// Per-day totals for the last seven days
    Daily,
}

pub fn run(action: StatsAction) -> Result<(), Box<dyn std::error::Error>> {
    let engine = open_engine()?;

    match action {
        StatsAction::Today => {
            let sessions = engine.todays_sessions();
            let minutes: f64 = sessions.iter().map(|s| s.minutes()).sum();
            print_json(&json!({
                "count": sessions.len(),
                "minutes": minutes,
                "sessions": sessions,
            }))?;
        }
        StatsAction::Week => print_json(&engine.weekly_stats())?,
        StatsAction::Streak => print_json(&json!({ "days": engine.streak_days() }))?,
        StatsAction::Daily => print_json(&engine.daily_breakdown())?,
    }
    Ok(())
}
