use clap::Subcommand;
use neonflow_core::settings::{NEON_COLORS, TIME_PRESETS};
use neonflow_core::{SettingsPatch, Soundscape, TimePreset};
use serde_json::json;

use super::{open_engine, print_json};

#[derive(Subcommand)]
pub enum SettingsAction {
    /// Print current settings as JSON
    Show,
    /// Change one or more settings
    Set {
        /// Focus length in seconds
        #[arg(long)]
        focus: Option<u32>,
        /// Short break length in seconds
        #[arg(long = "break")]
        break_: Option<u32>,
        /// Long break length in seconds
        #[arg(long)]
        long_break: Option<u32>,
        /// Focus sessions per long break
        #[arg(long)]
        sessions_before_long_break: Option<u32>,
        /// Accent color, e.g. "#39ff14"
        #[arg(long)]
        color: Option<String>,
        /// Ambient soundscape key
        #[arg(long)]
        soundscape: Option<Soundscape>,
        /// Enable or disable segment-end notifications
        #[arg(long)]
        notifications: Option<bool>,
    },
    /// List duration presets and accent colors
    Presets,
    /// Apply a duration preset ("25" or "25 min")
    Preset {
        name: String,
    },
    /// List available soundscapes
    Soundscapes,
}

pub fn run(action: SettingsAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        SettingsAction::Show => {
            let engine = open_engine()?;
            print_json(engine.settings())?;
        }
        SettingsAction::Set {
            focus,
            break_,
            long_break,
            sessions_before_long_break,
            color,
            soundscape,
            notifications,
        } => {
            let patch = SettingsPatch {
                focus_duration: focus,
                break_duration: break_,
                long_break_duration: long_break,
                sessions_before_long_break,
                neon_color: color,
                soundscape,
                notifications_enabled: notifications,
            };
            if patch.is_empty() {
                return Err("nothing to change; pass at least one option".into());
            }

            let mut engine = open_engine()?;
            let mut candidate = engine.settings().clone();
            candidate.merge(&patch);
            candidate.validate()?;

            if let Some(event) = engine.update_settings(patch) {
                print_json(&event)?;
            }
        }
        SettingsAction::Presets => {
            print_json(&json!({
                "presets": TIME_PRESETS,
                "colors": NEON_COLORS,
            }))?;
        }
        SettingsAction::Preset { name } => {
            let preset = TimePreset::find(&name).ok_or_else(|| format!("unknown preset: {name}"))?;
            let mut engine = open_engine()?;
            if let Some(event) = engine.update_settings(preset.patch()) {
                print_json(&event)?;
            }
        }
        SettingsAction::Soundscapes => {
            let list: Vec<_> = Soundscape::ALL
                .iter()
                .map(|s| {
                    json!({
                        "key": s.key(),
                        "name": s.display_name(),
                        "description": s.description(),
                    })
                })
                .collect();
            print_json(&list)?;
        }
    }
    Ok(())
}
