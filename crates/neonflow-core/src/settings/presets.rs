//! Display palettes and quick duration presets offered by the settings screen.

use serde::Serialize;

use super::SettingsPatch;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NeonColor {
    pub name: &'static str,
    pub value: &'static str,
}

pub const NEON_COLORS: [NeonColor; 6] = [
    NeonColor { name: "Electric Blue", value: "#00d4ff" },
    NeonColor { name: "Neon Green", value: "#39ff14" },
    NeonColor { name: "Hot Pink", value: "#ff0080" },
    NeonColor { name: "Purple", value: "#bf00ff" },
    NeonColor { name: "Orange", value: "#ff6600" },
    NeonColor { name: "Cyan", value: "#00ffff" },
];

/// Focus/break pair, both in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimePreset {
    pub name: &'static str,
    pub focus: u32,
    #[serde(rename = "break")]
    pub break_: u32,
}

pub const TIME_PRESETS: [TimePreset; 4] = [
    TimePreset { name: "15 min", focus: 15 * 60, break_: 3 * 60 },
    TimePreset { name: "25 min", focus: 25 * 60, break_: 5 * 60 },
    TimePreset { name: "45 min", focus: 45 * 60, break_: 10 * 60 },
    TimePreset { name: "60 min", focus: 60 * 60, break_: 15 * 60 },
];

impl TimePreset {
    /// Look up a preset by name. Accepts "25 min" as well as "25".
    pub fn find(name: &str) -> Option<&'static TimePreset> {
        let wanted = name.trim();
        TIME_PRESETS
            .iter()
            .find(|p| p.name == wanted || p.name.trim_end_matches(" min") == wanted)
    }

    pub fn patch(&self) -> SettingsPatch {
        SettingsPatch {
            focus_duration: Some(self.focus),
            break_duration: Some(self.break_),
            ..SettingsPatch::default()
        }
    }
}
