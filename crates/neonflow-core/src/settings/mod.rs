//! User-facing timer settings.
//!
//! Settings are a singleton owned by the engine and persisted alongside the
//! session ledger. Every field always carries a value: serde defaults fill in
//! fields missing from older blobs and [`SettingsPatch`] merges onto the
//! current value instead of replacing it.

mod presets;
mod soundscape;

pub use presets::{NeonColor, TimePreset, NEON_COLORS, TIME_PRESETS};
pub use soundscape::Soundscape;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::timer::SessionKind;

/// Timer settings. Durations are in seconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(default = "default_focus_duration")]
    pub focus_duration: u32,
    #[serde(default = "default_break_duration")]
    pub break_duration: u32,
    #[serde(default = "default_long_break_duration")]
    pub long_break_duration: u32,
    #[serde(default = "default_sessions_before_long_break")]
    pub sessions_before_long_break: u32,
    #[serde(default = "default_neon_color")]
    pub neon_color: String,
    #[serde(default)]
    pub soundscape: Soundscape,
    #[serde(default = "default_true")]
    pub notifications_enabled: bool,
}

fn default_focus_duration() -> u32 {
    25 * 60
}
fn default_break_duration() -> u32 {
    5 * 60
}
fn default_long_break_duration() -> u32 {
    15 * 60
}
fn default_sessions_before_long_break() -> u32 {
    4
}
fn default_neon_color() -> String {
    "#00d4ff".into()
}
fn default_true() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            focus_duration: default_focus_duration(),
            break_duration: default_break_duration(),
            long_break_duration: default_long_break_duration(),
            sessions_before_long_break: default_sessions_before_long_break(),
            neon_color: default_neon_color(),
            soundscape: Soundscape::default(),
            notifications_enabled: true,
        }
    }
}

impl Settings {
    /// Configured length of a segment of the given kind.
    pub fn duration_for(&self, kind: SessionKind) -> u32 {
        match kind {
            SessionKind::Focus => self.focus_duration,
            SessionKind::Break => self.break_duration,
            SessionKind::LongBreak => self.long_break_duration,
        }
    }

    /// Shallow merge: fields absent from the patch keep their value.
    pub fn merge(&mut self, patch: &SettingsPatch) {
        if let Some(v) = patch.focus_duration {
            self.focus_duration = v;
        }
        if let Some(v) = patch.break_duration {
            self.break_duration = v;
        }
        if let Some(v) = patch.long_break_duration {
            self.long_break_duration = v;
        }
        if let Some(v) = patch.sessions_before_long_break {
            self.sessions_before_long_break = v;
        }
        if let Some(ref v) = patch.neon_color {
            self.neon_color = v.clone();
        }
        if let Some(v) = patch.soundscape {
            self.soundscape = v;
        }
        if let Some(v) = patch.notifications_enabled {
            self.notifications_enabled = v;
        }
    }

    /// Bounds check for presentation layers. The engine itself accepts any value.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let positive = [
            ("focusDuration", self.focus_duration),
            ("breakDuration", self.break_duration),
            ("longBreakDuration", self.long_break_duration),
            ("sessionsBeforeLongBreak", self.sessions_before_long_break),
        ];
        for (field, value) in positive {
            if value == 0 {
                return Err(ValidationError::NotPositive { field });
            }
        }
        Ok(())
    }
}

/// Partial settings update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SettingsPatch {
    pub focus_duration: Option<u32>,
    pub break_duration: Option<u32>,
    pub long_break_duration: Option<u32>,
    pub sessions_before_long_break: Option<u32>,
    pub neon_color: Option<String>,
    pub soundscape: Option<Soundscape>,
    pub notifications_enabled: Option<bool>,
}

impl SettingsPatch {
    /// New duration this patch sets for segments of `kind`, if any.
    pub fn duration_for(&self, kind: SessionKind) -> Option<u32> {
        match kind {
            SessionKind::Focus => self.focus_duration,
            SessionKind::Break => self.break_duration,
            SessionKind::LongBreak => self.long_break_duration,
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == SettingsPatch::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_classic_pomodoro() {
        let s = Settings::default();
        assert_eq!(s.focus_duration, 1500);
        assert_eq!(s.break_duration, 300);
        assert_eq!(s.long_break_duration, 900);
        assert_eq!(s.sessions_before_long_break, 4);
        assert_eq!(s.soundscape, Soundscape::None);
        assert!(s.notifications_enabled);
    }

    #[test]
    fn merge_keeps_unspecified_fields() {
        let mut s = Settings::default();
        s.merge(&SettingsPatch {
            break_duration: Some(420),
            neon_color: Some("#ff0080".into()),
            ..SettingsPatch::default()
        });
        assert_eq!(s.break_duration, 420);
        assert_eq!(s.neon_color, "#ff0080");
        assert_eq!(s.focus_duration, 1500);
        assert_eq!(s.soundscape, Soundscape::None);
    }

    #[test]
    fn old_blob_without_long_break_fields_gets_defaults() {
        let json = r##"{"focusDuration":900,"breakDuration":180,"neonColor":"#39ff14","soundscape":"rain","notificationsEnabled":false}"##;
        let s: Settings = serde_json::from_str(json).unwrap();
        assert_eq!(s.focus_duration, 900);
        assert_eq!(s.long_break_duration, 900);
        assert_eq!(s.sessions_before_long_break, 4);
        assert_eq!(s.soundscape, Soundscape::Rain);
        assert!(!s.notifications_enabled);
    }

    #[test]
    fn validate_rejects_zero_values() {
        let mut s = Settings::default();
        assert!(s.validate().is_ok());
        s.sessions_before_long_break = 0;
        assert_eq!(
            s.validate(),
            Err(ValidationError::NotPositive { field: "sessionsBeforeLongBreak" })
        );
    }

    #[test]
    fn patch_duration_maps_to_segment_kind() {
        let patch = SettingsPatch {
            long_break_duration: Some(1200),
            ..SettingsPatch::default()
        };
        assert_eq!(patch.duration_for(SessionKind::LongBreak), Some(1200));
        assert_eq!(patch.duration_for(SessionKind::Break), None);
        assert!(!patch.is_empty());
        assert!(SettingsPatch::default().is_empty());
    }
}
