use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;

/// Ambient audio played during focus segments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Soundscape {
    #[default]
    None,
    Rain,
    Forest,
    Ocean,
    City,
    Whitenoise,
    Gospel,
}

impl Soundscape {
    pub const ALL: [Soundscape; 7] = [
        Soundscape::None,
        Soundscape::Rain,
        Soundscape::Forest,
        Soundscape::Ocean,
        Soundscape::City,
        Soundscape::Whitenoise,
        Soundscape::Gospel,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Soundscape::None => "none",
            Soundscape::Rain => "rain",
            Soundscape::Forest => "forest",
            Soundscape::Ocean => "ocean",
            Soundscape::City => "city",
            Soundscape::Whitenoise => "whitenoise",
            Soundscape::Gospel => "gospel",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Soundscape::None => "None",
            Soundscape::Rain => "Rain",
            Soundscape::Forest => "Forest",
            Soundscape::Ocean => "Ocean",
            Soundscape::City => "City",
            Soundscape::Whitenoise => "White Noise",
            Soundscape::Gospel => "Gospel",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Soundscape::None => "Complete silence for maximum focus",
            Soundscape::Rain => "Gentle rainfall to calm your mind",
            Soundscape::Forest => "Peaceful forest ambience",
            Soundscape::Ocean => "Soothing wind chime sounds",
            Soundscape::City => "Distant city hum for urban focus",
            Soundscape::Whitenoise => "Pure white noise for concentration",
            Soundscape::Gospel => "Uplifting gospel music to inspire focus",
        }
    }

    /// `false` for [`Soundscape::None`]; the audio layer skips playback.
    pub fn is_audible(&self) -> bool {
        !matches!(self, Soundscape::None)
    }
}

impl fmt::Display for Soundscape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Soundscape {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Soundscape::ALL
            .iter()
            .copied()
            .find(|sc| sc.key() == s)
            .ok_or_else(|| ValidationError::UnknownToken {
                field: "soundscape",
                value: s.to_string(),
            })
    }
}
