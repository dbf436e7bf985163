use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::settings::Settings;
use crate::timer::SessionKind;

/// Every engine command that changes state produces an Event.
/// Presentation layers render them; the CLI prints them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    TimerStarted {
        session: SessionKind,
        time_left: u32,
        at: DateTime<Utc>,
    },
    TimerPaused {
        time_left: u32,
        at: DateTime<Utc>,
    },
    TimerResumed {
        time_left: u32,
        at: DateTime<Utc>,
    },
    TimerReset {
        session: SessionKind,
        time_left: u32,
        at: DateTime<Utc>,
    },
    /// A segment ended and was written to the ledger.
    SessionCompleted {
        session_id: String,
        ended: SessionKind,
        next: SessionKind,
        session_count: u32,
        time_left: u32,
        at: DateTime<Utc>,
    },
    SettingsUpdated {
        settings: Settings,
        time_left: u32,
        at: DateTime<Utc>,
    },
    JournalUpdated {
        session_id: String,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        is_active: bool,
        is_paused: bool,
        session: SessionKind,
        time_left: u32,
        total: u32,
        /// 0.0 .. 1.0 progress within the current segment.
        progress: f64,
        /// `MM:SS`
        display: String,
        session_count: u32,
        at: DateTime<Utc>,
    },
}
