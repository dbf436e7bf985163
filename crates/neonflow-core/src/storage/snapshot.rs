//! Persisted engine blob.
//!
//! Layout (JSON, camelCase):
//!
//! ```text
//! {"state": {"settings": {...}, "sessions": [...], "sessionCount": 3}, "version": 0}
//! ```
//!
//! Decoding never fails. Each part falls back on its own so a bad soundscape
//! token does not cost the user their history, and a single corrupt session
//! entry is dropped instead of the whole ledger.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::ledger::Session;
use crate::settings::{Settings, Soundscape};

pub const DEFAULT_STATE_KEY: &str = "neon-flow-storage";
pub const STATE_VERSION: u32 = 0;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedState {
    pub settings: Settings,
    /// Newest first.
    pub sessions: Vec<Session>,
    pub session_count: u32,
}

#[derive(Serialize)]
struct Envelope<'a> {
    state: &'a PersistedState,
    version: u32,
}

impl PersistedState {
    pub fn encode(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&Envelope {
            state: self,
            version: STATE_VERSION,
        })
    }

    /// Decode a stored blob, falling back to defaults for anything unreadable.
    pub fn decode(raw: &str) -> Self {
        let value: Value = match serde_json::from_str(raw) {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!(error = %e, "persisted state is not valid JSON, using defaults");
                return Self::default();
            }
        };

        let state = match value {
            Value::Object(mut obj) if obj.get("state").is_some_and(Value::is_object) => {
                obj.remove("state").unwrap_or_default()
            }
            other => other,
        };

        let Value::Object(mut obj) = state else {
            tracing::warn!("persisted state is not an object, using defaults");
            return Self::default();
        };

        let settings = obj.remove("settings").map(decode_settings).unwrap_or_default();
        let sessions = obj.remove("sessions").map(decode_sessions).unwrap_or_default();
        let session_count = match obj.remove("sessionCount").as_ref().and_then(Value::as_u64) {
            Some(n) => u32::try_from(n).unwrap_or(u32::MAX),
            // Blobs written before the counter existed: derive it from history.
            None => sessions.iter().filter(|s| s.is_focus()).count() as u32,
        };

        Self {
            settings,
            sessions,
            session_count,
        }
    }
}

fn decode_settings(mut value: Value) -> Settings {
    if let Some(obj) = value.as_object_mut() {
        let unknown = obj
            .get("soundscape")
            .and_then(Value::as_str)
            .filter(|token| token.parse::<Soundscape>().is_err())
            .map(str::to_string);
        if let Some(token) = unknown {
            tracing::warn!(soundscape = %token, "unknown soundscape in persisted settings, using none");
            obj.insert("soundscape".into(), Value::String(Soundscape::None.key().into()));
        }
    }

    serde_json::from_value(value).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "persisted settings are malformed, using defaults");
        Settings::default()
    })
}

fn decode_sessions(value: Value) -> Vec<Session> {
    let Value::Array(items) = value else {
        tracing::warn!("persisted sessions are not a list, starting with an empty ledger");
        return Vec::new();
    };

    items
        .into_iter()
        .enumerate()
        .filter_map(|(index, item)| match serde_json::from_value::<Session>(item) {
            Ok(session) => Some(session),
            Err(e) => {
                tracing::warn!(index, error = %e, "skipping malformed persisted session");
                None
            }
        })
        .collect()
}
