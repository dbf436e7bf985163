//! Session history ledger.
//!
//! Newest entries sit at the front. Entries are only ever added by the engine
//! when a segment completes; the one mutable field is the journal text.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Kind stored for a completed segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    Focus,
    Break,
}

/// A completed segment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: String,
    /// Configured duration of the segment, in seconds.
    pub duration: u32,
    pub completed_at: DateTime<Utc>,
    #[serde(rename = "type", alias = "kind")]
    pub kind: RecordKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub journal_entry: Option<String>,
}

impl Session {
    pub fn is_focus(&self) -> bool {
        self.kind == RecordKind::Focus
    }

    pub fn minutes(&self) -> f64 {
        f64::from(self.duration) / 60.0
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ledger {
    sessions: VecDeque<Session>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from entries already in newest-first order.
    pub fn from_newest_first(sessions: Vec<Session>) -> Self {
        Self {
            sessions: sessions.into(),
        }
    }

    pub fn record(&mut self, session: Session) {
        self.sessions.push_front(session);
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Newest first.
    pub fn iter(&self) -> impl Iterator<Item = &Session> {
        self.sessions.iter()
    }

    pub fn latest(&self) -> Option<&Session> {
        self.sessions.front()
    }

    pub fn get(&self, id: &str) -> Option<&Session> {
        self.sessions.iter().find(|s| s.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Attach or replace the journal text of `id`. Returns `false` for unknown ids.
    pub fn set_journal(&mut self, id: &str, text: String) -> bool {
        match self.sessions.iter_mut().find(|s| s.id == id) {
            Some(session) => {
                session.journal_entry = Some(text);
                true
            }
            None => false,
        }
    }

    pub fn focus_sessions(&self) -> impl Iterator<Item = &Session> {
        self.sessions.iter().filter(|s| s.is_focus())
    }

    pub fn to_vec(&self) -> Vec<Session> {
        self.sessions.iter().cloned().collect()
    }
}
