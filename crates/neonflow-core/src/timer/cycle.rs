use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::ledger::RecordKind;

/// Kind of segment that is counting down or about to start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SessionKind {
    Focus,
    Break,
    LongBreak,
}

impl SessionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionKind::Focus => "focus",
            SessionKind::Break => "break",
            SessionKind::LongBreak => "long-break",
        }
    }

    /// Kind stored in the ledger. Long breaks are recorded as plain breaks.
    pub fn record_kind(&self) -> RecordKind {
        match self {
            SessionKind::Focus => RecordKind::Focus,
            SessionKind::Break | SessionKind::LongBreak => RecordKind::Break,
        }
    }

    pub fn is_focus(&self) -> bool {
        matches!(self, SessionKind::Focus)
    }
}

impl fmt::Display for SessionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SessionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "focus" => Ok(SessionKind::Focus),
            "break" => Ok(SessionKind::Break),
            "long-break" => Ok(SessionKind::LongBreak),
            other => Err(format!("unknown session kind: {other}")),
        }
    }
}

/// Segment that follows `ended`.
///
/// `completed_focus` is the focus count *after* the ended segment has been
/// counted. A threshold of zero behaves like one.
pub fn next_segment(ended: SessionKind, completed_focus: u32, sessions_before_long_break: u32) -> SessionKind {
    match ended {
        SessionKind::Focus => {
            let every = sessions_before_long_break.max(1);
            if completed_focus % every == 0 {
                SessionKind::LongBreak
            } else {
                SessionKind::Break
            }
        }
        SessionKind::Break | SessionKind::LongBreak => SessionKind::Focus,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn breaks_always_return_to_focus() {
        assert_eq!(next_segment(SessionKind::Break, 3, 4), SessionKind::Focus);
        assert_eq!(next_segment(SessionKind::LongBreak, 4, 4), SessionKind::Focus);
    }

    #[test]
    fn every_fourth_focus_earns_long_break() {
        let kinds: Vec<_> = (1..=8)
            .map(|n| next_segment(SessionKind::Focus, n, 4))
            .collect();
        assert_eq!(
            kinds,
            vec![
                SessionKind::Break,
                SessionKind::Break,
                SessionKind::Break,
                SessionKind::LongBreak,
                SessionKind::Break,
                SessionKind::Break,
                SessionKind::Break,
                SessionKind::LongBreak,
            ]
        );
    }

    #[test]
    fn zero_threshold_does_not_divide_by_zero() {
        assert_eq!(next_segment(SessionKind::Focus, 1, 0), SessionKind::LongBreak);
        assert_eq!(next_segment(SessionKind::Focus, 1, 1), SessionKind::LongBreak);
    }

    #[test]
    fn long_break_records_as_break() {
        assert_eq!(SessionKind::LongBreak.record_kind(), RecordKind::Break);
        assert_eq!(SessionKind::Focus.record_kind(), RecordKind::Focus);
    }

    #[test]
    fn kind_parses_and_serializes_kebab_case() {
        assert_eq!("long-break".parse::<SessionKind>().unwrap(), SessionKind::LongBreak);
        assert!("nap".parse::<SessionKind>().is_err());
        assert_eq!(
            serde_json::to_string(&SessionKind::LongBreak).unwrap(),
            "\"long-break\""
        );
    }
}
