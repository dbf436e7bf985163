//! Local notification scheduling.
//!
//! The engine only asks for a one-shot notification `after_secs` from now and
//! for all pending notifications to be cancelled. Delivery, permissions and
//! sound are the platform's business.

use std::sync::{Arc, Mutex};

use serde::Serialize;

use crate::error::NotifyError;
use crate::timer::SessionKind;

pub const NOTIFICATION_TITLE: &str = "Neon Flow";

/// Scheduler implemented by the platform layer.
///
/// Implementations must not block for long: the background dispatcher runs
/// them on a single worker and inline dispatch runs them on the caller.
pub trait NotificationScheduler: Send + Sync {
    /// Schedule a notification for the end of a `kind` segment.
    fn schedule(&self, after_secs: u64, kind: SessionKind) -> Result<(), NotifyError>;

    /// Cancel everything previously scheduled.
    fn cancel_all(&self) -> Result<(), NotifyError>;
}

/// Content shown when a segment ends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub title: &'static str,
    pub body: &'static str,
}

impl Notification {
    pub fn for_segment(kind: SessionKind) -> Self {
        let body = match kind {
            SessionKind::Focus => "Your focus session is over. Time for a break!",
            SessionKind::LongBreak => "Your focus session is over. Time for a long break!",
            SessionKind::Break => "Time to get back to focus!",
        };
        Self {
            title: NOTIFICATION_TITLE,
            body,
        }
    }
}

/// Scheduler for hosts without notifications.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopNotifier;

impl NotificationScheduler for NoopNotifier {
    fn schedule(&self, _after_secs: u64, _kind: SessionKind) -> Result<(), NotifyError> {
        Ok(())
    }

    fn cancel_all(&self) -> Result<(), NotifyError> {
        Ok(())
    }
}

/// Scheduler that only logs what it would deliver.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl NotificationScheduler for LogNotifier {
    fn schedule(&self, after_secs: u64, kind: SessionKind) -> Result<(), NotifyError> {
        let n = Notification::for_segment(kind);
        tracing::info!(after_secs, %kind, title = n.title, body = n.body, "notification scheduled");
        Ok(())
    }

    fn cancel_all(&self) -> Result<(), NotifyError> {
        tracing::info!("notifications cancelled");
        Ok(())
    }
}

/// Calls seen by a [`RecordingNotifier`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifierCall {
    Schedule { after_secs: u64, kind: SessionKind },
    CancelAll,
}

/// In-memory scheduler that records every call, optionally failing them.
/// Clones share the same log.
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    calls: Arc<Mutex<Vec<NotifierCall>>>,
    fail: bool,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records calls but reports every one of them as failed.
    pub fn failing() -> Self {
        Self {
            calls: Arc::default(),
            fail: true,
        }
    }

    pub fn calls(&self) -> Vec<NotifierCall> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Notifications still pending after replaying cancels.
    pub fn pending(&self) -> Vec<NotifierCall> {
        let mut pending = Vec::new();
        for call in self.calls() {
            match call {
                NotifierCall::CancelAll => pending.clear(),
                schedule => pending.push(schedule),
            }
        }
        pending
    }

    fn push(&self, call: NotifierCall) {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).push(call);
    }
}

impl NotificationScheduler for RecordingNotifier {
    fn schedule(&self, after_secs: u64, kind: SessionKind) -> Result<(), NotifyError> {
        self.push(NotifierCall::Schedule { after_secs, kind });
        if self.fail {
            return Err(NotifyError::ScheduleFailed {
                after_secs,
                message: "scheduler rejected request".into(),
            });
        }
        Ok(())
    }

    fn cancel_all(&self) -> Result<(), NotifyError> {
        self.push(NotifierCall::CancelAll);
        if self.fail {
            return Err(NotifyError::CancelFailed("scheduler rejected request".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_depends_on_ending_segment() {
        assert_eq!(
            Notification::for_segment(SessionKind::Focus).body,
            "Your focus session is over. Time for a break!"
        );
        assert_eq!(
            Notification::for_segment(SessionKind::LongBreak).body,
            "Your focus session is over. Time for a long break!"
        );
        assert_eq!(
            Notification::for_segment(SessionKind::Break).body,
            "Time to get back to focus!"
        );
        assert_eq!(Notification::for_segment(SessionKind::Break).title, "Neon Flow");
    }

    #[test]
    fn pending_replays_cancels() {
        let n = RecordingNotifier::new();
        n.schedule(60, SessionKind::Focus).unwrap();
        n.cancel_all().unwrap();
        n.schedule(30, SessionKind::Break).unwrap();
        assert_eq!(
            n.pending(),
            vec![NotifierCall::Schedule { after_secs: 30, kind: SessionKind::Break }]
        );
        assert_eq!(n.calls().len(), 3);
    }

    #[test]
    fn failing_notifier_still_records() {
        let n = RecordingNotifier::failing();
        assert!(n.schedule(5, SessionKind::Focus).is_err());
        assert!(n.cancel_all().is_err());
        assert_eq!(n.calls().len(), 2);
    }
}
