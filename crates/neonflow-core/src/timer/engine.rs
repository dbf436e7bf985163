//! Focus engine implementation.
//!
//! The engine owns the timer, the settings and the session ledger. It does not
//! use internal threads - an external driver (see [`super::Ticker`]) calls
//! `tick()` once per second while the timer runs.
//!
//! ## Segment cycle
//!
//! ```text
//! focus -> break -> focus -> break -> ... -> focus -> long-break -> focus
//! ```
//!
//! Every `sessions_before_long_break`-th completed focus segment is followed by
//! a long break. A new segment never starts on its own.
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = FocusEngine::restore(effects, EngineOptions::default());
//! engine.start_timer();
//! // Once per second:
//! engine.tick(); // Returns Some(Event::SessionCompleted) when the segment ends
//! ```

use std::sync::Arc;

use chrono::{DateTime, Local, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::cycle::{next_segment, SessionKind};
use crate::clock::{Clock, SystemClock};
use crate::effects::{Effect, EffectDispatcher};
use crate::events::Event;
use crate::ledger::{Ledger, Session};
use crate::settings::{Settings, SettingsPatch};
use crate::stats::{self, DayStats, WeeklyStats};
use crate::storage::snapshot::{PersistedState, DEFAULT_STATE_KEY};

/// Timer and cycle position. Not persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerState {
    pub is_active: bool,
    /// Only meaningful while `is_active`.
    pub is_paused: bool,
    /// Seconds remaining in the current segment.
    pub time_left: u32,
    pub current_session: SessionKind,
}

impl TimerState {
    fn idle(kind: SessionKind, settings: &Settings) -> Self {
        Self {
            is_active: false,
            is_paused: false,
            time_left: settings.duration_for(kind),
            current_session: kind,
        }
    }

    /// `true` when `tick()` will count down.
    pub fn is_running(&self) -> bool {
        self.is_active && !self.is_paused
    }
}

/// Construction options for [`FocusEngine`].
pub struct EngineOptions {
    /// Key of the persisted blob in the durable store.
    pub state_key: String,
    /// Settings used when nothing usable has been persisted.
    pub defaults: Settings,
    pub clock: Arc<dyn Clock>,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            state_key: DEFAULT_STATE_KEY.to_string(),
            defaults: Settings::default(),
            clock: Arc::new(SystemClock),
        }
    }
}

/// Core focus timer engine.
///
/// Single owner, single writer. Commands mutate synchronously and return the
/// resulting [`Event`]; persistence and notifications go through the
/// [`EffectDispatcher`] and can never fail a command.
pub struct FocusEngine {
    settings: Settings,
    ledger: Ledger,
    timer: TimerState,
    /// Completed focus segments since first use.
    session_count: u32,
    effects: EffectDispatcher,
    clock: Arc<dyn Clock>,
    state_key: String,
}

impl FocusEngine {
    /// Fresh engine with default settings and an empty ledger. Reads nothing.
    pub fn new(effects: EffectDispatcher) -> Self {
        Self::from_state(effects, EngineOptions::default(), None)
    }

    /// Fresh engine with the given options. Reads nothing.
    pub fn with_options(effects: EffectDispatcher, options: EngineOptions) -> Self {
        Self::from_state(effects, options, None)
    }

    /// Rehydrate from the durable store behind `effects`.
    ///
    /// A missing, unreadable or malformed blob yields `options.defaults` and an
    /// empty ledger; startup never fails.
    pub fn restore(effects: EffectDispatcher, options: EngineOptions) -> Self {
        let persisted = match effects.store().get(&options.state_key) {
            Ok(Some(raw)) => Some(PersistedState::decode(&raw)),
            Ok(None) => None,
            Err(e) => {
                tracing::warn!(key = %options.state_key, error = %e, "failed to read persisted state, starting fresh");
                None
            }
        };
        if let Some(ref state) = persisted {
            tracing::info!(
                sessions = state.sessions.len(),
                session_count = state.session_count,
                "restored persisted state"
            );
        }
        Self::from_state(effects, options, persisted)
    }

    fn from_state(
        effects: EffectDispatcher,
        options: EngineOptions,
        persisted: Option<PersistedState>,
    ) -> Self {
        let PersistedState {
            settings,
            sessions,
            session_count,
        } = persisted.unwrap_or_else(|| PersistedState {
            settings: options.defaults,
            ..PersistedState::default()
        });

        Self {
            timer: TimerState::idle(SessionKind::Focus, &settings),
            settings,
            ledger: Ledger::from_newest_first(sessions),
            session_count,
            effects,
            clock: options.clock,
            state_key: options.state_key,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn timer(&self) -> TimerState {
        self.timer
    }

    pub fn is_active(&self) -> bool {
        self.timer.is_active
    }

    pub fn is_paused(&self) -> bool {
        self.timer.is_paused
    }

    pub fn time_left(&self) -> u32 {
        self.timer.time_left
    }

    pub fn current_session(&self) -> SessionKind {
        self.timer.current_session
    }

    pub fn session_count(&self) -> u32 {
        self.session_count
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn effects(&self) -> &EffectDispatcher {
        &self.effects
    }

    /// Configured length of the current segment.
    pub fn total(&self) -> u32 {
        self.settings.duration_for(self.timer.current_session)
    }

    /// 0.0 .. 1.0 progress within the current segment.
    pub fn progress(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        let elapsed = f64::from(total) - f64::from(self.timer.time_left);
        (elapsed / f64::from(total)).clamp(0.0, 1.0)
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self) -> Event {
        Event::StateSnapshot {
            is_active: self.timer.is_active,
            is_paused: self.timer.is_paused,
            session: self.timer.current_session,
            time_left: self.timer.time_left,
            total: self.total(),
            progress: self.progress(),
            display: format_clock(self.timer.time_left),
            session_count: self.session_count,
            at: self.clock.now(),
        }
    }

    /// Focus sessions completed on the current local calendar day.
    pub fn todays_sessions(&self) -> Vec<&Session> {
        self.todays_sessions_at(&self.local_now())
    }

    pub fn todays_sessions_at<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> Vec<&Session> {
        stats::todays_sessions(&self.ledger, now)
    }

    /// Focus totals over the rolling last seven days.
    pub fn weekly_stats(&self) -> WeeklyStats {
        stats::weekly_stats(&self.ledger, &self.clock.now())
    }

    pub fn streak_days(&self) -> u32 {
        stats::streak_days(&self.ledger, &self.local_now())
    }

    pub fn daily_breakdown(&self) -> Vec<DayStats> {
        stats::daily_breakdown(&self.ledger, &self.local_now())
    }

    /// Newest focus sessions, for picking one to journal about.
    pub fn recent_focus_sessions(&self, limit: usize) -> Vec<&Session> {
        self.ledger.focus_sessions().take(limit).collect()
    }

    /// Sessions carrying a journal entry, newest first.
    pub fn journaled_sessions(&self) -> Vec<&Session> {
        self.ledger
            .iter()
            .filter(|s| s.journal_entry.is_some())
            .collect()
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn start_timer(&mut self) -> Option<Event> {
        if self.timer.time_left == 0 {
            self.timer.time_left = self.total();
        }
        self.timer.is_active = true;
        self.timer.is_paused = false;
        self.reschedule_notification();
        tracing::debug!(session = %self.timer.current_session, time_left = self.timer.time_left, "timer started");
        Some(Event::TimerStarted {
            session: self.timer.current_session,
            time_left: self.timer.time_left,
            at: self.clock.now(),
        })
    }

    /// Toggle pause. Ignored while the timer is not active.
    pub fn pause_timer(&mut self) -> Option<Event> {
        if !self.timer.is_active {
            tracing::debug!("pause ignored, timer is not active");
            return None;
        }

        let at = self.clock.now();
        if self.timer.is_paused {
            self.timer.is_paused = false;
            self.reschedule_notification();
            Some(Event::TimerResumed {
                time_left: self.timer.time_left,
                at,
            })
        } else {
            self.timer.is_paused = true;
            self.effects.dispatch(Effect::CancelNotifications);
            Some(Event::TimerPaused {
                time_left: self.timer.time_left,
                at,
            })
        }
    }

    /// Stop and rewind the current segment. The cycle position and ledger are untouched.
    pub fn reset_timer(&mut self) -> Option<Event> {
        self.effects.dispatch(Effect::CancelNotifications);
        self.timer = TimerState::idle(self.timer.current_session, &self.settings);
        Some(Event::TimerReset {
            session: self.timer.current_session,
            time_left: self.timer.time_left,
            at: self.clock.now(),
        })
    }

    /// Call once per second. Returns `Some(Event::SessionCompleted)` when the segment ends.
    pub fn tick(&mut self) -> Option<Event> {
        if !self.timer.is_running() {
            return None;
        }
        if self.timer.time_left <= 1 {
            return self.complete_session();
        }
        self.timer.time_left -= 1;
        None
    }

    /// End the current segment, record it and move to the next one.
    pub fn complete_session(&mut self) -> Option<Event> {
        let ended = self.timer.current_session;
        let at = self.clock.now();
        let session = Session {
            id: Uuid::new_v4().to_string(),
            duration: self.settings.duration_for(ended),
            completed_at: at,
            kind: ended.record_kind(),
            journal_entry: None,
        };
        let session_id = session.id.clone();

        if ended.is_focus() {
            self.session_count = self.session_count.saturating_add(1);
        }
        let next = next_segment(
            ended,
            self.session_count,
            self.settings.sessions_before_long_break,
        );

        self.ledger.record(session);
        self.timer = TimerState::idle(next, &self.settings);
        self.effects.dispatch(Effect::CancelNotifications);
        self.persist();

        tracing::debug!(%ended, %next, session_count = self.session_count, "segment completed");
        Some(Event::SessionCompleted {
            session_id,
            ended,
            next,
            session_count: self.session_count,
            time_left: self.timer.time_left,
            at,
        })
    }

    /// Merge `patch` into the settings.
    ///
    /// While the timer is idle, a new duration for the current segment kind is
    /// applied to `time_left` right away; a running countdown is left alone.
    pub fn update_settings(&mut self, patch: SettingsPatch) -> Option<Event> {
        self.settings.merge(&patch);

        if !self.timer.is_active {
            if let Some(duration) = patch.duration_for(self.timer.current_session) {
                self.timer.time_left = duration;
            }
        }
        if patch.notifications_enabled == Some(false) {
            self.effects.dispatch(Effect::CancelNotifications);
        }
        self.persist();

        Some(Event::SettingsUpdated {
            settings: self.settings.clone(),
            time_left: self.timer.time_left,
            at: self.clock.now(),
        })
    }

    /// Attach or replace the journal text of a ledger entry. Unknown ids are ignored.
    pub fn add_journal_entry(&mut self, session_id: &str, text: impl Into<String>) -> Option<Event> {
        if !self.ledger.set_journal(session_id, text.into()) {
            tracing::debug!(%session_id, "journal entry for unknown session ignored");
            return None;
        }
        self.persist();
        Some(Event::JournalUpdated {
            session_id: session_id.to_string(),
            at: self.clock.now(),
        })
    }

    /// Wait for queued persistence and notification effects to finish.
    pub async fn flush(&self) {
        self.effects.flush().await;
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn reschedule_notification(&self) {
        self.effects.dispatch(Effect::CancelNotifications);
        if self.settings.notifications_enabled {
            self.effects.dispatch(Effect::ScheduleNotification {
                after_secs: u64::from(self.timer.time_left),
                kind: self.timer.current_session,
            });
        }
    }

    fn persisted_state(&self) -> PersistedState {
        PersistedState {
            settings: self.settings.clone(),
            sessions: self.ledger.to_vec(),
            session_count: self.session_count,
        }
    }

    fn persist(&self) {
        match self.persisted_state().encode() {
            Ok(blob) => self.effects.dispatch(Effect::Persist {
                key: self.state_key.clone(),
                blob,
            }),
            Err(e) => tracing::warn!(error = %e, "failed to encode engine state"),
        }
    }

    fn local_now(&self) -> DateTime<Local> {
        self.clock.now().with_timezone(&Local)
    }
}

/// `MM:SS`; minutes are not wrapped into hours.
pub fn format_clock(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::ledger::RecordKind;
    use crate::notify::{NotifierCall, RecordingNotifier};
    use crate::storage::{KeyValueStore, MemoryStore};
    use chrono::Duration;

    struct Harness {
        engine: FocusEngine,
        store: MemoryStore,
        notifier: RecordingNotifier,
        clock: ManualClock,
    }

    fn harness_with(settings: Settings) -> Harness {
        let store = MemoryStore::new();
        let notifier = RecordingNotifier::new();
        let clock = ManualClock::new(Utc.with_ymd_and_hms(2024, 6, 3, 9, 0, 0).unwrap());
        let effects = EffectDispatcher::inline(Arc::new(store.clone()), Arc::new(notifier.clone()));
        let engine = FocusEngine::with_options(
            effects,
            EngineOptions {
                defaults: settings,
                clock: Arc::new(clock.clone()),
                ..EngineOptions::default()
            },
        );
        Harness {
            engine,
            store,
            notifier,
            clock,
        }
    }

    fn harness() -> Harness {
        harness_with(Settings::default())
    }

    fn short_settings() -> Settings {
        Settings {
            focus_duration: 3,
            break_duration: 2,
            long_break_duration: 4,
            sessions_before_long_break: 2,
            ..Settings::default()
        }
    }

    #[test]
    fn starts_idle_on_focus() {
        let h = harness();
        let t = h.engine.timer();
        assert!(!t.is_active);
        assert!(!t.is_paused);
        assert_eq!(t.time_left, 1500);
        assert_eq!(t.current_session, SessionKind::Focus);
        assert_eq!(h.engine.session_count(), 0);
        assert!(h.engine.ledger().is_empty());
    }

    #[test]
    fn start_schedules_notification_for_remaining_time() {
        let mut h = harness();
        assert!(h.engine.start_timer().is_some());
        assert!(h.engine.timer().is_running());
        assert_eq!(
            h.notifier.pending(),
            vec![NotifierCall::Schedule { after_secs: 1500, kind: SessionKind::Focus }]
        );
    }

    #[test]
    fn start_twice_leaves_one_pending_notification() {
        let mut h = harness();
        h.engine.start_timer();
        h.engine.tick();
        h.engine.start_timer();
        assert_eq!(
            h.notifier.pending(),
            vec![NotifierCall::Schedule { after_secs: 1499, kind: SessionKind::Focus }]
        );
        assert_eq!(h.engine.time_left(), 1499);
    }

    #[test]
    fn start_without_notifications_schedules_nothing() {
        let mut h = harness_with(Settings {
            notifications_enabled: false,
            ..Settings::default()
        });
        h.engine.start_timer();
        assert!(h.notifier.pending().is_empty());
    }

    #[test]
    fn start_with_zero_time_left_reloads_duration() {
        let mut h = harness();
        h.engine.timer.time_left = 0;
        h.engine.start_timer();
        assert_eq!(h.engine.time_left(), 1500);
        assert!(h.engine.is_active());
    }

    #[test]
    fn pause_toggles_and_manages_notifications() {
        let mut h = harness();
        h.engine.start_timer();
        h.engine.tick();

        assert!(matches!(h.engine.pause_timer(), Some(Event::TimerPaused { time_left: 1499, .. })));
        assert!(h.engine.is_paused());
        assert!(h.notifier.pending().is_empty());

        // Paused: ticks are ignored.
        h.engine.tick();
        assert_eq!(h.engine.time_left(), 1499);

        assert!(matches!(h.engine.pause_timer(), Some(Event::TimerResumed { .. })));
        assert!(!h.engine.is_paused());
        assert_eq!(
            h.notifier.pending(),
            vec![NotifierCall::Schedule { after_secs: 1499, kind: SessionKind::Focus }]
        );
    }

    #[test]
    fn pause_while_inactive_is_noop() {
        let mut h = harness();
        assert!(h.engine.pause_timer().is_none());
        assert!(!h.engine.is_paused());
        assert!(h.notifier.calls().is_empty());
    }

    #[test]
    fn reset_rewinds_current_segment_only() {
        let mut h = harness_with(short_settings());
        h.engine.start_timer();
        for _ in 0..3 {
            h.engine.tick();
        }
        assert_eq!(h.engine.current_session(), SessionKind::Break);
        h.engine.start_timer();
        h.engine.tick();
        assert_eq!(h.engine.time_left(), 1);

        let before_ledger = h.engine.ledger().clone();
        h.engine.reset_timer();
        assert_eq!(h.engine.current_session(), SessionKind::Break);
        assert_eq!(h.engine.time_left(), 2);
        assert!(!h.engine.is_active());
        assert_eq!(h.engine.session_count(), 1);
        assert_eq!(h.engine.ledger(), &before_ledger);
        assert!(h.notifier.pending().is_empty());
    }

    #[test]
    fn tick_when_idle_does_nothing() {
        let mut h = harness();
        assert!(h.engine.tick().is_none());
        assert_eq!(h.engine.time_left(), 1500);
    }

    #[test]
    fn last_tick_completes_exactly_once() {
        let mut h = harness_with(short_settings());
        h.engine.start_timer();
        assert!(h.engine.tick().is_none());
        assert!(h.engine.tick().is_none());
        assert_eq!(h.engine.time_left(), 1);

        let event = h.engine.tick();
        assert!(matches!(
            event,
            Some(Event::SessionCompleted {
                ended: SessionKind::Focus,
                next: SessionKind::Break,
                session_count: 1,
                time_left: 2,
                ..
            })
        ));
        assert_eq!(h.engine.ledger().len(), 1);
        assert!(!h.engine.is_active());

        // Not running any more; further ticks are inert.
        assert!(h.engine.tick().is_none());
        assert_eq!(h.engine.ledger().len(), 1);
    }

    #[test]
    fn completion_records_configured_duration_and_time() {
        let mut h = harness_with(short_settings());
        h.clock.advance(Duration::minutes(3));
        h.engine.complete_session();
        let entry = h.engine.ledger().latest().unwrap();
        assert_eq!(entry.kind, RecordKind::Focus);
        assert_eq!(entry.duration, 3);
        assert_eq!(entry.completed_at, Utc.with_ymd_and_hms(2024, 6, 3, 9, 3, 0).unwrap());
        assert!(entry.journal_entry.is_none());
    }

    #[test]
    fn long_break_is_recorded_as_break() {
        let mut h = harness_with(short_settings());
        h.engine.complete_session(); // focus -> break
        h.engine.complete_session(); // break -> focus
        h.engine.complete_session(); // focus -> long-break
        assert_eq!(h.engine.current_session(), SessionKind::LongBreak);
        assert_eq!(h.engine.time_left(), 4);
        h.engine.complete_session(); // long-break -> focus
        let latest = h.engine.ledger().latest().unwrap();
        assert_eq!(latest.kind, RecordKind::Break);
        assert_eq!(latest.duration, 4);
        assert_eq!(h.engine.current_session(), SessionKind::Focus);
        assert_eq!(h.engine.session_count(), 2);
    }

    #[test]
    fn completion_cancels_and_persists() {
        let mut h = harness_with(short_settings());
        h.engine.start_timer();
        h.engine.complete_session();
        assert!(h.notifier.pending().is_empty());

        let raw = h.store.get(DEFAULT_STATE_KEY).unwrap().unwrap();
        let persisted = PersistedState::decode(&raw);
        assert_eq!(persisted.session_count, 1);
        assert_eq!(persisted.sessions.len(), 1);
    }

    #[test]
    fn update_settings_while_idle_applies_to_current_segment() {
        let mut h = harness();
        h.engine.update_settings(SettingsPatch {
            focus_duration: Some(1200),
            ..SettingsPatch::default()
        });
        assert_eq!(h.engine.time_left(), 1200);

        // Break duration does not concern a focus segment.
        h.engine.update_settings(SettingsPatch {
            break_duration: Some(600),
            ..SettingsPatch::default()
        });
        assert_eq!(h.engine.time_left(), 1200);
        assert_eq!(h.engine.settings().break_duration, 600);
    }

    #[test]
    fn update_settings_while_active_leaves_countdown() {
        let mut h = harness();
        h.engine.start_timer();
        h.engine.tick();
        h.engine.update_settings(SettingsPatch {
            focus_duration: Some(60),
            ..SettingsPatch::default()
        });
        assert_eq!(h.engine.time_left(), 1499);
        assert_eq!(h.engine.settings().focus_duration, 60);
    }

    #[test]
    fn update_long_break_duration_during_idle_long_break() {
        let mut h = harness_with(Settings {
            sessions_before_long_break: 1,
            ..Settings::default()
        });
        h.engine.complete_session();
        assert_eq!(h.engine.current_session(), SessionKind::LongBreak);
        h.engine.update_settings(SettingsPatch {
            long_break_duration: Some(1800),
            ..SettingsPatch::default()
        });
        assert_eq!(h.engine.time_left(), 1800);
    }

    #[test]
    fn disabling_notifications_cancels_pending() {
        let mut h = harness();
        h.engine.start_timer();
        h.engine.update_settings(SettingsPatch {
            notifications_enabled: Some(false),
            ..SettingsPatch::default()
        });
        assert!(h.notifier.pending().is_empty());
    }

    #[test]
    fn journal_entry_overwrites_and_persists() {
        let mut h = harness();
        h.engine.complete_session();
        let id = h.engine.ledger().latest().unwrap().id.clone();

        assert!(h.engine.add_journal_entry(&id, "first").is_some());
        assert!(h.engine.add_journal_entry(&id, "second").is_some());
        assert_eq!(
            h.engine.ledger().get(&id).unwrap().journal_entry.as_deref(),
            Some("second")
        );

        let persisted =
            PersistedState::decode(&h.store.get(DEFAULT_STATE_KEY).unwrap().unwrap());
        assert_eq!(persisted.sessions[0].journal_entry.as_deref(), Some("second"));
        assert_eq!(h.engine.journaled_sessions().len(), 1);
    }

    #[test]
    fn journal_entry_for_unknown_id_is_ignored() {
        let mut h = harness();
        h.engine.complete_session();
        let before = h.engine.ledger().clone();
        assert!(h.engine.add_journal_entry("missing", "text").is_none());
        assert_eq!(h.engine.ledger(), &before);
    }

    #[test]
    fn snapshot_reports_progress_and_display() {
        let mut h = harness();
        h.engine.start_timer();
        for _ in 0..750 {
            h.engine.tick();
        }
        match h.engine.snapshot() {
            Event::StateSnapshot {
                is_active,
                time_left,
                total,
                progress,
                display,
                ..
            } => {
                assert!(is_active);
                assert_eq!(time_left, 750);
                assert_eq!(total, 1500);
                assert!((progress - 0.5).abs() < 1e-9);
                assert_eq!(display, "12:30");
            }
            _ => panic!("Expected StateSnapshot"),
        }
    }

    #[test]
    fn progress_is_zero_for_zero_length_segment() {
        let mut h = harness();
        h.engine.update_settings(SettingsPatch {
            focus_duration: Some(0),
            ..SettingsPatch::default()
        });
        assert_eq!(h.engine.progress(), 0.0);
    }

    #[test]
    fn recent_focus_sessions_skips_breaks() {
        let mut h = harness();
        for _ in 0..6 {
            h.engine.complete_session();
        }
        let recent = h.engine.recent_focus_sessions(2);
        assert_eq!(recent.len(), 2);
        assert!(recent.iter().all(|s| s.is_focus()));
    }

    #[test]
    fn format_clock_pads() {
        assert_eq!(format_clock(0), "00:00");
        assert_eq!(format_clock(65), "01:05");
        assert_eq!(format_clock(3600), "60:00");
    }
}
