//! Aggregate statistics over the session ledger.
//!
//! Only focus sessions count. Day-based queries use the calendar day of the
//! time zone carried by `now`; the weekly total is a rolling seven-day window.

mod daily;

pub use daily::{daily_breakdown, streak_days, DayStats, STREAK_LOOKBACK_DAYS};

use chrono::{DateTime, Duration, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::ledger::{Ledger, Session};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyStats {
    pub total_minutes: f64,
    pub sessions_count: usize,
}

/// Focus sessions completed on `now`'s calendar day.
pub fn todays_sessions<'a, Tz: TimeZone>(ledger: &'a Ledger, now: &DateTime<Tz>) -> Vec<&'a Session> {
    let tz = now.timezone();
    let today = now.date_naive();
    ledger
        .focus_sessions()
        .filter(|s| s.completed_at.with_timezone(&tz).date_naive() == today)
        .collect()
}

/// Focus sessions completed within the seven days before `now`.
pub fn weekly_stats(ledger: &Ledger, now: &DateTime<Utc>) -> WeeklyStats {
    let since = *now - Duration::days(7);
    ledger
        .focus_sessions()
        .filter(|s| s.completed_at >= since)
        .fold(WeeklyStats::default(), |mut acc, s| {
            acc.total_minutes += s.minutes();
            acc.sessions_count += 1;
            acc
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::RecordKind;
    use chrono::FixedOffset;

    fn entry(id: &str, at: DateTime<Utc>, kind: RecordKind, duration: u32) -> Session {
        Session {
            id: id.into(),
            duration,
            completed_at: at,
            kind,
            journal_entry: None,
        }
    }

    fn tz() -> FixedOffset {
        FixedOffset::east_opt(2 * 3600).unwrap()
    }

    #[test]
    fn today_respects_local_midnight() {
        let tz = tz();
        let yesterday_late = tz.with_ymd_and_hms(2024, 6, 2, 23, 59, 0).unwrap();
        let today_early = tz.with_ymd_and_hms(2024, 6, 3, 0, 1, 0).unwrap();
        let now = tz.with_ymd_and_hms(2024, 6, 3, 15, 0, 0).unwrap();

        let ledger = Ledger::from_newest_first(vec![
            entry("today", today_early.with_timezone(&Utc), RecordKind::Focus, 1500),
            entry("yesterday", yesterday_late.with_timezone(&Utc), RecordKind::Focus, 1500),
        ]);

        let ids: Vec<_> = todays_sessions(&ledger, &now).iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["today"]);
    }

    #[test]
    fn today_excludes_breaks() {
        let now = tz().with_ymd_and_hms(2024, 6, 3, 15, 0, 0).unwrap();
        let ledger = Ledger::from_newest_first(vec![
            entry("b", now.with_timezone(&Utc), RecordKind::Break, 300),
            entry("f", now.with_timezone(&Utc), RecordKind::Focus, 1500),
        ]);
        assert_eq!(todays_sessions(&ledger, &now).len(), 1);
    }

    #[test]
    fn weekly_is_rolling_window() {
        let now = Utc.with_ymd_and_hms(2024, 6, 10, 12, 0, 0).unwrap();
        let ledger = Ledger::from_newest_first(vec![
            entry("a", now - Duration::hours(1), RecordKind::Focus, 1500),
            entry("b", now - Duration::days(6), RecordKind::Focus, 2700),
            entry("brk", now - Duration::days(1), RecordKind::Break, 300),
            entry("edge", now - Duration::days(7), RecordKind::Focus, 600),
            entry("old", now - Duration::days(7) - Duration::seconds(1), RecordKind::Focus, 1500),
        ]);
        let stats = weekly_stats(&ledger, &now);
        assert_eq!(stats.sessions_count, 3);
        assert!((stats.total_minutes - (25.0 + 45.0 + 10.0)).abs() < 1e-9);
    }

    #[test]
    fn weekly_of_empty_ledger_is_zero() {
        let now = Utc.with_ymd_and_hms(2024, 6, 10, 12, 0, 0).unwrap();
        assert_eq!(weekly_stats(&Ledger::new(), &now), WeeklyStats::default());
    }

    #[test]
    fn weekly_minutes_keep_fractions() {
        let now = Utc.with_ymd_and_hms(2024, 6, 10, 12, 0, 0).unwrap();
        let ledger = Ledger::from_newest_first(vec![entry("a", now, RecordKind::Focus, 90)]);
        assert!((weekly_stats(&ledger, &now).total_minutes - 1.5).abs() < 1e-9);
    }
}
