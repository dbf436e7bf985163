use std::collections::HashSet;

use chrono::{DateTime, Days, NaiveDate, TimeZone};
use serde::{Deserialize, Serialize};

use crate::ledger::Ledger;

/// How far back a streak is looked for.
pub const STREAK_LOOKBACK_DAYS: u32 = 30;

/// Focus totals for one calendar day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayStats {
    pub date: NaiveDate,
    /// Short weekday name, e.g. `Mon`.
    pub weekday: String,
    pub sessions: usize,
    pub minutes: f64,
}

fn focus_days<Tz: TimeZone>(ledger: &Ledger, tz: &Tz) -> HashSet<NaiveDate> {
    ledger
        .focus_sessions()
        .map(|s| s.completed_at.with_timezone(tz).date_naive())
        .collect()
}

/// Consecutive days with at least one focus session, counting back from
/// today. A today without sessions does not break the streak yet.
pub fn streak_days<Tz: TimeZone>(ledger: &Ledger, now: &DateTime<Tz>) -> u32 {
    let days = focus_days(ledger, &now.timezone());
    let today = now.date_naive();
    let mut streak = 0;

    for offset in 0..STREAK_LOOKBACK_DAYS {
        let Some(day) = today.checked_sub_days(Days::new(u64::from(offset))) else {
            break;
        };
        if days.contains(&day) {
            streak += 1;
        } else if offset > 0 {
            break;
        }
    }
    streak
}

/// The last seven calendar days, oldest first, today last.
pub fn daily_breakdown<Tz: TimeZone>(ledger: &Ledger, now: &DateTime<Tz>) -> Vec<DayStats> {
    let tz = now.timezone();
    let today = now.date_naive();

    (0..7u64)
        .rev()
        .filter_map(|offset| today.checked_sub_days(Days::new(offset)))
        .map(|date| {
            let (sessions, minutes) = ledger
                .focus_sessions()
                .filter(|s| s.completed_at.with_timezone(&tz).date_naive() == date)
                .fold((0usize, 0.0f64), |(n, m), s| (n + 1, m + s.minutes()));
            DayStats {
                date,
                weekday: date.format("%a").to_string(),
                sessions,
                minutes,
            }
        })
        .collect()
}
