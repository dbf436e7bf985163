//! 1 Hz driver for [`FocusEngine::tick`].

use std::time::Duration;

use tokio::time::{interval, MissedTickBehavior};

use super::engine::FocusEngine;
use crate::events::Event;

#[derive(Debug, Clone, Copy)]
pub struct Ticker {
    period: Duration,
}

impl Default for Ticker {
    fn default() -> Self {
        Self {
            period: Duration::from_secs(1),
        }
    }
}

impl Ticker {
    pub fn new(period: Duration) -> Self {
        Self { period }
    }

    /// Drive the running segment to completion.
    ///
    /// Returns `None` straight away if the timer is idle or paused.
    pub async fn run_segment(&self, engine: &mut FocusEngine) -> Option<Event> {
        self.run_segment_with(engine, |_| {}).await
    }

    /// Like [`Ticker::run_segment`], calling `on_tick` after every tick that
    /// did not finish the segment.
    pub async fn run_segment_with<F>(&self, engine: &mut FocusEngine, mut on_tick: F) -> Option<Event>
    where
        F: FnMut(&FocusEngine),
    {
        if !engine.timer().is_running() {
            return None;
        }

        let mut ticks = interval(self.period);
        // Late wakeups shift the schedule instead of bursting ticks.
        ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick of an interval resolves immediately.
        ticks.tick().await;

        loop {
            ticks.tick().await;
            if let Some(event) = engine.tick() {
                return Some(event);
            }
            if !engine.timer().is_running() {
                return None;
            }
            on_tick(engine);
        }
    }
}
