use std::time::Duration;

use clap::Subcommand;
use neonflow_core::timer::format_clock;
use neonflow_core::{Event, FocusEngine, Ticker};

use super::{open_engine, print_json};

#[derive(Subcommand)]
pub enum TimerAction {
    /// Print current timer state as JSON
    Status,
    /// Start the current segment
    Start,
    /// Toggle pause
    Pause,
    /// Stop and rewind the current segment
    Reset,
    /// Start the current segment and advance it by whole seconds
    Tick {
        #[arg(long, default_value = "1")]
        count: u32,
    },
    /// Finish the current segment now and record it
    Complete,
    /// Run segments in real time, printing the countdown to stderr
    Run {
        /// Number of segments to run back to back
        #[arg(long, default_value = "1")]
        segments: u32,
        /// Tick period in milliseconds
        #[arg(long, default_value = "1000", hide = true)]
        period_ms: u64,
    },
}

fn print_event_or_snapshot(
    engine: &FocusEngine,
    event: Option<Event>,
) -> Result<(), Box<dyn std::error::Error>> {
    match event {
        Some(event) => print_json(&event),
        None => print_json(&engine.snapshot()),
    }
}

pub fn run(action: TimerAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut engine = open_engine()?;

    match action {
        TimerAction::Status => print_json(&engine.snapshot())?,
        TimerAction::Start => {
            let event = engine.start_timer();
            print_event_or_snapshot(&engine, event)?;
        }
        TimerAction::Pause => {
            let event = engine.pause_timer();
            print_event_or_snapshot(&engine, event)?;
        }
        TimerAction::Reset => {
            let event = engine.reset_timer();
            print_event_or_snapshot(&engine, event)?;
        }
        TimerAction::Tick { count } => {
            engine.start_timer();
            for _ in 0..count {
                if let Some(event) = engine.tick() {
                    print_json(&event)?;
                    engine.start_timer();
                }
            }
            print_json(&engine.snapshot())?;
        }
        TimerAction::Complete => {
            let event = engine.complete_session();
            print_event_or_snapshot(&engine, event)?;
        }
        TimerAction::Run { segments, period_ms } => {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_time()
                .build()?;
            let ticker = Ticker::new(Duration::from_millis(period_ms));

            runtime.block_on(async {
                for _ in 0..segments {
                    engine.start_timer();
                    eprint!("{} {}", engine.current_session(), format_clock(engine.time_left()));
                    let event = ticker
                        .run_segment_with(&mut engine, |e| {
                            eprint!("\r{} {}", e.current_session(), format_clock(e.time_left()));
                        })
                        .await;
                    eprintln!();
                    match event {
                        Some(event) => print_json(&event)?,
                        None => break,
                    }
                }
                Ok::<_, Box<dyn std::error::Error>>(())
            })?;
        }
    }
    Ok(())
}
