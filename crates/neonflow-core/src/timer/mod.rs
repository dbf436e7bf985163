mod cycle;
mod engine;
mod ticker;

pub use cycle::{next_segment, SessionKind};
pub use engine::{format_clock, EngineOptions, FocusEngine, TimerState};
pub use ticker::Ticker;
