//! # Neon Flow Core Library
//!
//! This library provides the core business logic for the Neon Flow focus
//! timer. Hosts (the CLI, a mobile shell) are thin layers that poll engine
//! state for rendering and forward user input as engine commands.
//!
//! ## Architecture
//!
//! - **Focus Engine**: A tick-driven state machine cycling through focus,
//!   break and long-break segments; the caller invokes `tick()` once a second
//! - **Ledger**: Newest-first history of completed segments with journal notes
//! - **Storage**: A swappable key-value store holding a JSON snapshot of
//!   settings, history and the focus counter, plus TOML host configuration
//! - **Effects**: Fire-and-forget persistence and notification scheduling
//!
//! ## Key Components
//!
//! - [`FocusEngine`]: Core timer state machine
//! - [`EffectDispatcher`]: Inline or background side-effect execution
//! - [`KeyValueStore`]: Durable store capability
//! - [`NotificationScheduler`]: Local notification capability
//! - [`AppConfig`]: Host configuration management

pub mod clock;
pub mod effects;
pub mod error;
pub mod events;
pub mod ledger;
pub mod notify;
pub mod settings;
pub mod stats;
pub mod storage;
pub mod timer;

pub use clock::{Clock, ManualClock, SystemClock};
pub use effects::{Effect, EffectDispatcher};
pub use error::{ConfigError, CoreError, NotifyError, StoreError, ValidationError};
pub use events::Event;
pub use ledger::{Ledger, RecordKind, Session};
pub use notify::{LogNotifier, NoopNotifier, Notification, NotificationScheduler, RecordingNotifier};
pub use settings::{Settings, SettingsPatch, Soundscape, TimePreset};
pub use stats::{DayStats, WeeklyStats};
pub use storage::{AppConfig, KeyValueStore, MemoryStore, PersistedState, SqliteStore};
pub use timer::{EngineOptions, FocusEngine, SessionKind, Ticker, TimerState};
