pub mod config;
pub mod journal;
pub mod settings;
pub mod stats;
pub mod timer;

use std::sync::Arc;

use neonflow_core::{
    AppConfig, EffectDispatcher, EngineOptions, FocusEngine, LogNotifier, SqliteStore,
};

/// Load the config, open the database it points at and rehydrate an engine.
pub fn open_engine() -> Result<FocusEngine, Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    let path = config.database_path()?;
    tracing::debug!(path = %path.display(), "opening database");

    let store = SqliteStore::open(&path)?;
    let effects = EffectDispatcher::inline(Arc::new(store), Arc::new(LogNotifier));
    Ok(FocusEngine::restore(
        effects,
        EngineOptions {
            state_key: config.storage.state_key,
            defaults: config.defaults,
            ..EngineOptions::default()
        },
    ))
}

pub fn print_json<T: serde::Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
