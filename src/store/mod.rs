//! Persistent stores backed by SQLite

mod settings;

pub use settings::SettingsStore;
