//! Configuration loading.

mod settings;

pub use settings::{expand_env_vars, EngineSettings, SessionSettings, Settings, SettingsError};
