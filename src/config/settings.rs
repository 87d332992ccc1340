//! TOML-based configuration for shellite.
//!
//! Supports a config file (shellite.toml) with environment variable expansion.
//!
//! Example configuration:
//! ```toml
//! [engine]
//! binary = "${SQLITE3_BIN}"
//! busy_timeout_ms = 5000
//!
//! [session]
//! timeout_ms = 10000
//! debug = false
//! ```

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::shell::SessionConfig;

/// Error type for settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    /// Engine (sqlite3 binary) configuration.
    pub engine: EngineSettings,

    /// Per-session defaults.
    pub session: SessionSettings,
}

/// Engine configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct EngineSettings {
    /// The sqlite3 executable (supports ${ENV_VAR} expansion). Resolved on
    /// the search path when not an absolute path.
    pub binary: String,

    /// Busy timeout passed to the engine at bootstrap, in milliseconds.
    pub busy_timeout_ms: Option<u64>,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            binary: "sqlite3".to_string(),
            busy_timeout_ms: None,
        }
    }
}

/// Session defaults.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SessionSettings {
    /// Response timeout in milliseconds.
    pub timeout_ms: u64,

    /// Emit per-command diagnostics.
    pub debug: bool,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            timeout_ms: 5_000,
            debug: false,
        }
    }
}

impl Settings {
    /// Load settings from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(SettingsError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        let settings: Settings = toml::from_str(&content)?;
        Ok(settings)
    }

    /// Load settings from the default config file locations.
    ///
    /// Searches in order:
    /// 1. Environment variable `SHELLITE_CONFIG`
    /// 2. `./shellite.toml`
    /// 3. `~/.config/shellite/config.toml`
    pub fn load() -> Result<Self, SettingsError> {
        if let Ok(path) = env::var("SHELLITE_CONFIG") {
            return Self::from_file(&path);
        }

        let local_config = PathBuf::from("shellite.toml");
        if local_config.exists() {
            return Self::from_file(&local_config);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("shellite").join("config.toml");
            if user_config.exists() {
                return Self::from_file(&user_config);
            }
        }

        Ok(Settings::default())
    }

    /// Resolve into a session configuration.
    pub fn session_config(&self) -> Result<SessionConfig, SettingsError> {
        let binary = expand_env_vars(&self.engine.binary)?;
        let mut config = SessionConfig::default()
            .binary(binary)
            .timeout(Duration::from_millis(self.session.timeout_ms))
            .debug(self.session.debug);
        if let Some(busy_ms) = self.engine.busy_timeout_ms {
            config = config.busy_timeout(Duration::from_millis(busy_ms));
        }
        Ok(config)
    }
}

static ENV_VAR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}|\$([A-Za-z_][A-Za-z0-9_]*)").unwrap());

/// Expand environment variables in a string.
///
/// Supports `${VAR}` and `$VAR` syntax.
pub fn expand_env_vars(s: &str) -> Result<String, SettingsError> {
    let mut result = String::with_capacity(s.len());
    let mut last_end = 0;

    for captures in ENV_VAR_RE.captures_iter(s) {
        let whole = captures.get(0).expect("match always has a group 0");
        let name = captures
            .get(1)
            .or_else(|| captures.get(2))
            .expect("match always captures a variable name")
            .as_str();
        let value =
            env::var(name).map_err(|_| SettingsError::MissingEnvVar(name.to_string()))?;
        result.push_str(&s[last_end..whole.start()]);
        result.push_str(&value);
        last_end = whole.end();
    }
    result.push_str(&s[last_end..]);

    Ok(result)
}
