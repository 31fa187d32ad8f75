//! TOML-based application configuration.
//!
//! Stores user preferences including:
//! - Session plan (phase durations, reps, daily limit)
//! - Resume behavior after a pause
//! - Sound cue settings
//! - UI preferences for embedding frontends
//!
//! Configuration is stored at `~/.config/prana/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::data_dir;
use crate::error::ConfigError;
use crate::session::{
    PhasePlan, ResumeBehavior, DEFAULT_EXHALE_SECS, DEFAULT_HOLD_SECS, DEFAULT_INHALE_SECS,
    DEFAULT_MAX_SESSIONS_PER_DAY, DEFAULT_REPS_PER_SESSION,
};

const CONFIG_FILE: &str = "config.toml";

/// Session plan configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(default = "default_inhale_secs")]
    pub inhale_secs: u64,
    #[serde(default = "default_hold_secs")]
    pub hold_secs: u64,
    #[serde(default = "default_exhale_secs")]
    pub exhale_secs: u64,
    #[serde(default = "default_reps_per_session")]
    pub reps_per_session: u32,
    #[serde(default = "default_max_sessions_per_day")]
    pub max_sessions_per_day: u32,
    #[serde(default)]
    pub resume_behavior: ResumeBehavior,
}

/// Audio cue configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SoundConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Command used to play the cue tone (optional).
    /// If unset, the platform players are tried in order.
    #[serde(default)]
    pub cue_command: Option<String>,
}

/// UI configuration for embedding frontends.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    #[serde(default = "default_background_color")]
    pub background_color: String,
    #[serde(default = "default_true")]
    pub show_verse: bool,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/prana/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub sound: SoundConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

// Default functions
fn default_inhale_secs() -> u64 {
    DEFAULT_INHALE_SECS
}
fn default_hold_secs() -> u64 {
    DEFAULT_HOLD_SECS
}
fn default_exhale_secs() -> u64 {
    DEFAULT_EXHALE_SECS
}
fn default_reps_per_session() -> u32 {
    DEFAULT_REPS_PER_SESSION
}
fn default_max_sessions_per_day() -> u32 {
    DEFAULT_MAX_SESSIONS_PER_DAY
}
fn default_true() -> bool {
    true
}
fn default_background_color() -> String {
    "#e0f2f1".into()
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            inhale_secs: default_inhale_secs(),
            hold_secs: default_hold_secs(),
            exhale_secs: default_exhale_secs(),
            reps_per_session: default_reps_per_session(),
            max_sessions_per_day: default_max_sessions_per_day(),
            resume_behavior: ResumeBehavior::default(),
        }
    }
}

impl Default for SoundConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            cue_command: None,
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            background_color: default_background_color(),
            show_verse: true,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            session: SessionConfig::default(),
            sound: SoundConfig::default(),
            ui: UiConfig::default(),
        }
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let unknown = || ConfigError::InvalidValue {
            key: key.to_string(),
            message: "unknown configuration key".to_string(),
        };
        let bad_value = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if parts.peek().is_none() {
            return Err(ConfigError::MissingKey(key.to_string()));
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            let is_leaf = parts.peek().is_none();
            if is_leaf {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part).ok_or_else(unknown)?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value
                            .parse::<bool>()
                            .map_err(|_| bad_value(format!("cannot parse '{value}' as bool")))?,
                    ),
                    serde_json::Value::Number(_) => {
                        if let Ok(n) = value.parse::<u64>() {
                            serde_json::Value::Number(n.into())
                        } else if let Ok(n) = value.parse::<f64>() {
                            serde_json::Number::from_f64(n)
                                .map(serde_json::Value::Number)
                                .ok_or_else(|| {
                                    bad_value(format!("cannot parse '{value}' as number"))
                                })?
                        } else {
                            return Err(bad_value(format!("cannot parse '{value}' as number")));
                        }
                    }
                    serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                        serde_json::from_str(value).map_err(|e| bad_value(e.to_string()))?
                    }
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown())
    }

    fn path() -> Result<PathBuf, ConfigError> {
        match data_dir() {
            Ok(dir) => Ok(dir.join(CONFIG_FILE)),
            Err(e) => Err(ConfigError::LoadFailed {
                path: super::base_dir().join(CONFIG_FILE),
                message: e.to_string(),
            }),
        }
    }

    /// Load from disk or return default.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::path()?;
        match std::fs::read_to_string(&path) {
            Ok(content) => toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                path,
                message: e.to_string(),
            }),
            Err(_) => {
                let cfg = Self::default();
                cfg.save()?;
                Ok(cfg)
            }
        }
    }

    /// Persist to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<(), ConfigError> {
        let path = Self::path()?;
        let content = toml::to_string_pretty(self).map_err(|e| ConfigError::SaveFailed {
            path: path.clone(),
            message: e.to_string(),
        })?;
        std::fs::write(&path, content).map_err(|e| ConfigError::SaveFailed {
            path,
            message: e.to_string(),
        })
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by key and persist. Returns an error if the key
    /// is unknown or the value does not fit the field.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json = serde_json::to_value(&*self).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        *self = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        self.save()?;
        Ok(())
    }

    /// The session plan described by `[session]`, falling back to the
    /// stock plan when the configured values do not validate.
    pub fn plan(&self) -> PhasePlan {
        PhasePlan::new(
            self.session.inhale_secs,
            self.session.hold_secs,
            self.session.exhale_secs,
            self.session.reps_per_session,
            self.session.max_sessions_per_day,
        )
        .unwrap_or_else(|_| PhasePlan::default())
    }

    /// Load from disk, returning default on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }
}
