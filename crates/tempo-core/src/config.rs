//! TOML-based application configuration.
//!
//! Stores user preferences including:
//! - Default countdown length
//! - Default interval program (rounds, exercises, work/rest seconds)
//! - Refresh cadence for hosts that drive the timer
//! - Completion behaviour and time acceleration
//!
//! Configuration is stored at `~/.config/tempo/config.toml`.

use std::path::{Path, PathBuf};

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::clock::MAX_SPEED;
use crate::error::ConfigError;
use crate::scheduler::{RefreshPolicy, DEFAULT_CADENCE_MS};
use crate::tabata::TabataConfig;

/// Countdown-mode configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountdownSettings {
    #[serde(default = "default_countdown_seconds")]
    pub seconds: u64,
}

/// Interval-mode configuration, unvalidated until [`Config::tabata_config`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TabataSettings {
    #[serde(default = "default_8")]
    pub exercises_per_round: u32,
    #[serde(default = "default_8")]
    pub number_of_rounds: u32,
    #[serde(default = "default_work")]
    pub seconds_per_exercise: u32,
    #[serde(default = "default_rest")]
    pub seconds_of_rest: u32,
}

/// Refresh-loop configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefreshSettings {
    #[serde(default = "default_cadence_ms")]
    pub cadence_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BehaviorSettings {
    /// Stop the timer when a countdown completes.
    #[serde(default = "default_true")]
    pub stop_on_complete: bool,
    /// Time acceleration factor; 1.0 is real time.
    #[serde(default = "default_speed")]
    pub speed: f64,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/tempo/config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub countdown: CountdownSettings,
    #[serde(default)]
    pub tabata: TabataSettings,
    #[serde(default)]
    pub refresh: RefreshSettings,
    #[serde(default)]
    pub behavior: BehaviorSettings,
}

// Default functions
fn default_countdown_seconds() -> u64 {
    300
}
fn default_8() -> u32 {
    8
}
fn default_work() -> u32 {
    20
}
fn default_rest() -> u32 {
    10
}
fn default_cadence_ms() -> u64 {
    DEFAULT_CADENCE_MS
}
fn default_true() -> bool {
    true
}
fn default_speed() -> f64 {
    1.0
}

impl Default for CountdownSettings {
    fn default() -> Self {
        Self {
            seconds: default_countdown_seconds(),
        }
    }
}

impl Default for TabataSettings {
    fn default() -> Self {
        Self {
            exercises_per_round: 8,
            number_of_rounds: 8,
            seconds_per_exercise: 20,
            seconds_of_rest: 10,
        }
    }
}

impl Default for RefreshSettings {
    fn default() -> Self {
        Self {
            cadence_ms: DEFAULT_CADENCE_MS,
        }
    }
}

impl Default for BehaviorSettings {
    fn default() -> Self {
        Self {
            stop_on_complete: true,
            speed: 1.0,
        }
    }
}

/// Returns `~/.config/tempo[-dev]/` based on TEMPO_ENV.
///
/// Set TEMPO_ENV=dev to use the development directory.
pub fn data_dir() -> PathBuf {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("TEMPO_ENV").unwrap_or_else(|_| "production".to_string());

    if env == "dev" {
        base_dir.join("tempo-dev")
    } else {
        base_dir.join("tempo")
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
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let unparsable =
            |what: &str| ConfigError::invalid(key, format!("cannot parse '{value}' as {what}"));

        let mut parts = key.split('.').peekable();
        if parts.peek().is_none() || key.is_empty() {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            if parts.peek().is_some() {
                current = current.get_mut(part).ok_or_else(unknown)?;
                continue;
            }

            let obj = current.as_object_mut().ok_or_else(unknown)?;
            let existing = obj.get(part).ok_or_else(unknown)?;
            let new_value = match existing {
                serde_json::Value::Bool(_) => {
                    serde_json::Value::Bool(value.parse::<bool>().map_err(|_| unparsable("bool"))?)
                }
                serde_json::Value::Number(n) if n.is_f64() => value
                    .parse::<f64>()
                    .ok()
                    .and_then(serde_json::Number::from_f64)
                    .map(serde_json::Value::Number)
                    .ok_or_else(|| unparsable("number"))?,
                serde_json::Value::Number(_) => serde_json::Value::Number(
                    value.parse::<u64>().map_err(|_| unparsable("integer"))?.into(),
                ),
                serde_json::Value::Object(_) => return Err(unknown()),
                _ => serde_json::Value::String(value.into()),
            };
            obj.insert(part.to_string(), new_value);
            return Ok(());
        }

        Err(unknown())
    }

    /// `config.toml` inside [`data_dir`].
    pub fn path() -> PathBuf {
        data_dir().join("config.toml")
    }

    /// Load from the default location, writing defaults if nothing is there.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::path();
        if !path.exists() {
            let cfg = Self::default();
            cfg.save_to(&path)?;
            return Ok(cfg);
        }
        Self::load_from(&path)
    }

    /// Load and validate a config file. A missing file yields defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => {
                return Err(ConfigError::LoadFailed {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                })
            }
        };
        let cfg: Config =
            toml::from_str(&content).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Persist to the default location.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path())
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| save_failed(e.to_string()))?;
        }
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))?;
        tracing::debug!(path = %path.display(), "configuration saved");
        Ok(())
    }

    /// Check every value a timer would reject, before any timer is built.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.tabata_config()?;
        self.countdown_target()?;
        self.refresh_policy()?;
        self.speed()?;
        Ok(())
    }

    /// Time acceleration factor, in `(0, MAX_SPEED]`.
    pub fn speed(&self) -> Result<f64, ConfigError> {
        let speed = self.behavior.speed;
        if speed.is_finite() && speed > 0.0 && speed <= MAX_SPEED {
            Ok(speed)
        } else {
            Err(ConfigError::invalid(
                "behavior.speed",
                format!("must be a positive number no greater than {MAX_SPEED}"),
            ))
        }
    }

    pub fn tabata_config(&self) -> Result<TabataConfig, ConfigError> {
        let t = &self.tabata;
        TabataConfig::new(
            t.exercises_per_round,
            t.number_of_rounds,
            t.seconds_per_exercise,
            t.seconds_of_rest,
        )
        .map_err(|e| match e {
            ConfigError::InvalidValue { key, message } => ConfigError::InvalidValue {
                key: format!("tabata.{key}"),
                message,
            },
            other => other,
        })
    }

    pub fn countdown_target(&self) -> Result<Duration, ConfigError> {
        let target = i64::try_from(self.countdown.seconds)
            .ok()
            .filter(|&s| s >= 1)
            .and_then(Duration::try_seconds)
            .ok_or_else(|| {
                ConfigError::invalid("countdown.seconds", "must be a positive number of seconds")
            })?;
        Ok(target)
    }

    pub fn refresh_policy(&self) -> Result<RefreshPolicy, ConfigError> {
        RefreshPolicy::new(self.refresh.cadence_ms)
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

    /// Set a config value by dot-separated key.
    ///
    /// The result is validated; on error `self` is left unchanged.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json =
            serde_json::to_value(&*self).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config =
            serde_json::from_value(json).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }
}
