//! TOML-based application configuration.
//!
//! Stores the default game settings and play options:
//! - Difficulty, round count and seconds per round
//! - Tick period of the round timer
//! - Optional fixed seed and custom question bank file
//!
//! Configuration is stored at `~/.config/trivia/config.toml`
//! (`~/.config/trivia-dev/` when `TRIVIA_ENV=dev`).

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::bank::QuestionBank;
use crate::error::{BankError, ConfigError};
use crate::game::GameEngine;
use crate::settings::Settings;

/// Play options that are not part of the game rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayConfig {
    /// Milliseconds between two timer ticks.
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,
    /// Fixed seed for a reproducible question order.
    #[serde(default)]
    pub seed: Option<u64>,
    /// Custom question bank file replacing the bundled one.
    #[serde(default)]
    pub bank_path: Option<PathBuf>,
}

fn default_tick_ms() -> u64 {
    1000
}

impl Default for PlayConfig {
    fn default() -> Self {
        Self {
            tick_ms: default_tick_ms(),
            seed: None,
            bank_path: None,
        }
    }
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/trivia/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub game: Settings,
    #[serde(default)]
    pub play: PlayConfig,
}

/// Returns `~/.config/trivia[-dev]/` based on TRIVIA_ENV.
///
/// # Errors
/// Returns an error if creating the config directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("TRIVIA_ENV").unwrap_or_else(|_| "production".to_string());
    let dir = if env == "dev" {
        base_dir.join("trivia-dev")
    } else {
        base_dir.join("trivia")
    };

    std::fs::create_dir_all(&dir).map_err(|e| ConfigError::SaveFailed {
        path: dir.clone(),
        message: e.to_string(),
    })?;
    Ok(dir)
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
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

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
                serde_json::Value::Bool(_) => value
                    .parse::<bool>()
                    .map(serde_json::Value::Bool)
                    .map_err(|e| invalid(e.to_string()))?,
                serde_json::Value::Number(_)
                | serde_json::Value::String(_)
                | serde_json::Value::Null
                    if value.is_empty() || value == "none" =>
                {
                    serde_json::Value::Null
                }
                serde_json::Value::Number(_) => value
                    .parse::<u64>()
                    .map(|n| serde_json::Value::Number(n.into()))
                    .map_err(|_| invalid(format!("cannot parse '{value}' as a non-negative integer")))?,
                // Unset optional: numbers stay numbers, anything else is a string.
                serde_json::Value::Null => value
                    .parse::<u64>()
                    .map(|n| serde_json::Value::Number(n.into()))
                    .unwrap_or_else(|_| serde_json::Value::String(value.into())),
                serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                    return Err(invalid("cannot set a whole section".into()));
                }
                serde_json::Value::String(_) => serde_json::Value::String(value.into()),
            };

            obj.insert(part.to_string(), new_value);
            return Ok(());
        }

        Err(unknown())
    }

    pub fn path() -> Result<PathBuf, ConfigError> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from the default location, writing defaults on first use.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed or
    /// holds invalid game settings, or if the default config cannot be
    /// written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::path()?)
    }

    /// Load from `path`, writing defaults there if the file does not exist.
    ///
    /// # Errors
    ///
    /// Same as [`Config::load`].
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let cfg: Config =
                    toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                        path: path.to_path_buf(),
                        message: e.to_string(),
                    })?;
                cfg.validate()?;
                Ok(cfg)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no config file, writing defaults");
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
            Err(e) => Err(ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
        }
    }

    /// Persist to the default location.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))
    }

    /// Load from disk, returning default on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
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

    /// Set a config value by key in memory. Call [`Config::save`] to persist.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown, the value cannot be parsed,
    /// or the resulting game settings are invalid.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json = serde_json::to_value(&*self)
            .map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config =
            serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
                key: key.to_string(),
                message: e.to_string(),
            })?;
        updated.validate().map_err(|e| match e {
            ConfigError::InvalidValue { message, .. } => ConfigError::InvalidValue {
                key: key.to_string(),
                message,
            },
            other => other,
        })?;
        *self = updated;
        Ok(())
    }

    /// Validated game settings.
    pub fn settings(&self) -> Settings {
        self.game
    }

    pub fn tick_period(&self) -> Duration {
        Duration::from_millis(self.play.tick_ms)
    }

    /// Bank file named by `play.bank_path`, or the bundled bank.
    ///
    /// # Errors
    ///
    /// Returns an error if the bank file cannot be read or fails validation.
    pub fn question_bank(&self) -> Result<QuestionBank, BankError> {
        match &self.play.bank_path {
            Some(path) => QuestionBank::from_path(path),
            None => Ok(QuestionBank::builtin()),
        }
    }

    /// Engine for a fresh game with these settings, bank and seed.
    ///
    /// # Errors
    ///
    /// Returns an error if the config is invalid or the bank cannot be loaded.
    pub fn new_game(&self) -> crate::Result<GameEngine> {
        self.validate()?;
        let bank = self.question_bank()?;
        let engine = match self.play.seed {
            Some(seed) => GameEngine::seeded(bank, self.game, seed)?,
            None => GameEngine::new(bank, self.game)?,
        };
        Ok(engine)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        self.game
            .validate()
            .map_err(|e| ConfigError::InvalidValue {
                key: "game".into(),
                message: e.to_string(),
            })?;
        if self.play.tick_ms == 0 {
            return Err(ConfigError::InvalidValue {
                key: "play.tick_ms".into(),
                message: "must be greater than zero".into(),
            });
        }
        Ok(())
    }
}
