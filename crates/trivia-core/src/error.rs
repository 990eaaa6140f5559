//! Core error types for trivia-core.
//!
//! Gameplay never produces user-facing errors: a wrong answer is normal
//! operation. Everything here is either a caller contract violation
//! ([`GameError`], [`SettingsError`]) or an I/O-adjacent failure while loading
//! a question bank or configuration file.

use std::path::PathBuf;
use thiserror::Error;

use crate::bank::Difficulty;

/// Core error type for trivia-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Game engine contract violations
    #[error("Game error: {0}")]
    Game(#[from] GameError),

    /// Question bank errors
    #[error("Question bank error: {0}")]
    Bank(#[from] BankError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Errors raised by the game engine.
///
/// Both variants indicate a bug in the presentation layer. Callers are
/// expected to check [`crate::GameEngine::is_game_over`] before answering or
/// ticking, and to validate settings input before applying it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    /// Operation invoked on a session that is already over.
    #[error("cannot {operation}: the game is already over")]
    InvalidState { operation: &'static str },

    /// Rejected settings update.
    #[error("invalid settings: {0}")]
    InvalidSettings(#[from] SettingsError),
}

/// Settings validation errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SettingsError {
    #[error("rounds must be greater than zero")]
    ZeroRounds,

    #[error("time per round must be greater than zero")]
    ZeroTimePerRound,

    /// Raw input outside the representable positive range
    #[error("'{field}' must be a positive integer, got {value}")]
    NonPositive { field: &'static str, value: i64 },

    #[error("unknown difficulty '{0}' (expected easy, normal or hard)")]
    UnknownDifficulty(String),
}

/// Question bank errors.
#[derive(Error, Debug)]
pub enum BankError {
    /// A question violates the bank invariants
    #[error("invalid question #{index} in {tier} tier: {reason}")]
    InvalidQuestion {
        tier: Difficulty,
        index: usize,
        reason: String,
    },

    #[error("the {0} tier has no questions")]
    EmptyTier(Difficulty),

    #[error("failed to parse question bank: {0}")]
    Parse(String),

    #[error("failed to read question bank at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    #[error("unknown config key: {0}")]
    UnknownKey(String),

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),
}

impl From<toml::de::Error> for BankError {
    fn from(err: toml::de::Error) -> Self {
        BankError::Parse(err.to_string())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
