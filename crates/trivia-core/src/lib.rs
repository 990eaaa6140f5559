//! # Trivia Core Library
//!
//! This library provides the game-state engine for a single-player timed
//! trivia quiz. Presentation layers (the bundled CLI, or any GUI) call into it
//! and re-read state after every mutating call.
//!
//! ## Architecture
//!
//! - **Question Bank**: immutable, validated question sets per difficulty tier
//! - **Game Engine**: a tick-driven state machine that requires the caller to
//!   invoke `tick()` once per second while a round is running
//! - **Round Timer**: a tokio interval task that drives `tick()` on a shared,
//!   mutex-serialized engine and stops itself when the session ends or is
//!   replaced
//! - **Config**: TOML-based default settings and play options
//!
//! ## Key Components
//!
//! - [`GameEngine`]: Core game state machine
//! - [`QuestionBank`]: Question sets by [`Difficulty`]
//! - [`Settings`]: Difficulty, round count and seconds per round
//! - [`RoundTimer`]: Per-second driver for a [`SharedEngine`]
//! - [`GameEvent`]: Everything the engine reports to listeners

pub mod bank;
pub mod config;
pub mod error;
pub mod events;
pub mod game;
pub mod settings;

pub use bank::{Difficulty, Question, QuestionBank};
pub use config::Config;
pub use error::{BankError, ConfigError, CoreError, GameError, Result, SettingsError};
pub use events::GameEvent;
pub use game::{
    AnswerOutcome, GameEngine, GameSummary, ListenerId, RoundOutcome, RoundRecord, RoundTimer,
    SharedEngine, TickOutcome,
};
pub use settings::Settings;
