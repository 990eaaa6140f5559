//! Game engine implementation.
//!
//! The engine is a single-threaded state machine over one [`GameSession`].
//! It does not use internal threads or timers: a driver (see
//! [`super::RoundTimer`]) is responsible for calling `tick()` once per second
//! while the session is active.
//!
//! ## State Transitions
//!
//! ```text
//! Active(0) -> Active(1) -> ... -> Active(rounds - 1) -> Over
//! ```
//!
//! Each arrow is either an answer or a countdown expiry. `Over` is left only
//! through `reset_game` or `update_settings`.
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = GameEngine::new(QuestionBank::builtin(), Settings::default())?;
//! while !engine.is_game_over() {
//!     // either
//!     engine.answer_question(&choice)?;
//!     // or, once per second
//!     engine.tick()?;
//! }
//! ```

use std::fmt;

use chrono::Utc;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_pcg::Mcg128Xsl64;
use tracing::{debug, info, warn};

use super::session::{GameSession, GameSummary, RoundOutcome, RoundRecord};
use crate::bank::{Question, QuestionBank};
use crate::error::GameError;
use crate::events::GameEvent;
use crate::settings::Settings;

/// Callback invoked for every [`GameEvent`].
///
/// Listeners run while the engine is borrowed mutably and must not call
/// back into it.
pub type Listener = Box<dyn FnMut(&GameEvent) + Send>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Result of a successful `answer_question`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerOutcome {
    pub round: usize,
    pub correct: bool,
    pub correct_answer: String,
    pub game_over: bool,
}

/// Result of a successful `tick`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// Countdown decremented, round still running.
    Counting { time_left: u32 },
    /// Countdown reached zero and the round advanced as a miss.
    Expired {
        round: usize,
        correct_answer: String,
        game_over: bool,
    },
    /// The countdown was already at zero; nothing changed.
    Ignored,
}

/// Core game engine.
///
/// Generic over the random source so tests can inject a seeded generator.
pub struct GameEngine<R = Mcg128Xsl64> {
    bank: QuestionBank,
    settings: Settings,
    session: GameSession,
    rng: R,
    generation: u64,
    listeners: Vec<(ListenerId, Listener)>,
    next_listener_id: u64,
}

impl GameEngine<Mcg128Xsl64> {
    /// Create an engine seeded from OS entropy and start the first session.
    ///
    /// # Errors
    /// Returns [`GameError::InvalidSettings`] if `settings` fail validation.
    pub fn new(bank: QuestionBank, settings: Settings) -> Result<Self, GameError> {
        Self::with_rng(bank, settings, Mcg128Xsl64::from_entropy())
    }

    /// Create an engine with a reproducible question order.
    ///
    /// # Errors
    /// Returns [`GameError::InvalidSettings`] if `settings` fail validation.
    pub fn seeded(bank: QuestionBank, settings: Settings, seed: u64) -> Result<Self, GameError> {
        Self::with_rng(bank, settings, Mcg128Xsl64::seed_from_u64(seed))
    }
}

impl<R: Rng> GameEngine<R> {
    /// # Errors
    /// Returns [`GameError::InvalidSettings`] if `settings` fail validation.
    pub fn with_rng(bank: QuestionBank, settings: Settings, rng: R) -> Result<Self, GameError> {
        let mut engine = Self {
            bank,
            settings,
            session: GameSession::default(),
            rng,
            generation: 0,
            listeners: Vec::new(),
            next_listener_id: 0,
        };
        engine.reset_game(settings)?;
        Ok(engine)
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn bank(&self) -> &QuestionBank {
        &self.bank
    }

    /// Identifies the current session; bumped by every reset.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.session.current_question()
    }

    pub fn current_index(&self) -> usize {
        self.session.current_index
    }

    pub fn time_left(&self) -> u32 {
        self.session.time_left
    }

    pub fn score(&self) -> u32 {
        self.session.score
    }

    /// Effective number of rounds in this session.
    pub fn rounds(&self) -> usize {
        self.session.rounds()
    }

    pub fn active_questions(&self) -> &[Question] {
        &self.session.active_questions
    }

    pub fn history(&self) -> &[RoundRecord] {
        &self.session.history
    }

    pub fn is_game_over(&self) -> bool {
        self.session.is_over()
    }

    pub fn summary(&self) -> GameSummary {
        GameSummary {
            difficulty: self.settings.difficulty,
            score: self.session.score,
            rounds: self.session.rounds(),
            game_over: self.is_game_over(),
            history: self.session.history.clone(),
        }
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self) -> GameEvent {
        let question = self.current_question();
        GameEvent::StateSnapshot {
            generation: self.generation,
            round: self.session.current_index,
            rounds: self.session.rounds(),
            time_left: self.session.time_left,
            score: self.session.score,
            game_over: self.is_game_over(),
            question: question.map(|q| q.text.clone()),
            options: question.map(|q| q.options.to_vec()).unwrap_or_default(),
            at: Utc::now(),
        }
    }

    // ── Listeners ────────────────────────────────────────────────────

    pub fn subscribe(&mut self, listener: Listener) -> ListenerId {
        let id = ListenerId(self.next_listener_id);
        self.next_listener_id += 1;
        self.listeners.push((id, listener));
        id
    }

    /// Returns false if the id was not registered.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(existing, _)| *existing != id);
        self.listeners.len() != before
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Replace the current session with a fresh one built from `settings`.
    ///
    /// Draws `min(rounds, tier size)` distinct questions, shuffles their order
    /// and each question's options, and resets index, score and countdown.
    ///
    /// # Errors
    /// Returns [`GameError::InvalidSettings`] and leaves the engine untouched
    /// if `settings` fail validation.
    pub fn reset_game(&mut self, settings: Settings) -> Result<(), GameError> {
        settings.validate()?;
        self.settings = settings;

        let questions = self.select_questions();
        self.session = GameSession::new(questions, settings.time_per_round);
        self.generation += 1;

        info!(
            generation = self.generation,
            difficulty = %settings.difficulty,
            rounds = self.session.rounds(),
            time_per_round = settings.time_per_round,
            "game started"
        );
        self.emit(GameEvent::GameStarted {
            generation: self.generation,
            difficulty: settings.difficulty,
            rounds: self.session.rounds(),
            time_per_round: settings.time_per_round,
            at: Utc::now(),
        });
        Ok(())
    }

    /// Start over with the current settings.
    pub fn restart(&mut self) {
        // Stored settings were validated when they were applied.
        let settings = self.settings;
        if let Err(e) = self.reset_game(settings) {
            warn!(error = %e, "stored settings rejected on restart");
        }
    }

    /// Validate and store new settings, then reset the game.
    ///
    /// # Errors
    /// Returns [`GameError::InvalidSettings`]; the running session is kept.
    pub fn update_settings(&mut self, settings: Settings) -> Result<(), GameError> {
        settings.validate()?;
        debug!(?settings, "settings updated");
        self.emit(GameEvent::SettingsUpdated {
            settings,
            at: Utc::now(),
        });
        self.reset_game(settings)
    }

    /// Submit an answer for the current round. Always advances the round.
    ///
    /// # Errors
    /// Returns [`GameError::InvalidState`] if the game is already over.
    pub fn answer_question(&mut self, answer: &str) -> Result<AnswerOutcome, GameError> {
        let question = self.current_question().ok_or(GameError::InvalidState {
            operation: "answer a question",
        })?;
        let correct = question.is_correct(answer);
        let correct_answer = question.correct_answer.clone();
        let question_text = question.text.clone();
        let round = self.session.current_index;

        if correct {
            self.session.score += 1;
        }
        self.session.history.push(RoundRecord {
            round,
            question: question_text,
            answer: Some(answer.to_string()),
            correct_answer: correct_answer.clone(),
            outcome: if correct {
                RoundOutcome::Correct
            } else {
                RoundOutcome::Incorrect
            },
        });

        debug!(round, correct, score = self.session.score, "answer submitted");
        self.emit(GameEvent::AnswerSubmitted {
            round,
            answer: answer.to_string(),
            correct,
            correct_answer: correct_answer.clone(),
            score: self.session.score,
            at: Utc::now(),
        });

        let game_over = self.advance_round();
        Ok(AnswerOutcome {
            round,
            correct,
            correct_answer,
            game_over,
        })
    }

    /// Call once per elapsed second. Expiry advances the round as a miss.
    ///
    /// # Errors
    /// Returns [`GameError::InvalidState`] if the game is already over.
    pub fn tick(&mut self) -> Result<TickOutcome, GameError> {
        if self.is_game_over() {
            return Err(GameError::InvalidState {
                operation: "tick the round timer",
            });
        }
        if self.session.time_left == 0 {
            return Ok(TickOutcome::Ignored);
        }

        self.session.time_left -= 1;
        let round = self.session.current_index;
        let time_left = self.session.time_left;
        self.emit(GameEvent::TimerTicked { round, time_left });
        if time_left > 0 {
            return Ok(TickOutcome::Counting { time_left });
        }

        let (question_text, correct_answer) = match self.current_question() {
            Some(q) => (q.text.clone(), q.correct_answer.clone()),
            None => return Ok(TickOutcome::Ignored),
        };
        self.session.history.push(RoundRecord {
            round,
            question: question_text,
            answer: None,
            correct_answer: correct_answer.clone(),
            outcome: RoundOutcome::TimedOut,
        });
        debug!(round, "round timed out");
        self.emit(GameEvent::RoundTimedOut {
            round,
            correct_answer: correct_answer.clone(),
            at: Utc::now(),
        });

        let game_over = self.advance_round();
        Ok(TickOutcome::Expired {
            round,
            correct_answer,
            game_over,
        })
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn select_questions(&mut self) -> Vec<Question> {
        let difficulty = self.settings.difficulty;
        let mut selected = self.bank.get_tier(difficulty).to_vec();
        let wanted = self.settings.rounds as usize;
        if wanted > selected.len() {
            warn!(
                %difficulty,
                requested = wanted,
                available = selected.len(),
                "more rounds requested than questions available, clamping"
            );
        }

        selected.shuffle(&mut self.rng);
        selected.truncate(wanted);
        for question in &mut selected {
            question.options.shuffle(&mut self.rng);
        }
        selected
    }

    /// Move to the next round. Returns true when this ended the game.
    ///
    /// The countdown is reset for a new round; after the final round it is
    /// left as is.
    fn advance_round(&mut self) -> bool {
        let rounds = self.session.rounds();
        if self.session.current_index + 1 < rounds {
            self.session.current_index += 1;
            self.session.time_left = self.settings.time_per_round;
            self.emit(GameEvent::RoundAdvanced {
                round: self.session.current_index,
                time_left: self.session.time_left,
                at: Utc::now(),
            });
            false
        } else {
            self.session.current_index = rounds;
            info!(
                generation = self.generation,
                score = self.session.score,
                rounds,
                "game over"
            );
            self.emit(GameEvent::GameOver {
                score: self.session.score,
                rounds,
                at: Utc::now(),
            });
            true
        }
    }

    fn emit(&mut self, event: GameEvent) {
        for (_, listener) in self.listeners.iter_mut() {
            listener(&event);
        }
    }
}

impl<R> fmt::Debug for GameEngine<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GameEngine")
            .field("settings", &self.settings)
            .field("session", &self.session)
            .field("generation", &self.generation)
            .field("listeners", &self.listeners.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::bank::Difficulty;

    fn engine(difficulty: Difficulty, rounds: u32, time: u32) -> GameEngine {
        GameEngine::seeded(
            QuestionBank::builtin(),
            Settings::new(difficulty, rounds, time),
            7,
        )
        .unwrap()
    }

    fn correct(engine: &GameEngine) -> String {
        engine.current_question().unwrap().correct_answer.clone()
    }

    fn wrong(engine: &GameEngine) -> String {
        let q = engine.current_question().unwrap();
        q.options
            .iter()
            .find(|o| **o != q.correct_answer)
            .unwrap()
            .clone()
    }

    #[test]
    fn reset_selects_requested_number_of_rounds() {
        for difficulty in Difficulty::ALL {
            let engine = engine(difficulty, 5, 10);
            assert_eq!(engine.active_questions().len(), 5);
            assert_eq!(engine.rounds(), 5);
            assert_eq!(engine.current_index(), 0);
            assert_eq!(engine.score(), 0);
            assert_eq!(engine.time_left(), 10);
        }
    }

    #[test]
    fn reset_clamps_rounds_to_tier_size() {
        let mut engine = engine(Difficulty::Easy, 5, 10);
        engine
            .update_settings(Settings::new(Difficulty::Hard, 20, 15))
            .unwrap();
        assert_eq!(engine.active_questions().len(), 15);
        assert_eq!(engine.rounds(), 15);
        assert_eq!(engine.settings().rounds, 20);
        assert_eq!(engine.time_left(), 15);
    }

    #[test]
    fn selection_has_no_duplicates_and_options_are_permutations() {
        let engine = engine(Difficulty::Normal, 15, 10);
        let bank = QuestionBank::builtin();
        let texts: HashSet<_> = engine.active_questions().iter().map(|q| &q.text).collect();
        assert_eq!(texts.len(), 15);

        for q in engine.active_questions() {
            let original = bank
                .get_tier(Difficulty::Normal)
                .iter()
                .find(|o| o.text == q.text)
                .unwrap();
            let mut shuffled = q.options.to_vec();
            let mut expected = original.options.to_vec();
            shuffled.sort();
            expected.sort();
            assert_eq!(shuffled, expected);
            assert!(q.options.contains(&q.correct_answer));
        }
    }

    #[test]
    fn same_seed_gives_same_session() {
        let a = engine(Difficulty::Hard, 6, 10);
        let b = engine(Difficulty::Hard, 6, 10);
        assert_eq!(a.active_questions(), b.active_questions());
    }

    #[test]
    fn all_correct_answers_score_every_round() {
        let mut engine = engine(Difficulty::Easy, 5, 10);
        for round in 0..5 {
            assert!(!engine.is_game_over());
            let outcome = engine.answer_question(&correct(&engine)).unwrap();
            assert!(outcome.correct);
            assert_eq!(outcome.round, round);
            assert_eq!(outcome.game_over, round == 4);
        }
        assert_eq!(engine.score(), 5);
        assert!(engine.is_game_over());
        assert!(engine.current_question().is_none());
    }

    #[test]
    fn wrong_answer_advances_without_scoring() {
        let mut engine = engine(Difficulty::Easy, 3, 10);
        engine.tick().unwrap();
        let outcome = engine.answer_question(&wrong(&engine)).unwrap();
        assert!(!outcome.correct);
        assert_eq!(engine.score(), 0);
        assert_eq!(engine.current_index(), 1);
        assert_eq!(engine.time_left(), 10);
    }

    #[test]
    fn answer_comparison_is_exact() {
        let mut engine = engine(Difficulty::Easy, 2, 10);
        let answer = format!(" {}", correct(&engine));
        assert!(!engine.answer_question(&answer).unwrap().correct);
        assert_eq!(engine.score(), 0);
    }

    #[test]
    fn ten_ticks_advance_exactly_one_round() {
        let mut engine = engine(Difficulty::Easy, 5, 10);
        for _ in 0..9 {
            assert!(matches!(engine.tick().unwrap(), TickOutcome::Counting { .. }));
        }
        assert_eq!(engine.time_left(), 1);
        match engine.tick().unwrap() {
            TickOutcome::Expired { round, game_over, .. } => {
                assert_eq!(round, 0);
                assert!(!game_over);
            }
            other => panic!("Expected Expired, got {other:?}"),
        }
        assert_eq!(engine.current_index(), 1);
        assert_eq!(engine.time_left(), 10);
        assert_eq!(engine.score(), 0);
    }

    #[test]
    fn timeout_on_last_round_ends_game_and_keeps_timer_at_zero() {
        let mut engine = engine(Difficulty::Easy, 1, 2);
        engine.tick().unwrap();
        let outcome = engine.tick().unwrap();
        assert!(matches!(outcome, TickOutcome::Expired { game_over: true, .. }));
        assert!(engine.is_game_over());
        assert_eq!(engine.time_left(), 0);
        assert_eq!(engine.current_index(), 1);
    }

    #[test]
    fn answer_on_last_round_leaves_timer_as_is() {
        let mut engine = engine(Difficulty::Easy, 1, 10);
        engine.tick().unwrap();
        engine.tick().unwrap();
        engine.answer_question(&correct(&engine)).unwrap();
        assert!(engine.is_game_over());
        assert_eq!(engine.time_left(), 8);
    }

    #[test]
    fn operations_after_game_over_are_invalid_state() {
        let mut engine = engine(Difficulty::Easy, 1, 10);
        engine.answer_question("anything").unwrap();
        assert!(engine.is_game_over());

        assert!(matches!(
            engine.answer_question("again"),
            Err(GameError::InvalidState { .. })
        ));
        assert!(matches!(engine.tick(), Err(GameError::InvalidState { .. })));
        assert_eq!(engine.current_index(), 1);
        assert_eq!(engine.history().len(), 1);
    }

    #[test]
    fn game_over_is_idempotent_until_reset() {
        let mut engine = engine(Difficulty::Easy, 1, 10);
        engine.answer_question("x").unwrap();
        for _ in 0..3 {
            assert!(engine.is_game_over());
        }
        engine.restart();
        assert!(!engine.is_game_over());
        assert_eq!(engine.current_index(), 0);
    }

    #[test]
    fn update_settings_rejects_invalid_values_and_keeps_session() {
        let mut engine = engine(Difficulty::Easy, 3, 10);
        engine.answer_question("x").unwrap();
        let generation = engine.generation();

        let err = engine
            .update_settings(Settings::new(Difficulty::Hard, 0, 10))
            .unwrap_err();
        assert!(matches!(err, GameError::InvalidSettings(_)));
        let err = engine
            .update_settings(Settings::new(Difficulty::Hard, 5, 0))
            .unwrap_err();
        assert!(matches!(err, GameError::InvalidSettings(_)));

        assert_eq!(engine.generation(), generation);
        assert_eq!(engine.current_index(), 1);
        assert_eq!(engine.settings().difficulty, Difficulty::Easy);
    }

    #[test]
    fn constructor_rejects_invalid_settings() {
        let result = GameEngine::seeded(
            QuestionBank::builtin(),
            Settings::new(Difficulty::Easy, 0, 10),
            1,
        );
        assert!(matches!(result, Err(GameError::InvalidSettings(_))));
    }

    #[test]
    fn reset_replaces_the_session() {
        let mut engine = engine(Difficulty::Easy, 3, 10);
        engine.answer_question(&correct(&engine)).unwrap();
        engine.tick().unwrap();
        let generation = engine.generation();

        engine.reset_game(Settings::new(Difficulty::Normal, 4, 20)).unwrap();
        assert_eq!(engine.generation(), generation + 1);
        assert_eq!(engine.score(), 0);
        assert_eq!(engine.current_index(), 0);
        assert_eq!(engine.time_left(), 20);
        assert_eq!(engine.rounds(), 4);
        assert!(engine.history().is_empty());
    }

    #[test]
    fn history_records_every_outcome() {
        let mut engine = engine(Difficulty::Normal, 3, 1);
        engine.answer_question(&correct(&engine)).unwrap();
        engine.answer_question(&wrong(&engine)).unwrap();
        engine.tick().unwrap();

        let outcomes: Vec<_> = engine.history().iter().map(|r| r.outcome).collect();
        assert_eq!(
            outcomes,
            vec![
                RoundOutcome::Correct,
                RoundOutcome::Incorrect,
                RoundOutcome::TimedOut
            ]
        );
        assert!(engine.history()[2].answer.is_none());

        let summary = engine.summary();
        assert_eq!(summary.score, 1);
        assert!(summary.game_over);
        assert_eq!(summary.timed_out(), 1);
    }

    #[test]
    fn listeners_receive_events_in_order() {
        let mut engine = engine(Difficulty::Easy, 2, 2);
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        engine.subscribe(Box::new(move |event: &GameEvent| {
            let name = serde_json::to_value(event).unwrap()["type"]
                .as_str()
                .unwrap()
                .to_string();
            sink.lock().unwrap().push(name);
        }));

        engine.answer_question(&correct(&engine)).unwrap();
        engine.tick().unwrap();
        engine.tick().unwrap();

        assert_eq!(
            *seen.lock().unwrap(),
            vec![
                "answer_submitted",
                "round_advanced",
                "timer_ticked",
                "timer_ticked",
                "round_timed_out",
                "game_over",
            ]
        );
    }

    #[test]
    fn update_settings_emits_settings_then_start() {
        let mut engine = engine(Difficulty::Easy, 2, 2);
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        engine.subscribe(Box::new(move |event: &GameEvent| {
            sink.lock().unwrap().push(event.clone());
        }));
        engine
            .update_settings(Settings::new(Difficulty::Hard, 3, 5))
            .unwrap();

        let events = seen.lock().unwrap();
        assert_eq!(events.len(), 2);
        assert!(matches!(events[0], GameEvent::SettingsUpdated { .. }));
        match &events[1] {
            GameEvent::GameStarted {
                difficulty, rounds, ..
            } => {
                assert_eq!(*difficulty, Difficulty::Hard);
                assert_eq!(*rounds, 3);
            }
            other => panic!("Expected GameStarted, got {other:?}"),
        }
    }

    #[test]
    fn unsubscribe_stops_delivery() {
        let mut engine = engine(Difficulty::Easy, 3, 10);
        let count = Arc::new(Mutex::new(0));
        let sink = Arc::clone(&count);
        let id = engine.subscribe(Box::new(move |_: &GameEvent| *sink.lock().unwrap() += 1));

        engine.tick().unwrap();
        assert!(engine.unsubscribe(id));
        assert!(!engine.unsubscribe(id));
        engine.tick().unwrap();

        assert_eq!(*count.lock().unwrap(), 1);
    }

    #[test]
    fn snapshot_reflects_state() {
        let mut engine = engine(Difficulty::Easy, 2, 10);
        engine.tick().unwrap();
        match engine.snapshot() {
            GameEvent::StateSnapshot {
                round,
                rounds,
                time_left,
                question,
                options,
                game_over,
                ..
            } => {
                assert_eq!(round, 0);
                assert_eq!(rounds, 2);
                assert_eq!(time_left, 9);
                assert!(question.is_some());
                assert_eq!(options.len(), 4);
                assert!(!game_over);
            }
            other => panic!("Expected StateSnapshot, got {other:?}"),
        }
    }
}
