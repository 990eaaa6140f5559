use serde::{Deserialize, Serialize};

use crate::bank::{Difficulty, Question};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundOutcome {
    Correct,
    Incorrect,
    TimedOut,
}

/// How a finished round went.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundRecord {
    pub round: usize,
    pub question: String,
    /// `None` when the round timed out.
    pub answer: Option<String>,
    pub correct_answer: String,
    pub outcome: RoundOutcome,
}

/// Mutable run-state for one playthrough, from reset to game over.
#[derive(Debug, Clone, Default)]
pub(crate) struct GameSession {
    pub(crate) active_questions: Vec<Question>,
    pub(crate) current_index: usize,
    pub(crate) time_left: u32,
    pub(crate) score: u32,
    pub(crate) history: Vec<RoundRecord>,
}

impl GameSession {
    pub(crate) fn new(active_questions: Vec<Question>, time_left: u32) -> Self {
        Self {
            active_questions,
            current_index: 0,
            time_left,
            score: 0,
            history: Vec::new(),
        }
    }

    /// Effective round count; may be below the requested count when the tier is smaller.
    pub(crate) fn rounds(&self) -> usize {
        self.active_questions.len()
    }

    pub(crate) fn is_over(&self) -> bool {
        self.current_index >= self.rounds()
    }

    pub(crate) fn current_question(&self) -> Option<&Question> {
        self.active_questions.get(self.current_index)
    }
}

/// Read-only view of a session for the results screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSummary {
    pub difficulty: Difficulty,
    pub score: u32,
    pub rounds: usize,
    pub game_over: bool,
    pub history: Vec<RoundRecord>,
}

impl GameSummary {
    /// Share of finished rounds answered correctly, 0.0 .. 1.0.
    pub fn accuracy(&self) -> f64 {
        if self.history.is_empty() {
            return 0.0;
        }
        self.score as f64 / self.history.len() as f64
    }

    pub fn timed_out(&self) -> usize {
        self.history
            .iter()
            .filter(|r| r.outcome == RoundOutcome::TimedOut)
            .count()
    }
}
