//! Question bank: immutable question sets partitioned by difficulty tier.
//!
//! The bundled bank ships 15 questions per tier. Custom banks can be loaded
//! from a local TOML file:
//!
//! ```toml
//! [[easy]]
//! text = "What is 2 + 2?"
//! options = ["4", "3", "5", "6"]
//! correct_answer = "4"
//! ```
//!
//! Every question is validated on construction, so anything holding a
//! [`QuestionBank`] can rely on the invariants without re-checking.

mod builtin;

use std::collections::HashSet;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{BankError, SettingsError};

/// Number of answer options every question carries.
pub const OPTION_COUNT: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Normal,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Normal, Difficulty::Hard];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Normal => "normal",
            Difficulty::Hard => "hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = SettingsError;

    /// Case-insensitive. Anything outside the three tiers is rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "normal" => Ok(Difficulty::Normal),
            "hard" => Ok(Difficulty::Hard),
            _ => Err(SettingsError::UnknownDifficulty(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub text: String,
    pub options: [String; OPTION_COUNT],
    pub correct_answer: String,
}

impl Question {
    pub fn new(
        text: impl Into<String>,
        options: [&str; OPTION_COUNT],
        correct_answer: impl Into<String>,
    ) -> Self {
        Self {
            text: text.into(),
            options: options.map(String::from),
            correct_answer: correct_answer.into(),
        }
    }

    pub fn is_correct(&self, answer: &str) -> bool {
        self.correct_answer == answer
    }

    /// Check the question invariants, returning a description of the first violation.
    pub fn check(&self) -> Result<(), String> {
        if self.text.trim().is_empty() {
            return Err("question text is empty".into());
        }
        let mut seen = HashSet::new();
        for option in &self.options {
            if !seen.insert(option.as_str()) {
                return Err(format!("duplicate option '{option}'"));
            }
        }
        if !seen.contains(self.correct_answer.as_str()) {
            return Err(format!(
                "correct answer '{}' is not one of the options",
                self.correct_answer
            ));
        }
        Ok(())
    }
}

/// Fixed question sets for each difficulty tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionBank {
    easy: Vec<Question>,
    normal: Vec<Question>,
    hard: Vec<Question>,
}

impl QuestionBank {
    /// Build a bank, validating every question and rejecting empty tiers.
    ///
    /// # Errors
    /// Returns [`BankError::InvalidQuestion`] for the first question that
    /// breaks an invariant, or [`BankError::EmptyTier`].
    pub fn new(
        easy: Vec<Question>,
        normal: Vec<Question>,
        hard: Vec<Question>,
    ) -> Result<Self, BankError> {
        let bank = Self { easy, normal, hard };
        bank.validate()?;
        Ok(bank)
    }

    /// The bundled question set.
    pub fn builtin() -> Self {
        Self {
            easy: builtin::EASY.iter().map(to_question).collect(),
            normal: builtin::NORMAL.iter().map(to_question).collect(),
            hard: builtin::HARD.iter().map(to_question).collect(),
        }
    }

    /// Parse a custom bank from TOML text.
    ///
    /// # Errors
    /// Returns [`BankError::Parse`] on malformed TOML or a validation error.
    pub fn from_toml_str(content: &str) -> Result<Self, BankError> {
        let bank: QuestionBank = toml::from_str(content)?;
        bank.validate()?;
        Ok(bank)
    }

    /// Load a custom bank from a local TOML file.
    ///
    /// # Errors
    /// Returns [`BankError::Io`] if the file cannot be read, otherwise as
    /// [`QuestionBank::from_toml_str`].
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, BankError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| BankError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Full fixed question set for a tier. Order carries no meaning.
    pub fn get_tier(&self, difficulty: Difficulty) -> &[Question] {
        match difficulty {
            Difficulty::Easy => &self.easy,
            Difficulty::Normal => &self.normal,
            Difficulty::Hard => &self.hard,
        }
    }

    pub fn tier_len(&self, difficulty: Difficulty) -> usize {
        self.get_tier(difficulty).len()
    }

    fn validate(&self) -> Result<(), BankError> {
        for tier in Difficulty::ALL {
            let questions = self.get_tier(tier);
            if questions.is_empty() {
                return Err(BankError::EmptyTier(tier));
            }
            for (index, question) in questions.iter().enumerate() {
                question
                    .check()
                    .map_err(|reason| BankError::InvalidQuestion {
                        tier,
                        index,
                        reason,
                    })?;
            }
        }
        Ok(())
    }
}

impl Default for QuestionBank {
    fn default() -> Self {
        Self::builtin()
    }
}

fn to_question(entry: &builtin::Entry) -> Question {
    let (text, options, answer) = *entry;
    Question::new(text, options, answer)
}
