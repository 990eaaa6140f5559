use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::bank::Difficulty;
use crate::settings::Settings;

/// Every state change in the engine produces an Event.
/// Listeners receive them synchronously; the presentation layer may also poll.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameEvent {
    /// A new session replaced the previous one.
    GameStarted {
        generation: u64,
        difficulty: Difficulty,
        /// Effective round count after clamping to the tier size.
        rounds: usize,
        time_per_round: u32,
        at: DateTime<Utc>,
    },
    SettingsUpdated {
        settings: Settings,
        at: DateTime<Utc>,
    },
    TimerTicked {
        round: usize,
        time_left: u32,
    },
    AnswerSubmitted {
        round: usize,
        answer: String,
        correct: bool,
        correct_answer: String,
        score: u32,
        at: DateTime<Utc>,
    },
    /// The countdown hit zero before an answer arrived.
    RoundTimedOut {
        round: usize,
        correct_answer: String,
        at: DateTime<Utc>,
    },
    RoundAdvanced {
        round: usize,
        time_left: u32,
        at: DateTime<Utc>,
    },
    GameOver {
        score: u32,
        rounds: usize,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        generation: u64,
        round: usize,
        rounds: usize,
        time_left: u32,
        score: u32,
        game_over: bool,
        question: Option<String>,
        options: Vec<String>,
        at: DateTime<Utc>,
    },
}

impl GameEvent {
    /// True for events after which the presentation layer shows a different question.
    pub fn changes_round(&self) -> bool {
        matches!(
            self,
            GameEvent::GameStarted { .. } | GameEvent::RoundAdvanced { .. } | GameEvent::GameOver { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_serialize_with_type_tag() {
        let event = GameEvent::TimerTicked {
            round: 2,
            time_left: 7,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "timer_ticked");
        assert_eq!(json["round"], 2);
        assert_eq!(json["time_left"], 7);
    }

    #[test]
    fn changes_round_only_for_round_boundaries() {
        let at = Utc::now();
        assert!(GameEvent::GameOver { score: 1, rounds: 2, at }.changes_round());
        assert!(GameEvent::RoundAdvanced { round: 1, time_left: 10, at }.changes_round());
        assert!(!GameEvent::TimerTicked { round: 0, time_left: 3 }.changes_round());
        assert!(!GameEvent::RoundTimedOut {
            round: 0,
            correct_answer: "4".into(),
            at
        }
        .changes_round());
    }
}
