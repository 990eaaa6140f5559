mod engine;
mod session;
mod timer;

pub use engine::{AnswerOutcome, GameEngine, Listener, ListenerId, TickOutcome};
pub use session::{GameSummary, RoundOutcome, RoundRecord};
pub use timer::{shared, RoundTimer, SharedEngine};
