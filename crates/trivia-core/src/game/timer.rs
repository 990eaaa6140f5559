//! Periodic driver that feeds `tick()` into a shared engine.
//!
//! All engine operations go through one mutex, so ticks and answers arriving
//! from different tasks are serialized. A timer remembers the session
//! generation it was started for and stops without ticking once that session
//! is over or has been replaced.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use rand::Rng;
use rand_pcg::Mcg128Xsl64;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, warn};

use super::engine::{GameEngine, TickOutcome};

/// Engine handle shared between the presentation layer and the timer task.
pub type SharedEngine<R = Mcg128Xsl64> = Arc<Mutex<GameEngine<R>>>;

pub fn shared<R>(engine: GameEngine<R>) -> SharedEngine<R> {
    Arc::new(Mutex::new(engine))
}

/// Handle to a running round timer. Dropping it stops the timer.
#[derive(Debug)]
pub struct RoundTimer {
    handle: Option<JoinHandle<()>>,
    generation: u64,
}

impl RoundTimer {
    /// Start ticking `engine` every `period`, first tick one period from now.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn<R>(engine: SharedEngine<R>, period: Duration) -> Self
    where
        R: Rng + Send + 'static,
    {
        let period = period.max(Duration::from_millis(1));
        let generation = engine
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .generation();

        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            debug!(generation, ?period, "round timer started");

            loop {
                interval.tick().await;
                let keep_running = {
                    let mut engine = engine.lock().unwrap_or_else(PoisonError::into_inner);
                    tick_once(&mut *engine, generation)
                };
                if !keep_running {
                    break;
                }
            }
            debug!(generation, "round timer stopped");
        });

        Self {
            handle: Some(handle),
            generation,
        }
    }

    /// Session generation this timer drives.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().map_or(true, |h| h.is_finished())
    }

    /// Stop the timer. No tick is delivered after this returns.
    pub fn cancel(mut self) {
        self.abort();
    }

    /// Wait until the timer stops on its own.
    pub async fn join(mut self) {
        if let Some(handle) = self.handle.take() {
            if let Err(e) = handle.await {
                if !e.is_cancelled() {
                    warn!(error = %e, "round timer task failed");
                }
            }
        }
    }

    fn abort(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

impl Drop for RoundTimer {
    fn drop(&mut self) {
        self.abort();
    }
}

/// Deliver one tick. Returns false when the timer should stop.
fn tick_once<R: Rng>(engine: &mut GameEngine<R>, generation: u64) -> bool {
    if engine.generation() != generation {
        warn!(
            timer_generation = generation,
            engine_generation = engine.generation(),
            "stale round timer, stopping"
        );
        return false;
    }
    if engine.is_game_over() {
        return false;
    }
    match engine.tick() {
        Ok(TickOutcome::Expired { game_over, .. }) => !game_over,
        Ok(_) => true,
        Err(e) => {
            warn!(error = %e, "round timer tick rejected");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bank::{Difficulty, QuestionBank};
    use crate::settings::Settings;

    fn shared_engine(rounds: u32, time: u32) -> SharedEngine {
        shared(
            GameEngine::seeded(
                QuestionBank::builtin(),
                Settings::new(Difficulty::Easy, rounds, time),
                11,
            )
            .unwrap(),
        )
    }

    #[test]
    fn tick_once_stops_for_other_generation() {
        let engine = shared_engine(2, 5);
        let mut guard = engine.lock().unwrap();
        let generation = guard.generation();
        guard.restart();
        assert!(!tick_once(&mut *guard, generation));
        assert_eq!(guard.time_left(), 5);
    }

    #[test]
    fn tick_once_stops_after_final_expiry() {
        let engine = shared_engine(1, 2);
        let mut guard = engine.lock().unwrap();
        let generation = guard.generation();
        assert!(tick_once(&mut *guard, generation));
        assert!(!tick_once(&mut *guard, generation));
        assert!(guard.is_game_over());
        assert!(!tick_once(&mut *guard, generation));
    }

    #[tokio::test(start_paused = true)]
    async fn timer_plays_out_unanswered_game() {
        let engine = shared_engine(3, 2);
        let timer = RoundTimer::spawn(Arc::clone(&engine), Duration::from_secs(1));

        tokio::time::sleep(Duration::from_millis(6500)).await;

        assert!(timer.is_finished());
        let engine = engine.lock().unwrap();
        assert!(engine.is_game_over());
        assert_eq!(engine.score(), 0);
        assert_eq!(engine.summary().timed_out(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn join_returns_when_game_ends() {
        let engine = shared_engine(2, 1);
        let timer = RoundTimer::spawn(Arc::clone(&engine), Duration::from_secs(1));
        timer.join().await;
        assert!(engine.lock().unwrap().is_game_over());
    }

    #[tokio::test(start_paused = true)]
    async fn first_tick_waits_one_period() {
        let engine = shared_engine(2, 10);
        let _timer = RoundTimer::spawn(Arc::clone(&engine), Duration::from_secs(1));

        tokio::time::sleep(Duration::from_millis(500)).await;
        assert_eq!(engine.lock().unwrap().time_left(), 10);

        tokio::time::sleep(Duration::from_millis(1000)).await;
        assert_eq!(engine.lock().unwrap().time_left(), 9);
    }

    #[tokio::test(start_paused = true)]
    async fn reset_makes_running_timer_stale() {
        let engine = shared_engine(2, 10);
        let timer = RoundTimer::spawn(Arc::clone(&engine), Duration::from_secs(1));

        tokio::time::sleep(Duration::from_millis(1500)).await;
        assert_eq!(engine.lock().unwrap().time_left(), 9);

        engine.lock().unwrap().restart();
        tokio::time::sleep(Duration::from_secs(3)).await;

        assert!(timer.is_finished());
        assert_eq!(engine.lock().unwrap().time_left(), 10);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_stops_ticking() {
        let engine = shared_engine(2, 10);
        let timer = RoundTimer::spawn(Arc::clone(&engine), Duration::from_secs(1));

        tokio::time::sleep(Duration::from_millis(2500)).await;
        timer.cancel();
        tokio::time::sleep(Duration::from_secs(5)).await;

        assert_eq!(engine.lock().unwrap().time_left(), 8);
    }

    #[tokio::test(start_paused = true)]
    async fn answers_interleave_with_ticks() {
        let engine = shared_engine(2, 3);
        let _timer = RoundTimer::spawn(Arc::clone(&engine), Duration::from_secs(1));

        tokio::time::sleep(Duration::from_millis(2500)).await;
        {
            let mut guard = engine.lock().unwrap();
            assert_eq!(guard.time_left(), 1);
            let answer = guard.current_question().unwrap().correct_answer.clone();
            guard.answer_question(&answer).unwrap();
            assert_eq!(guard.current_index(), 1);
            assert_eq!(guard.time_left(), 3);
        }

        tokio::time::sleep(Duration::from_secs(3)).await;
        let guard = engine.lock().unwrap();
        assert!(guard.is_game_over());
        assert_eq!(guard.score(), 1);
    }
}
