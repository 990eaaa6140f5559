//! Terminal presentation layer.
//!
//! Answers come from a blocking stdin reader thread, ticks from a
//! [`RoundTimer`]; both reach the engine through the same mutex. Engine events
//! are forwarded into a channel by a listener and rendered from the main loop,
//! never from inside the listener.

use std::io::BufRead;
use std::path::PathBuf;
use std::sync::{Arc, PoisonError};
use std::time::Duration;

use clap::Args;
use tokio::sync::mpsc;
use tracing::debug;
use trivia_core::game::shared;
use trivia_core::{
    Config, GameEngine, GameEvent, GameSummary, RoundOutcome, RoundTimer, Settings, SharedEngine,
};

#[derive(Args)]
pub struct PlayArgs {
    /// Difficulty tier: easy, normal or hard
    #[arg(long)]
    difficulty: Option<String>,
    /// Number of rounds
    #[arg(long, allow_negative_numbers = true)]
    rounds: Option<i64>,
    /// Seconds per round
    #[arg(long, allow_negative_numbers = true)]
    time: Option<i64>,
    /// Seed for a reproducible question order
    #[arg(long)]
    seed: Option<u64>,
    /// Custom question bank file (TOML)
    #[arg(long)]
    bank: Option<PathBuf>,
    /// Milliseconds per timer tick
    #[arg(long)]
    tick_ms: Option<u64>,
    /// Print the final summary as JSON
    #[arg(long)]
    json: bool,
}

pub fn run(args: PlayArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = Config::load()?;

    config.game = Settings::from_raw(
        args.difficulty
            .as_deref()
            .unwrap_or(config.game.difficulty.as_str()),
        args.rounds.unwrap_or(i64::from(config.game.rounds)),
        args.time.unwrap_or(i64::from(config.game.time_per_round)),
    )?;
    if let Some(tick_ms) = args.tick_ms {
        config.play.tick_ms = tick_ms;
    }
    if args.seed.is_some() {
        config.play.seed = args.seed;
    }
    if args.bank.is_some() {
        config.play.bank_path = args.bank;
    }
    let engine = config.new_game()?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    let summary = runtime.block_on(play_game(engine, config.tick_period()))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print_summary(&summary);
    }
    Ok(())
}

async fn play_game(
    mut engine: GameEngine,
    period: Duration,
) -> Result<GameSummary, Box<dyn std::error::Error>> {
    let (event_tx, mut events) = mpsc::unbounded_channel();
    engine.subscribe(Box::new(move |event: &GameEvent| {
        // Receiver only goes away once the game loop has returned.
        let _ = event_tx.send(event.clone());
    }));

    let engine = shared(engine);
    let mut lines = spawn_stdin_reader();
    let mut stdin_open = true;

    render_round(&engine);
    let timer = RoundTimer::spawn(Arc::clone(&engine), period);

    loop {
        tokio::select! {
            event = events.recv() => {
                let Some(event) = event else { break };
                if render_event(&engine, &event) {
                    break;
                }
            }
            line = lines.recv(), if stdin_open => match line {
                Some(line) => submit_answer(&engine, &line),
                None => {
                    debug!("stdin closed, remaining rounds will time out");
                    stdin_open = false;
                }
            },
        }
    }

    timer.cancel();
    let summary = engine
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .summary();
    Ok(summary)
}

fn spawn_stdin_reader() -> mpsc::UnboundedReceiver<String> {
    let (tx, rx) = mpsc::unbounded_channel();
    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(line).is_err() {
                break;
            }
        }
    });
    rx
}

/// Map a typed line to an option: `1`-`4`, or the option text in any case.
fn resolve_answer(options: &[String], input: &str) -> String {
    if let Ok(n) = input.parse::<usize>() {
        if let Some(option) = n.checked_sub(1).and_then(|i| options.get(i)) {
            return option.clone();
        }
    }
    options
        .iter()
        .find(|o| o.eq_ignore_ascii_case(input))
        .cloned()
        .unwrap_or_else(|| input.to_string())
}

fn submit_answer(engine: &SharedEngine, line: &str) {
    let input = line.trim();
    if input.is_empty() {
        return;
    }
    let mut engine = engine.lock().unwrap_or_else(PoisonError::into_inner);
    if engine.is_game_over() {
        return;
    }
    let Some(question) = engine.current_question() else {
        return;
    };
    let answer = resolve_answer(&question.options, input);
    if let Err(e) = engine.answer_question(&answer) {
        debug!(error = %e, "answer dropped");
    }
}

/// Returns true once the game is over.
fn render_event(engine: &SharedEngine, event: &GameEvent) -> bool {
    match event {
        GameEvent::TimerTicked { time_left, .. } => {
            if *time_left > 0 && (*time_left <= 3 || time_left % 5 == 0) {
                println!("  {time_left}s left");
            }
        }
        GameEvent::AnswerSubmitted {
            correct,
            correct_answer,
            ..
        } => {
            if *correct {
                println!("Correct!");
            } else {
                println!("Wrong! The answer was: {correct_answer}");
            }
        }
        GameEvent::RoundTimedOut { correct_answer, .. } => {
            println!("Time's up! The answer was: {correct_answer}");
        }
        GameEvent::RoundAdvanced { .. } => render_round(engine),
        GameEvent::GameOver { .. } => return true,
        _ => {}
    }
    false
}

fn render_round(engine: &SharedEngine) {
    let engine = engine.lock().unwrap_or_else(PoisonError::into_inner);
    let Some(question) = engine.current_question() else {
        return;
    };
    println!();
    println!(
        "Question {}/{}  (score {}, {}s)",
        engine.current_index() + 1,
        engine.rounds(),
        engine.score(),
        engine.time_left()
    );
    println!("{}", question.text);
    for (i, option) in question.options.iter().enumerate() {
        println!("  {}) {option}", i + 1);
    }
}

fn print_summary(summary: &GameSummary) {
    println!();
    println!("Game over!");
    println!(
        "Final score: {}/{} ({:.0}%)",
        summary.score,
        summary.rounds,
        summary.accuracy() * 100.0
    );
    for record in &summary.history {
        let verdict = match record.outcome {
            RoundOutcome::Correct => "correct".to_string(),
            RoundOutcome::Incorrect => format!("wrong, answer: {}", record.correct_answer),
            RoundOutcome::TimedOut => format!("timed out, answer: {}", record.correct_answer),
        };
        println!("  {}. {} ({verdict})", record.round + 1, record.question);
    }
}
