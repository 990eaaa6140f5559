use std::path::PathBuf;

use clap::Subcommand;
use trivia_core::{Config, Difficulty, QuestionBank};

#[derive(Subcommand)]
pub enum BankAction {
    /// List the questions of one or all tiers
    List {
        /// Tier to list (easy, normal, hard); all tiers when omitted
        #[arg(long)]
        difficulty: Option<String>,
        /// Mark the correct answers
        #[arg(long)]
        answers: bool,
        /// Read a custom bank file instead of the configured one
        #[arg(long)]
        bank: Option<PathBuf>,
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Validate a custom bank file
    Check {
        /// Bank file (TOML)
        path: PathBuf,
    },
}

pub fn run(action: BankAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        BankAction::List {
            difficulty,
            answers,
            bank,
            json,
        } => {
            let tiers = match difficulty {
                Some(d) => vec![d.parse::<Difficulty>()?],
                None => Difficulty::ALL.to_vec(),
            };
            let mut config = Config::load_or_default();
            if bank.is_some() {
                config.play.bank_path = bank;
            }
            let bank = config.question_bank()?;

            if json {
                let mut listing = serde_json::Map::new();
                for tier in tiers {
                    listing.insert(tier.to_string(), serde_json::to_value(bank.get_tier(tier))?);
                }
                println!("{}", serde_json::to_string_pretty(&listing)?);
            } else {
                for tier in tiers {
                    print_tier(&bank, tier, answers);
                }
            }
        }
        BankAction::Check { path } => {
            let bank = QuestionBank::from_path(&path)?;
            println!(
                "ok: easy={} normal={} hard={}",
                bank.tier_len(Difficulty::Easy),
                bank.tier_len(Difficulty::Normal),
                bank.tier_len(Difficulty::Hard)
            );
        }
    }
    Ok(())
}

fn print_tier(bank: &QuestionBank, tier: Difficulty, answers: bool) {
    let questions = bank.get_tier(tier);
    println!("[{tier}] {} questions", questions.len());
    for (i, q) in questions.iter().enumerate() {
        println!("{:>3}. {}", i + 1, q.text);
        for option in &q.options {
            let marker = if answers && q.is_correct(option) { "*" } else { " " };
            println!("      {marker} {option}");
        }
    }
}
