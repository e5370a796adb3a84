use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum GameKind {
    Pong,
    Snake,
    #[value(name = "tictactoe", alias = "ttt")]
    TicTacToe,
    Hangman,
}

/// Classic games in the terminal
#[derive(Debug, Parser)]
#[command(name = "termcade", version, about)]
pub struct Cli {
    /// Game to play
    #[arg(value_enum)]
    pub game: GameKind,

    /// Seed for food placement, AI tie-breaks, word choice and serves
    #[arg(long)]
    pub seed: Option<u64>,

    /// End each round after this many ticks
    #[arg(long, value_name = "TICKS")]
    pub max_ticks: Option<u64>,

    /// Pong only: the match ends when either side reaches this score
    #[arg(long, value_name = "POINTS")]
    pub pong_target: Option<u32>,

    /// Append tracing output to this file
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Play raw keystroke bytes from a file instead of the keyboard, rendering off-screen
    #[arg(long, value_name = "PATH")]
    pub replay: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub seed: u64,
    pub max_ticks: Option<u64>,
    pub pong_target: Option<u32>,
    /// How long the final screen stays up before exiting.
    pub game_over_hold: Duration,
    /// Sleep out each tick's budget. Off for replays and tests.
    pub throttle: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            seed: rand::random(),
            max_ticks: None,
            pong_target: None,
            game_over_hold: Duration::from_secs(2),
            throttle: true,
        }
    }
}

impl Config {
    pub fn from_cli(cli: &Cli) -> Self {
        let defaults = Config::default();
        let headless = cli.replay.is_some();
        Self {
            seed: cli.seed.unwrap_or(defaults.seed),
            max_ticks: cli.max_ticks,
            pong_target: cli.pong_target.filter(|&points| points > 0),
            game_over_hold: if headless {
                Duration::ZERO
            } else {
                defaults.game_over_hold
            },
            throttle: !headless,
        }
    }

    /// No sleeping anywhere, for scripted runs.
    pub fn unthrottled(seed: u64) -> Self {
        Self {
            seed,
            game_over_hold: Duration::ZERO,
            throttle: false,
            ..Config::default()
        }
    }
}
