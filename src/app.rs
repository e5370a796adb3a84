use std::fmt;

use anyhow::{Context, Result};
use ratatui::backend::Backend;
use ratatui::Terminal;
use tracing::info;

use crate::config::{Config, GameKind};
use crate::games::hangman::Hangman;
use crate::games::pong::Pong;
use crate::games::snake::Snake;
use crate::games::tictactoe::TicTacToe;
use crate::games::Game;
use crate::input::InputSource;
use crate::scheduler::FrameScheduler;
use crate::session::{EndReason, GameSession, Phase};
use crate::ui;

/// What the binary prints once the terminal is restored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub game: &'static str,
    pub end: Option<EndReason>,
    pub rounds: u32,
    /// Ticks played in the last round.
    pub ticks: u64,
    pub summary: String,
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.end {
            Some(end) => write!(
                f,
                "{} ({} after {} ticks): {}",
                self.game, end, self.ticks, self.summary
            ),
            None => write!(f, "{}: {}", self.game, self.summary),
        }
    }
}

pub fn launch<I, B>(kind: GameKind, config: &Config, input: &mut I, terminal: &mut Terminal<B>) -> Result<Report>
where
    I: InputSource,
    B: Backend,
{
    info!(game = ?kind, seed = config.seed, "launching");
    match kind {
        GameKind::Pong => play(Pong::new(config.seed, config.pong_target), config, input, terminal),
        GameKind::Snake => play(Snake::new(config.seed), config, input, terminal),
        GameKind::TicTacToe => play(TicTacToe::new(config.seed), config, input, terminal),
        GameKind::Hangman => play(Hangman::new(config.seed), config, input, terminal),
    }
}

/// Drive one game through title, rounds and the game-over screen until exit.
pub fn play<G, I, B>(game: G, config: &Config, input: &mut I, terminal: &mut Terminal<B>) -> Result<Report>
where
    G: Game,
    I: InputSource,
    B: Backend,
{
    let pacing = if config.throttle {
        game.pacing()
    } else {
        game.pacing().unthrottled()
    };
    let scheduler = FrameScheduler::new(pacing, config.max_ticks);
    let mut session = GameSession::new(game);

    terminal
        .draw(|frame| ui::render(frame, &session))
        .context("failed to draw title screen")?;
    session.await_start(input);

    loop {
        scheduler
            .run_loop(&mut session, input, terminal)
            .context("failed to draw game frame")?;
        terminal
            .draw(|frame| ui::render(frame, &session))
            .context("failed to draw game-over screen")?;
        if session.resolve_game_over(input, config.game_over_hold) == Phase::Exit {
            break;
        }
    }

    Ok(Report {
        game: session.game().name(),
        end: session.end_reason(),
        rounds: session.rounds(),
        ticks: session.ticks(),
        summary: session.game().summary(),
    })
}
