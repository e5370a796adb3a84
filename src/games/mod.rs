pub mod hangman;
pub mod pong;
pub mod snake;
pub mod tictactoe;

use ratatui::prelude::*;

use crate::input::KeyEvent;
use crate::scheduler::Pacing;

/// Outcome of a round, from the human player's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Running,
    Won,
    Lost,
    Tie,
}

impl Status {
    pub fn is_terminal(self) -> bool {
        self != Status::Running
    }
}

pub trait Game {
    /// Read-only snapshot handed to the renderer.
    type State;

    fn name(&self) -> &'static str;
    fn banner(&self) -> &'static [&'static str];
    fn pacing(&self) -> Pacing;
    /// Consume the resolved key for this tick (possibly `KeyEvent::None`) and advance.
    fn update(&mut self, key: KeyEvent) -> Status;
    fn status(&self) -> Status;
    fn state(&self) -> &Self::State;
    fn render(&self, frame: &mut Frame, area: Rect);
    /// Start a fresh round. State that outlives a round (tallies) is kept.
    fn reset(&mut self);
    /// One-line result shown on the game-over screen and printed on exit.
    fn summary(&self) -> String;
    fn controls(&self) -> &'static str;

    fn is_game_over(&self) -> bool {
        self.status().is_terminal()
    }

    fn offers_replay(&self) -> bool {
        false
    }
}
