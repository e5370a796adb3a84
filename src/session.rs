//! Title → Playing → GameOver → {Restart | Exit} state machine around one game.

use std::fmt;
use std::thread;
use std::time::Duration;

use tracing::{info, warn};

use crate::games::{Game, Status};
use crate::input::{InputSource, KeyEvent};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Title,
    Playing,
    GameOver,
    Exit,
}

/// Why the last round stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndReason {
    Finished(Status),
    Quit,
    TimedOut,
    /// The input source closed mid-round.
    InputClosed,
}

impl fmt::Display for EndReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EndReason::Finished(Status::Won) => write!(f, "won"),
            EndReason::Finished(Status::Lost) => write!(f, "lost"),
            EndReason::Finished(Status::Tie) => write!(f, "tie"),
            EndReason::Finished(Status::Running) => write!(f, "running"),
            EndReason::Quit => write!(f, "quit"),
            EndReason::TimedOut => write!(f, "timed out"),
            EndReason::InputClosed => write!(f, "input closed"),
        }
    }
}

pub struct GameSession<G: Game> {
    game: G,
    phase: Phase,
    end: Option<EndReason>,
    rounds: u32,
    ticks: u64,
}

impl<G: Game> GameSession<G> {
    pub fn new(game: G) -> Self {
        Self {
            game,
            phase: Phase::Title,
            end: None,
            rounds: 0,
            ticks: 0,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn game(&self) -> &G {
        &self.game
    }

    pub fn end_reason(&self) -> Option<EndReason> {
        self.end
    }

    /// Rounds started so far, counting replays.
    pub fn rounds(&self) -> u32 {
        self.rounds
    }

    /// Ticks run in the current round.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Block on the title screen until Confirm. A dead input source starts the
    /// game anyway so the loop can still run to its end.
    pub fn await_start<I: InputSource>(&mut self, input: &mut I) {
        debug_assert_eq!(self.phase, Phase::Title);
        loop {
            match input.wait_for_key() {
                Some(KeyEvent::Confirm) => break,
                Some(_) => continue,
                None => {
                    warn!(game = self.game.name(), "no input available, starting unattended");
                    break;
                }
            }
        }
        self.begin_round();
    }

    fn begin_round(&mut self) {
        self.phase = Phase::Playing;
        self.end = None;
        self.ticks = 0;
        self.rounds += 1;
        info!(game = self.game.name(), round = self.rounds, "round started");
    }

    /// Advance the active game by one tick with the key resolved for it.
    pub fn step(&mut self, key: KeyEvent) -> Phase {
        if self.phase != Phase::Playing {
            return self.phase;
        }
        if key == KeyEvent::Quit {
            self.finish(EndReason::Quit);
            return self.phase;
        }
        let status = self.game.update(key);
        self.ticks += 1;
        if status.is_terminal() {
            self.finish(EndReason::Finished(status));
        }
        self.phase
    }

    pub fn time_out(&mut self) {
        if self.phase == Phase::Playing {
            self.finish(EndReason::TimedOut);
        }
    }

    /// No more keys will come; end the round where it stands.
    pub fn close_input(&mut self) {
        if self.phase == Phase::Playing {
            warn!(game = self.game.name(), ticks = self.ticks, "input closed mid-round");
            self.finish(EndReason::InputClosed);
        }
    }

    fn finish(&mut self, reason: EndReason) {
        self.phase = Phase::GameOver;
        self.end = Some(reason);
        info!(
            game = self.game.name(),
            round = self.rounds,
            ticks = self.ticks,
            end = %reason,
            "round over"
        );
    }

    /// Whether the game-over screen should ask for a replay.
    pub fn replay_available(&self) -> bool {
        self.game.offers_replay() && matches!(self.end, Some(EndReason::Finished(_)))
    }

    /// Leave the game-over screen: hold and exit, or wait for the replay choice.
    pub fn resolve_game_over<I: InputSource>(&mut self, input: &mut I, hold: Duration) -> Phase {
        debug_assert_eq!(self.phase, Phase::GameOver);
        if !self.replay_available() {
            if !hold.is_zero() {
                thread::sleep(hold);
            }
            self.phase = Phase::Exit;
            return self.phase;
        }
        loop {
            match input.wait_for_key() {
                Some(KeyEvent::Confirm) => {
                    self.game.reset();
                    self.begin_round();
                    break;
                }
                Some(KeyEvent::Quit) | None => {
                    self.phase = Phase::Exit;
                    break;
                }
                Some(_) => {}
            }
        }
        self.phase
    }
}
