//! Fixed-rate frame loop: poll, update, render, sleep.

use std::io;
use std::thread;
use std::time::{Duration, Instant};

use ratatui::backend::Backend;
use ratatui::Terminal;
use tracing::trace;

use crate::games::Game;
use crate::input::{InputSource, KeyEvent};
use crate::session::{GameSession, Phase};
use crate::ui;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pacing {
    pub tick: Duration,
    /// Upper bound on keys drained per tick.
    pub polls_per_tick: usize,
}

impl Pacing {
    pub const fn new(tick: Duration, polls_per_tick: usize) -> Self {
        Self { tick, polls_per_tick }
    }

    /// Same input density, no sleeping between ticks.
    pub fn unthrottled(self) -> Self {
        Self {
            tick: Duration::ZERO,
            ..self
        }
    }
}

pub struct FrameScheduler {
    pacing: Pacing,
    max_ticks: Option<u64>,
}

impl FrameScheduler {
    pub fn new(pacing: Pacing, max_ticks: Option<u64>) -> Self {
        Self { pacing, max_ticks }
    }

    /// Drain up to `polls_per_tick` pending keys and keep the most recent one.
    /// A quit anywhere in the burst wins.
    pub fn poll_burst<I: InputSource>(&self, input: &mut I) -> KeyEvent {
        let mut latest = KeyEvent::None;
        for _ in 0..self.pacing.polls_per_tick.max(1) {
            match input.poll() {
                KeyEvent::None => break,
                KeyEvent::Quit => return KeyEvent::Quit,
                key => latest = key,
            }
        }
        latest
    }

    /// Run ticks until the session leaves `Playing`. A closed input source ends the
    /// round once its last key is spent. Returns the number of ticks run.
    pub fn run_loop<G, I, B>(
        &self,
        session: &mut GameSession<G>,
        input: &mut I,
        terminal: &mut Terminal<B>,
    ) -> io::Result<u64>
    where
        G: Game,
        I: InputSource,
        B: Backend,
    {
        let mut ticks = 0;
        while session.phase() == Phase::Playing {
            if self.max_ticks.is_some_and(|max| ticks >= max) {
                session.time_out();
                break;
            }
            let started = Instant::now();

            let key = self.poll_burst(input);
            if key.is_none() && input.is_closed() {
                session.close_input();
                break;
            }
            session.step(key);
            terminal.draw(|frame| ui::render(frame, &*session))?;
            ticks += 1;

            if session.phase() != Phase::Playing {
                break;
            }
            // No catch-up: an overrun tick just starts the next one late
            match self.pacing.tick.checked_sub(started.elapsed()) {
                Some(rest) if !rest.is_zero() => thread::sleep(rest),
                _ if !self.pacing.tick.is_zero() => trace!(tick = ticks, "tick overran its budget"),
                _ => {}
            }
        }
        Ok(ticks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::ScriptedInput;

    fn burst(polls: usize) -> FrameScheduler {
        FrameScheduler::new(Pacing::new(Duration::ZERO, polls), None)
    }

    #[test]
    fn test_single_poll_takes_one_key() {
        let scheduler = burst(1);
        let mut input = ScriptedInput::new(b"ab".to_vec());
        assert_eq!(scheduler.poll_burst(&mut input), KeyEvent::Char('a'));
        assert_eq!(scheduler.poll_burst(&mut input), KeyEvent::Char('b'));
        assert_eq!(scheduler.poll_burst(&mut input), KeyEvent::None);
    }

    #[test]
    fn test_burst_keeps_latest_key() {
        let scheduler = burst(60);
        let mut input = ScriptedInput::new(vec![b'w', 0xE0, b'P', b's']);
        assert_eq!(scheduler.poll_burst(&mut input), KeyEvent::Char('s'));
        assert!(input.is_exhausted());
    }

    #[test]
    fn test_burst_is_bounded() {
        let scheduler = burst(2);
        let mut input = ScriptedInput::new(b"abc".to_vec());
        assert_eq!(scheduler.poll_burst(&mut input), KeyEvent::Char('b'));
        assert_eq!(scheduler.poll_burst(&mut input), KeyEvent::Char('c'));
    }

    #[test]
    fn test_quit_wins_burst() {
        let scheduler = burst(60);
        let mut input = ScriptedInput::new(b"w s".to_vec());
        assert_eq!(scheduler.poll_burst(&mut input), KeyEvent::Quit);
    }

    #[test]
    fn test_closed_source_ends_round_after_last_key() {
        use crate::games::hangman::Hangman;
        use crate::session::EndReason;
        use ratatui::backend::TestBackend;

        let scheduler = burst(1);
        let mut session = GameSession::new(Hangman::with_word("network"));
        let mut input = ScriptedInput::new(b"\rnq".to_vec());
        let mut terminal = Terminal::new(TestBackend::new(80, 30)).unwrap();
        session.await_start(&mut input);
        assert_eq!(scheduler.run_loop(&mut session, &mut input, &mut terminal).unwrap(), 2);
        assert_eq!(session.end_reason(), Some(EndReason::InputClosed));
        assert_eq!(session.ticks(), 2);
    }

    #[test]
    fn test_unthrottled_keeps_density() {
        let pacing = Pacing::new(Duration::from_millis(33), 60).unthrottled();
        assert_eq!(pacing.tick, Duration::ZERO);
        assert_eq!(pacing.polls_per_tick, 60);
    }
}
