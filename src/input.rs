//! Keystroke polling and classification into logical keys.
//!
//! Two sources implement [`InputSource`]: [`TerminalInput`] reads crossterm
//! events from the live terminal, [`ScriptedInput`] replays a raw byte stream
//! through the [`RawDecoder`].

use std::collections::VecDeque;
use std::io;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use thiserror::Error;
use tracing::{debug, warn};

/// Logical key, independent of how the keystroke was encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyEvent {
    Up,
    Down,
    Left,
    Right,
    Confirm,
    Quit,
    Char(char),
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Heading {
    Up,
    Down,
    Left,
    Right,
}

impl Heading {
    /// Unit step on the grid, `y` growing downwards.
    pub fn delta(self) -> (i32, i32) {
        match self {
            Heading::Up => (0, -1),
            Heading::Down => (0, 1),
            Heading::Left => (-1, 0),
            Heading::Right => (1, 0),
        }
    }

    pub fn opposite(self) -> Heading {
        match self {
            Heading::Up => Heading::Down,
            Heading::Down => Heading::Up,
            Heading::Left => Heading::Right,
            Heading::Right => Heading::Left,
        }
    }
}

impl KeyEvent {
    pub fn is_none(self) -> bool {
        self == KeyEvent::None
    }

    /// Arrow keys plus the WASD cluster, for the games steered by direction.
    pub fn heading(self) -> Option<Heading> {
        match self {
            KeyEvent::Up | KeyEvent::Char('w' | 'W') => Some(Heading::Up),
            KeyEvent::Down | KeyEvent::Char('s' | 'S') => Some(Heading::Down),
            KeyEvent::Left | KeyEvent::Char('a' | 'A') => Some(Heading::Left),
            KeyEvent::Right | KeyEvent::Char('d' | 'D') => Some(Heading::Right),
            _ => None,
        }
    }
}

pub trait InputSource {
    /// Return the pending keystroke, or `KeyEvent::None` right away if there is none.
    fn poll(&mut self) -> KeyEvent;

    /// Block until a keystroke arrives. `None` means the source is gone for good.
    fn wait_for_key(&mut self) -> Option<KeyEvent>;

    /// True once no further keystroke can ever arrive.
    fn is_closed(&self) -> bool {
        false
    }
}

#[derive(Debug, Error)]
pub enum InputError {
    #[error("failed to poll terminal events: {0}")]
    Poll(#[source] io::Error),
    #[error("failed to read terminal event: {0}")]
    Read(#[source] io::Error),
}

/// Map a crossterm key press to a logical key.
pub fn classify_key(key: event::KeyEvent) -> KeyEvent {
    // Raw mode swallows SIGINT, so Ctrl+C has to quit by hand
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return KeyEvent::Quit;
    }
    match key.code {
        KeyCode::Up => KeyEvent::Up,
        KeyCode::Down => KeyEvent::Down,
        KeyCode::Left => KeyEvent::Left,
        KeyCode::Right => KeyEvent::Right,
        KeyCode::Enter => KeyEvent::Confirm,
        KeyCode::Char(' ') => KeyEvent::Quit,
        KeyCode::Char(c) if !c.is_control() => KeyEvent::Char(c),
        _ => KeyEvent::None,
    }
}

/// Live terminal input through crossterm. Expects raw mode to be enabled by the caller.
/// The first failed read closes the source.
#[derive(Debug, Default)]
pub struct TerminalInput {
    closed: bool,
}

impl TerminalInput {
    pub fn new() -> Self {
        Self::default()
    }

    fn try_poll(&mut self) -> Result<KeyEvent, InputError> {
        if !event::poll(Duration::ZERO).map_err(InputError::Poll)? {
            return Ok(KeyEvent::None);
        }
        match event::read().map_err(InputError::Read)? {
            Event::Key(key) if key.kind == KeyEventKind::Press => Ok(classify_key(key)),
            _ => Ok(KeyEvent::None),
        }
    }
}

impl InputSource for TerminalInput {
    fn poll(&mut self) -> KeyEvent {
        if self.closed {
            return KeyEvent::None;
        }
        self.try_poll().unwrap_or_else(|err| {
            debug!(%err, "input degraded to no key");
            self.closed = true;
            KeyEvent::None
        })
    }

    fn wait_for_key(&mut self) -> Option<KeyEvent> {
        loop {
            match event::read() {
                Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                    let key = classify_key(key);
                    if !key.is_none() {
                        return Some(key);
                    }
                }
                Ok(_) => {}
                Err(err) => {
                    warn!(err = %InputError::Read(err), "terminal input unavailable");
                    self.closed = true;
                    return None;
                }
            }
        }
    }

    fn is_closed(&self) -> bool {
        self.closed
    }
}

const EXTENDED_PREFIXES: [u8; 2] = [0x00, 0xE0];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum DecodeState {
    #[default]
    Ready,
    AwaitingSecondByte,
}

/// Byte-level key decoder for console-style keystroke streams, where arrow
/// keys arrive as an extended prefix followed by a scan code.
#[derive(Debug, Default)]
pub struct RawDecoder {
    state: DecodeState,
}

impl RawDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one byte. Returns `None` while a prefix is waiting for its second byte.
    pub fn feed(&mut self, byte: u8) -> Option<KeyEvent> {
        match self.state {
            DecodeState::AwaitingSecondByte => {
                self.state = DecodeState::Ready;
                Some(classify_extended(byte))
            }
            DecodeState::Ready if EXTENDED_PREFIXES.contains(&byte) => {
                self.state = DecodeState::AwaitingSecondByte;
                None
            }
            DecodeState::Ready => Some(classify_byte(byte)),
        }
    }

    /// Drop a prefix whose second byte never came. Returns true if one was pending.
    pub fn abandon(&mut self) -> bool {
        std::mem::take(&mut self.state) == DecodeState::AwaitingSecondByte
    }

    pub fn is_awaiting(&self) -> bool {
        self.state == DecodeState::AwaitingSecondByte
    }
}

fn classify_byte(byte: u8) -> KeyEvent {
    match byte {
        b'\r' | b'\n' => KeyEvent::Confirm,
        b' ' => KeyEvent::Quit,
        b if b.is_ascii_graphic() => KeyEvent::Char(b as char),
        _ => KeyEvent::None,
    }
}

fn classify_extended(byte: u8) -> KeyEvent {
    match byte {
        b'H' => KeyEvent::Up,
        b'P' => KeyEvent::Down,
        b'K' => KeyEvent::Left,
        b'M' => KeyEvent::Right,
        _ => KeyEvent::None,
    }
}

/// Replays a fixed byte stream as keystrokes, one keystroke per poll.
#[derive(Debug, Default)]
pub struct ScriptedInput {
    bytes: VecDeque<u8>,
    decoder: RawDecoder,
}

impl ScriptedInput {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            bytes: bytes.into().into(),
            decoder: RawDecoder::new(),
        }
    }

    pub fn is_exhausted(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl InputSource for ScriptedInput {
    fn poll(&mut self) -> KeyEvent {
        while let Some(byte) = self.bytes.pop_front() {
            if let Some(key) = self.decoder.feed(byte) {
                return key;
            }
        }
        if self.decoder.abandon() {
            debug!("discarded extended prefix without a second byte");
        }
        KeyEvent::None
    }

    fn wait_for_key(&mut self) -> Option<KeyEvent> {
        while !self.is_exhausted() {
            let key = self.poll();
            if !key.is_none() {
                return Some(key);
            }
        }
        None
    }

    fn is_closed(&self) -> bool {
        self.is_exhausted()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyModifiers};

    #[test]
    fn test_plain_bytes() {
        let mut input = ScriptedInput::new(b"\r \nq".to_vec());
        assert_eq!(input.poll(), KeyEvent::Confirm);
        assert_eq!(input.poll(), KeyEvent::Quit);
        assert_eq!(input.poll(), KeyEvent::Confirm);
        assert_eq!(input.poll(), KeyEvent::Char('q'));
        assert_eq!(input.poll(), KeyEvent::None);
    }

    #[test]
    fn test_extended_arrows() {
        let mut input = ScriptedInput::new(vec![0xE0, b'H', 0xE0, b'P', 0x00, b'K', 0xE0, b'M']);
        assert_eq!(input.poll(), KeyEvent::Up);
        assert_eq!(input.poll(), KeyEvent::Down);
        assert_eq!(input.poll(), KeyEvent::Left);
        assert_eq!(input.poll(), KeyEvent::Right);
        assert_eq!(input.poll(), KeyEvent::None);
    }

    #[test]
    fn test_lone_prefix_is_discarded() {
        let mut decoder = RawDecoder::new();
        assert_eq!(decoder.feed(0xE0), None);
        assert!(decoder.is_awaiting());
        assert!(decoder.abandon());
        assert!(!decoder.is_awaiting());
        // 'H' after the discard is a plain letter, not an arrow
        assert_eq!(decoder.feed(b'H'), Some(KeyEvent::Char('H')));

        let mut input = ScriptedInput::new(vec![0xE0]);
        assert_eq!(input.poll(), KeyEvent::None);
        assert!(!input.decoder.is_awaiting());
    }

    #[test]
    fn test_unknown_scan_code() {
        let mut input = ScriptedInput::new(vec![0xE0, b'Z', b'x']);
        assert_eq!(input.poll(), KeyEvent::None);
        assert_eq!(input.poll(), KeyEvent::Char('x'));
    }

    #[test]
    fn test_wait_for_key_skips_noise() {
        let mut input = ScriptedInput::new(vec![0x07, 0xE0, b'Z', b'\r']);
        assert_eq!(input.wait_for_key(), Some(KeyEvent::Confirm));
        assert_eq!(input.wait_for_key(), None);
    }

    #[test]
    fn test_script_closes_after_last_byte() {
        let mut input = ScriptedInput::new(b"ab".to_vec());
        assert!(!input.is_closed());
        input.poll();
        assert!(!input.is_closed());
        assert_eq!(input.poll(), KeyEvent::Char('b'));
        assert!(input.is_closed());
        assert!(!TerminalInput::new().is_closed());
    }

    #[test]
    fn test_heading_aliases() {
        assert_eq!(KeyEvent::Up.heading(), Some(Heading::Up));
        assert_eq!(KeyEvent::Char('a').heading(), Some(Heading::Left));
        assert_eq!(KeyEvent::Char('S').heading(), Some(Heading::Down));
        assert_eq!(KeyEvent::Char('x').heading(), None);
        assert_eq!(KeyEvent::Confirm.heading(), None);
        assert_eq!(Heading::Left.opposite(), Heading::Right);
    }

    #[test]
    fn test_classify_crossterm_keys() {
        assert_eq!(classify_key(event::KeyEvent::from(KeyCode::Up)), KeyEvent::Up);
        assert_eq!(classify_key(event::KeyEvent::from(KeyCode::Enter)), KeyEvent::Confirm);
        assert_eq!(classify_key(event::KeyEvent::from(KeyCode::Char(' '))), KeyEvent::Quit);
        assert_eq!(classify_key(event::KeyEvent::from(KeyCode::Char('e'))), KeyEvent::Char('e'));
        assert_eq!(
            classify_key(event::KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            KeyEvent::Quit
        );
        assert_eq!(classify_key(event::KeyEvent::from(KeyCode::Tab)), KeyEvent::None);
    }
}
