use std::collections::BTreeSet;
use std::time::Duration;

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::games::{Game, Status};
use crate::input::KeyEvent;
use crate::scheduler::Pacing;

pub const MAX_ATTEMPTS: u32 = 6;

pub const WORDS: [&str; 25] = [
    "algorithm", "binary", "browser", "compiler", "computer",
    "database", "debugging", "developer", "framework", "function",
    "hangman", "hardware", "interface", "keyboard", "language",
    "memory", "network", "programming", "project", "python",
    "software", "syntax", "terminal", "variable", "workflow",
];

const PACING: Pacing = Pacing::new(Duration::from_millis(33), 1);

const BANNER: &[&str] = &[
    "██╗  ██╗ █████╗ ███╗   ██╗ ██████╗ ███╗   ███╗ █████╗ ███╗   ██╗",
    "██║  ██║██╔══██╗████╗  ██║██╔════╝ ████╗ ████║██╔══██╗████╗  ██║",
    "███████║███████║██╔██╗ ██║██║  ███╗██╔████╔██║███████║██╔██╗ ██║",
    "██╔══██║██╔══██║██║╚██╗██║██║   ██║██║╚██╔╝██║██╔══██║██║╚██╗██║",
    "██║  ██║██║  ██║██║ ╚████║╚██████╔╝██║ ╚═╝ ██║██║  ██║██║ ╚████║",
    "╚═╝  ╚═╝╚═╝  ╚═╝╚═╝  ╚═══╝ ╚═════╝ ╚═╝     ╚═╝╚═╝  ╚═╝╚═╝  ╚═══╝",
];

// Indexed by attempts left
const GALLOWS: [[&str; 7]; 7] = [
    ["  +---+", "  |   |", "  O   |", " /|\\  |", " / \\  |", "      |", "========="],
    ["  +---+", "  |   |", "  O   |", " /|\\  |", " /    |", "      |", "========="],
    ["  +---+", "  |   |", "  O   |", " /|\\  |", "      |", "      |", "========="],
    ["  +---+", "  |   |", "  O   |", " /|   |", "      |", "      |", "========="],
    ["  +---+", "  |   |", "  O   |", "  |   |", "      |", "      |", "========="],
    ["  +---+", "  |   |", "  O   |", "      |", "      |", "      |", "========="],
    ["  +---+", "  |   |", "      |", "      |", "      |", "      |", "========="],
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HangmanState {
    pub word: String,
    /// Every distinct letter tried so far, hits and misses alike.
    pub guessed: BTreeSet<char>,
    pub attempts_left: u32,
}

impl HangmanState {
    fn new(word: &str) -> Self {
        let word = word.to_ascii_lowercase();
        debug_assert!(!word.is_empty() && word.chars().all(|c| c.is_ascii_lowercase()));
        Self {
            word,
            guessed: BTreeSet::new(),
            attempts_left: MAX_ATTEMPTS,
        }
    }

    /// The word with unguessed letters replaced by `_`, space separated.
    pub fn masked_word(&self) -> String {
        self.word
            .chars()
            .map(|c| if self.guessed.contains(&c) { c } else { '_' })
            .map(String::from)
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn is_solved(&self) -> bool {
        self.word.chars().all(|c| self.guessed.contains(&c))
    }
}

pub struct Hangman {
    state: HangmanState,
    rng: Pcg32,
    status: Status,
}

impl Hangman {
    pub fn new(seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let word = pick_word(&mut rng);
        Self::start(word, rng)
    }

    /// Start a round on a fixed target word. Replays draw from seed 0.
    pub fn with_word(word: &str) -> Self {
        Self::start(word, Pcg32::seed_from_u64(0))
    }

    fn start(word: &str, rng: Pcg32) -> Self {
        Self {
            state: HangmanState::new(word),
            rng,
            status: Status::Running,
        }
    }

    /// Try a letter. Repeats and non-letters change nothing.
    pub fn guess(&mut self, letter: char) -> Status {
        if self.is_game_over() || !letter.is_ascii_alphabetic() {
            return self.status;
        }
        let letter = letter.to_ascii_lowercase();
        if !self.state.guessed.insert(letter) {
            return self.status;
        }
        if !self.state.word.contains(letter) {
            self.state.attempts_left = self.state.attempts_left.saturating_sub(1);
        }
        self.status = if self.state.is_solved() {
            Status::Won
        } else if self.state.attempts_left == 0 {
            Status::Lost
        } else {
            Status::Running
        };
        self.status
    }
}

fn pick_word(rng: &mut Pcg32) -> &'static str {
    WORDS.choose(rng).copied().unwrap_or(WORDS[0])
}

impl Game for Hangman {
    type State = HangmanState;

    fn name(&self) -> &'static str {
        "Hangman"
    }

    fn banner(&self) -> &'static [&'static str] {
        BANNER
    }

    fn pacing(&self) -> Pacing {
        PACING
    }

    fn update(&mut self, key: KeyEvent) -> Status {
        match key {
            KeyEvent::Char(c) => self.guess(c),
            _ => self.status,
        }
    }

    fn status(&self) -> Status {
        self.status
    }

    fn state(&self) -> &HangmanState {
        &self.state
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(14), Constraint::Min(0)])
            .split(area);

        let stage = self.state.attempts_left.min(MAX_ATTEMPTS) as usize;
        let gallows_color = if stage <= 2 {
            Color::Rgb(255, 90, 90)
        } else {
            Color::Rgb(200, 200, 220)
        };
        let gallows: Vec<Line> = std::iter::once(Line::from(""))
            .chain(
                GALLOWS[stage]
                    .iter()
                    .map(|row| Line::from(Span::styled(*row, Style::default().fg(gallows_color)))),
            )
            .collect();
        frame.render_widget(Paragraph::new(gallows), chunks[0]);

        let guessed = if self.state.guessed.is_empty() {
            "None".to_string()
        } else {
            self.state
                .guessed
                .iter()
                .map(|c| c.to_string())
                .collect::<Vec<_>>()
                .join(", ")
        };
        let lines = vec![
            Line::from(""),
            Line::from(vec![
                Span::styled("Word: ", Style::default().fg(Color::Gray)),
                Span::styled(
                    self.state.masked_word(),
                    Style::default().fg(Color::Rgb(255, 220, 80)).add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Guessed letters: ", Style::default().fg(Color::Gray)),
                Span::styled(guessed, Style::default().fg(Color::White)),
            ]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Attempts remaining: ", Style::default().fg(Color::Gray)),
                Span::styled(
                    self.state.attempts_left.to_string(),
                    Style::default().fg(gallows_color).add_modifier(Modifier::BOLD),
                ),
            ]),
        ];
        frame.render_widget(Paragraph::new(lines), chunks[1]);
    }

    fn reset(&mut self) {
        let word = pick_word(&mut self.rng);
        self.state = HangmanState::new(word);
        self.status = Status::Running;
    }

    fn summary(&self) -> String {
        match self.status {
            Status::Won => format!("You guessed the word! Word: {}", self.state.word),
            _ => format!("Word: {}", self.state.word),
        }
    }

    fn controls(&self) -> &'static str {
        "Type a letter to guess │ SPACE quit"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_word_win_keeps_attempts() {
        for order in ["cat", "tac", "atc"] {
            let mut game = Hangman::with_word("cat");
            let mut status = Status::Running;
            for c in order.chars() {
                status = game.guess(c);
            }
            assert_eq!(status, Status::Won);
            assert_eq!(game.state().attempts_left, MAX_ATTEMPTS);
        }
    }

    #[test]
    fn test_duplicate_guess_is_idempotent() {
        let mut game = Hangman::with_word("memory");
        game.guess('m');
        game.guess('z');
        let before = game.state().clone();
        game.guess('m');
        game.guess('z');
        game.guess('Z');
        assert_eq!(game.state(), &before);
        assert_eq!(game.state().guessed.len(), 2);
        assert_eq!(game.state().attempts_left, MAX_ATTEMPTS - 1);
    }

    #[test]
    fn test_hit_reveals_every_position() {
        let mut game = Hangman::with_word("memory");
        game.guess('m');
        assert_eq!(game.state().masked_word(), "m _ m _ _ _");
    }

    #[test]
    fn test_six_misses_lose() {
        let mut game = Hangman::with_word("syntax");
        for c in "bcdefg".chars() {
            assert_eq!(game.state().attempts_left, MAX_ATTEMPTS - game.state().guessed.len() as u32);
            game.guess(c);
        }
        assert_eq!(game.status(), Status::Lost);
        assert_eq!(game.state().attempts_left, 0);
        // no further changes once lost
        game.guess('s');
        assert!(!game.state().guessed.contains(&'s'));
    }

    #[test]
    fn test_ignores_non_letters_and_other_keys() {
        let mut game = Hangman::with_word("binary");
        assert_eq!(game.update(KeyEvent::Char('3')), Status::Running);
        assert_eq!(game.update(KeyEvent::Up), Status::Running);
        assert_eq!(game.update(KeyEvent::Confirm), Status::Running);
        assert!(game.state().guessed.is_empty());
        game.update(KeyEvent::Char('B'));
        assert!(game.state().guessed.contains(&'b'));
    }

    #[test]
    fn test_word_comes_from_vocabulary() {
        for seed in 0..50 {
            let game = Hangman::new(seed);
            assert!(WORDS.contains(&game.state().word.as_str()));
            assert_eq!(game.state().attempts_left, MAX_ATTEMPTS);
        }
    }

    #[test]
    fn test_same_seed_same_word() {
        assert_eq!(Hangman::new(12).state().word, Hangman::new(12).state().word);
    }

    #[test]
    fn test_reset_starts_fresh_round() {
        let mut game = Hangman::new(4);
        game.guess('q');
        game.reset();
        assert!(game.state().guessed.is_empty());
        assert_eq!(game.status(), Status::Running);
        assert!(WORDS.contains(&game.state().word.as_str()));
    }

    #[test]
    fn test_replays_continue_the_seeded_word_stream() {
        let mut rng = Pcg32::seed_from_u64(21);
        let expected: Vec<&str> = (0..4).map(|_| pick_word(&mut rng)).collect();

        let mut game = Hangman::new(21);
        let mut words = vec![game.state().word.clone()];
        for _ in 0..3 {
            game.reset();
            words.push(game.state().word.clone());
        }
        assert_eq!(words, expected);
    }
}
