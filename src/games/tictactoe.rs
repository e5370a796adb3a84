use std::time::Duration;

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::games::{Game, Status};
use crate::input::{Heading, KeyEvent};
use crate::scheduler::Pacing;

const PACING: Pacing = Pacing::new(Duration::from_millis(100), 1);

/// Ticks the computer waits before answering a move (~0.5s at the board pace).
pub const THINK_TICKS: u32 = 5;

pub const CENTER: usize = 4;
pub const CORNERS: [usize; 4] = [0, 2, 6, 8];
pub const LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

const BANNER: &[&str] = &[
    "████████╗██╗ ██████╗    ████████╗ █████╗  ██████╗    ████████╗ ██████╗ ███████╗",
    "╚══██╔══╝██║██╔════╝    ╚══██╔══╝██╔══██╗██╔════╝    ╚══██╔══╝██╔═══██╗██╔════╝",
    "   ██║   ██║██║            ██║   ███████║██║            ██║   ██║   ██║█████╗  ",
    "   ██║   ██║██║            ██║   ██╔══██║██║            ██║   ██║   ██║██╔══╝  ",
    "   ██║   ██║╚██████╗       ██║   ██║  ██║╚██████╗       ██║   ╚██████╔╝███████╗",
    "   ╚═╝   ╚═╝ ╚═════╝       ╚═╝   ╚═╝  ╚═╝ ╚═════╝       ╚═╝    ╚═════╝ ╚══════╝",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mark {
    Empty,
    Player,
    Computer,
}

impl Mark {
    fn symbol(self) -> char {
        match self {
            Mark::Empty => ' ',
            Mark::Player => 'X',
            Mark::Computer => 'O',
        }
    }
}

pub type Board = [Mark; 9];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Turn {
    Player,
    Computer,
}

/// Results across every round played in this process.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tally {
    pub player_wins: u32,
    pub computer_wins: u32,
    pub ties: u32,
}

impl Tally {
    fn record(&mut self, status: Status) {
        match status {
            Status::Won => self.player_wins += 1,
            Status::Lost => self.computer_wins += 1,
            Status::Tie => self.ties += 1,
            Status::Running => {}
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TicTacToeState {
    pub board: Board,
    pub cursor: usize,
    pub turn: Turn,
    pub tally: Tally,
    pub status: Status,
    /// Ticks left before the computer moves.
    pub thinking: u32,
}

impl TicTacToeState {
    fn new(tally: Tally) -> Self {
        Self {
            board: [Mark::Empty; 9],
            cursor: CENTER,
            turn: Turn::Player,
            tally,
            status: Status::Running,
            thinking: 0,
        }
    }
}

/// The mark holding a full line, if any.
pub fn winner(board: &Board) -> Option<Mark> {
    LINES.iter().find_map(|&[a, b, c]| {
        (board[a] != Mark::Empty && board[a] == board[b] && board[b] == board[c]).then_some(board[a])
    })
}

/// Score the board from the player's side.
pub fn judge(board: &Board) -> Status {
    match winner(board) {
        Some(Mark::Player) => Status::Won,
        Some(Mark::Computer) => Status::Lost,
        _ if board.iter().all(|&m| m != Mark::Empty) => Status::Tie,
        _ => Status::Running,
    }
}

fn completes_line(board: &Board, cell: usize, mark: Mark) -> bool {
    let mut next = *board;
    next[cell] = mark;
    winner(&next) == Some(mark)
}

/// Computer move: win, block, center, random corner, random cell.
pub fn choose_move<R: Rng>(board: &Board, rng: &mut R) -> Option<usize> {
    let empty: Vec<usize> = (0..9).filter(|&i| board[i] == Mark::Empty).collect();

    for mark in [Mark::Computer, Mark::Player] {
        if let Some(&cell) = empty.iter().find(|&&i| completes_line(board, i, mark)) {
            return Some(cell);
        }
    }
    if board[CENTER] == Mark::Empty {
        return Some(CENTER);
    }
    let corners: Vec<usize> = CORNERS.iter().copied().filter(|&i| board[i] == Mark::Empty).collect();
    if let Some(&corner) = corners.choose(rng) {
        return Some(corner);
    }
    empty.choose(rng).copied()
}

pub struct TicTacToe {
    state: TicTacToeState,
    rng: Pcg32,
}

impl TicTacToe {
    pub fn new(seed: u64) -> Self {
        Self {
            state: TicTacToeState::new(Tally::default()),
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    fn move_cursor(&mut self, heading: Heading) {
        let c = self.state.cursor;
        self.state.cursor = match heading {
            Heading::Up if c >= 3 => c - 3,
            Heading::Down if c < 6 => c + 3,
            Heading::Left if c % 3 > 0 => c - 1,
            Heading::Right if c % 3 < 2 => c + 1,
            _ => c,
        };
    }

    fn place(&mut self, cell: usize, mark: Mark) {
        debug_assert_eq!(self.state.board[cell], Mark::Empty);
        self.state.board[cell] = mark;
        self.state.status = judge(&self.state.board);
        if self.state.status.is_terminal() {
            self.state.tally.record(self.state.status);
        }
    }

    fn player_turn(&mut self, key: KeyEvent) {
        if let Some(heading) = key.heading() {
            self.move_cursor(heading);
        } else if key == KeyEvent::Confirm && self.state.board[self.state.cursor] == Mark::Empty {
            self.place(self.state.cursor, Mark::Player);
            self.state.turn = Turn::Computer;
            self.state.thinking = THINK_TICKS;
        }
    }

    fn computer_turn(&mut self) {
        if self.state.thinking > 0 {
            self.state.thinking -= 1;
            return;
        }
        if let Some(cell) = choose_move(&self.state.board, &mut self.rng) {
            self.place(cell, Mark::Computer);
        }
        self.state.turn = Turn::Player;
    }

    fn message(&self) -> &'static str {
        match self.state.status {
            Status::Won => "You win!",
            Status::Lost => "Computer wins!",
            Status::Tie => "It's a tie!",
            Status::Running => match self.state.turn {
                Turn::Player => "Your turn (X)",
                Turn::Computer => "Computer's turn (O)",
            },
        }
    }

    fn render_board(&self) -> Vec<Line<'static>> {
        let grid_style = Style::default().fg(Color::Rgb(90, 90, 120));
        let show_cursor = self.state.turn == Turn::Player && !self.is_game_over();
        let mut lines = Vec::new();
        for row in 0..3 {
            let mut spans = Vec::new();
            for col in 0..3 {
                let index = row * 3 + col;
                let mark = self.state.board[index];
                let mut style = match mark {
                    Mark::Player => Style::default().fg(Color::Rgb(90, 180, 255)).add_modifier(Modifier::BOLD),
                    Mark::Computer => Style::default().fg(Color::Rgb(255, 140, 80)).add_modifier(Modifier::BOLD),
                    Mark::Empty => Style::default().fg(Color::Rgb(200, 200, 120)),
                };
                let symbol = if mark == Mark::Empty && show_cursor && index == self.state.cursor {
                    '•'
                } else {
                    mark.symbol()
                };
                if show_cursor && index == self.state.cursor {
                    style = style.bg(Color::Rgb(40, 40, 70));
                }
                spans.push(Span::styled(format!(" {} ", symbol), style));
                if col < 2 {
                    spans.push(Span::styled("│", grid_style));
                }
            }
            lines.push(Line::from(spans));
            if row < 2 {
                lines.push(Line::from(Span::styled("───┼───┼───", grid_style)));
            }
        }
        lines
    }
}

impl Game for TicTacToe {
    type State = TicTacToeState;

    fn name(&self) -> &'static str {
        "Tic-Tac-Toe"
    }

    fn banner(&self) -> &'static [&'static str] {
        BANNER
    }

    fn pacing(&self) -> Pacing {
        PACING
    }

    fn update(&mut self, key: KeyEvent) -> Status {
        if self.is_game_over() {
            return self.state.status;
        }
        match self.state.turn {
            Turn::Player => self.player_turn(key),
            Turn::Computer => self.computer_turn(),
        }
        self.state.status
    }

    fn status(&self) -> Status {
        self.state.status
    }

    fn state(&self) -> &TicTacToeState {
        &self.state
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let mut lines = vec![
            Line::from(Span::styled(
                "TIC-TAC-TOE",
                Style::default().fg(Color::Rgb(255, 220, 80)).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
        ];
        lines.extend(self.render_board());
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            self.message(),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(""));
        let tally = self.state.tally;
        lines.push(Line::from(Span::styled(
            format!(
                "Player: {}  Computer: {}  Ties: {}",
                tally.player_wins, tally.computer_wins, tally.ties
            ),
            Style::default().fg(Color::Gray),
        )));
        frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), area);
    }

    fn reset(&mut self) {
        self.state = TicTacToeState::new(self.state.tally);
    }

    fn summary(&self) -> String {
        let tally = self.state.tally;
        format!(
            "{} Score - Player: {}  Computer: {}  Ties: {}",
            self.message(),
            tally.player_wins,
            tally.computer_wins,
            tally.ties
        )
    }

    fn controls(&self) -> &'static str {
        "WASD or arrows select │ ENTER place │ SPACE quit"
    }

    fn offers_replay(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const E: Mark = Mark::Empty;
    const X: Mark = Mark::Player;
    const O: Mark = Mark::Computer;

    fn rng() -> Pcg32 {
        Pcg32::seed_from_u64(5)
    }

    #[test]
    fn test_winner_lines() {
        for line in LINES {
            let mut board = [E; 9];
            for i in line {
                board[i] = O;
            }
            assert_eq!(winner(&board), Some(O));
            assert_eq!(judge(&board), Status::Lost);
        }
        assert_eq!(winner(&[E; 9]), None);
        assert_eq!(judge(&[E; 9]), Status::Running);
    }

    #[test]
    fn test_full_board_is_tie() {
        let board = [X, O, X, X, O, O, O, X, X];
        assert_eq!(winner(&board), None);
        assert_eq!(judge(&board), Status::Tie);
    }

    #[test]
    fn test_empty_board_takes_center() {
        for seed in 0..20 {
            let mut rng = Pcg32::seed_from_u64(seed);
            assert_eq!(choose_move(&[E; 9], &mut rng), Some(CENTER));
        }
    }

    #[test]
    fn test_blocks_player_line() {
        let board = [X, X, E, E, O, E, E, E, E];
        assert_eq!(choose_move(&board, &mut rng()), Some(2));
    }

    #[test]
    fn test_prefers_win_over_block() {
        // O can win at 5 (3-4-5); X threatens 2
        let board = [X, X, E, O, O, E, E, E, E];
        assert_eq!(choose_move(&board, &mut rng()), Some(5));
    }

    #[test]
    fn test_takes_a_corner_after_center() {
        let board = [E, E, E, E, X, E, E, E, E];
        for seed in 0..20 {
            let mut rng = Pcg32::seed_from_u64(seed);
            let cell = choose_move(&board, &mut rng).unwrap();
            assert!(CORNERS.contains(&cell));
        }
    }

    #[test]
    fn test_random_picks_stay_on_free_corners() {
        // opposite corners against the center: no threats, 2 and 6 are the free corners
        let board = [X, E, E, E, O, E, E, E, X];
        for seed in 0..50 {
            let mut rng = Pcg32::seed_from_u64(seed);
            let cell = choose_move(&board, &mut rng).unwrap();
            assert!(cell == 2 || cell == 6);
        }
    }

    #[test]
    fn test_full_board_has_no_move() {
        let board = [X, O, X, X, O, O, O, X, X];
        assert_eq!(choose_move(&board, &mut rng()), None);
    }

    #[test]
    fn test_cursor_stays_on_board() {
        let mut game = TicTacToe::new(1);
        for _ in 0..4 {
            game.update(KeyEvent::Up);
            game.update(KeyEvent::Char('a'));
        }
        assert_eq!(game.state().cursor, 0);
        for _ in 0..4 {
            game.update(KeyEvent::Down);
            game.update(KeyEvent::Right);
        }
        assert_eq!(game.state().cursor, 8);
    }

    #[test]
    fn test_computer_answers_after_thinking() {
        let mut game = TicTacToe::new(1);
        game.update(KeyEvent::Up);
        game.update(KeyEvent::Confirm);
        assert_eq!(game.state().board[1], X);
        assert_eq!(game.state().turn, Turn::Computer);

        for _ in 0..THINK_TICKS {
            game.update(KeyEvent::None);
            assert_eq!(game.state().turn, Turn::Computer);
        }
        game.update(KeyEvent::None);
        assert_eq!(game.state().turn, Turn::Player);
        assert_eq!(game.state().board[CENTER], O);
    }

    #[test]
    fn test_occupied_cell_is_ignored() {
        let mut game = TicTacToe::new(1);
        game.state.board[CENTER] = O;
        game.update(KeyEvent::Confirm);
        assert_eq!(game.state().turn, Turn::Player);
        assert_eq!(game.state().board.iter().filter(|&&m| m == X).count(), 0);
    }

    /// Plays the lowest empty cell every turn until the round ends.
    fn play_round(game: &mut TicTacToe) -> Status {
        for _ in 0..200 {
            if game.state().turn == Turn::Player {
                let target = game.state().board.iter().position(|&m| m == E).unwrap();
                while game.state().cursor != target {
                    let c = game.state().cursor;
                    let key = if c / 3 > target / 3 {
                        KeyEvent::Up
                    } else if c / 3 < target / 3 {
                        KeyEvent::Down
                    } else if c % 3 > target % 3 {
                        KeyEvent::Left
                    } else {
                        KeyEvent::Right
                    };
                    game.update(key);
                }
                game.update(KeyEvent::Confirm);
            } else {
                game.update(KeyEvent::None);
            }
            let board = game.state().board;
            let xs = board.iter().filter(|&&m| m == X).count();
            let os = board.iter().filter(|&&m| m == O).count();
            assert!(xs == os || xs == os + 1);
            if game.is_game_over() {
                return game.status();
            }
        }
        panic!("round did not finish");
    }

    #[test]
    fn test_tally_survives_reset() {
        let mut game = TicTacToe::new(3);
        let first = play_round(&mut game);
        let tally = game.state().tally;
        assert_eq!(tally.player_wins + tally.computer_wins + tally.ties, 1);
        // a finished round ignores further input and counts once
        game.update(KeyEvent::Confirm);
        assert_eq!(game.state().tally, tally);

        game.reset();
        assert_eq!(game.state().board, [E; 9]);
        assert_eq!(game.state().cursor, CENTER);
        assert_eq!(game.state().tally, tally);

        play_round(&mut game);
        let tally = game.state().tally;
        assert_eq!(tally.player_wins + tally.computer_wins + tally.ties, 2);
        assert!(first.is_terminal());
    }
}
