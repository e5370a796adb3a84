use std::collections::VecDeque;
use std::time::Duration;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::games::{Game, Status};
use crate::input::{Heading, KeyEvent};
use crate::scheduler::Pacing;

pub const WIDTH: i32 = 40;
pub const HEIGHT: i32 = 20;
pub const INITIAL_LENGTH: usize = 1;
const INTERIOR_CELLS: usize = ((WIDTH - 2) * (HEIGHT - 2)) as usize;

const PACING: Pacing = Pacing::new(Duration::from_millis(100), 1);

const BANNER: &[&str] = &[
    "███████╗███╗   ██╗ █████╗ ██╗  ██╗███████╗",
    "██╔════╝████╗  ██║██╔══██╗██║ ██╔╝██╔════╝",
    "███████╗██╔██╗ ██║███████║█████╔╝ █████╗  ",
    "╚════██║██║╚██╗██║██╔══██║██╔═██╗ ██╔══╝  ",
    "███████║██║ ╚████║██║  ██║██║  ██╗███████╗",
    "╚══════╝╚═╝  ╚═══╝╚═╝  ╚═╝╚═╝  ╚═╝╚══════╝",
];

pub type Cell = (i32, i32);

#[derive(Debug, Clone, PartialEq)]
pub struct SnakeState {
    /// Head first.
    pub segments: VecDeque<Cell>,
    pub heading: Heading,
    pub food: Cell,
    pub score: u32,
}

pub fn in_interior((x, y): Cell) -> bool {
    x > 0 && x < WIDTH - 1 && y > 0 && y < HEIGHT - 1
}

pub struct Snake {
    state: SnakeState,
    rng: Pcg32,
    status: Status,
}

impl Snake {
    pub fn new(seed: u64) -> Self {
        let mut snake = Self {
            state: SnakeState {
                segments: VecDeque::from([(WIDTH / 4, HEIGHT / 2)]),
                heading: Heading::Right,
                food: (0, 0),
                score: 0,
            },
            rng: Pcg32::seed_from_u64(seed),
            status: Status::Running,
        };
        snake.state.food = snake.spawn_food();
        snake
    }

    /// Turn unless the new heading would fold the snake back onto itself.
    pub fn steer(&mut self, heading: Heading) {
        if heading != self.state.heading.opposite() {
            self.state.heading = heading;
        }
    }

    /// Would `head` hit the body? The tail only counts when it stays put,
    /// i.e. when this move grows the snake.
    fn collides(&self, head: Cell, grows: bool) -> bool {
        let len = self.state.segments.len();
        self.state
            .segments
            .iter()
            .enumerate()
            .any(|(i, &cell)| cell == head && (i + 1 < len || grows))
    }

    fn advance(&mut self) {
        let (hx, hy) = self.state.segments[0];
        let (dx, dy) = self.state.heading.delta();
        let head = (hx + dx, hy + dy);

        if !in_interior(head) {
            self.status = Status::Lost;
            return;
        }
        let grows = head == self.state.food;
        if self.collides(head, grows) {
            self.status = Status::Lost;
            return;
        }

        self.state.segments.push_front(head);
        if grows {
            self.state.score += 1;
            if self.state.segments.len() == INTERIOR_CELLS {
                self.status = Status::Won;
                return;
            }
            self.state.food = self.spawn_food();
        } else {
            self.state.segments.pop_back();
        }
    }

    /// Uniform over free interior cells, by rejection sampling.
    fn spawn_food(&mut self) -> Cell {
        debug_assert!(self.state.segments.len() < INTERIOR_CELLS);
        loop {
            let cell = (
                self.rng.gen_range(1..WIDTH - 1),
                self.rng.gen_range(1..HEIGHT - 1),
            );
            if !self.state.segments.contains(&cell) {
                return cell;
            }
        }
    }

    fn render_field(&self) -> Vec<Line<'static>> {
        let bg = Color::Rgb(10, 15, 10);
        let w = WIDTH as usize;
        let h = HEIGHT as usize;
        let mut grid: Vec<Vec<(char, Style)>> = vec![vec![(' ', Style::default().bg(bg)); w]; h];

        let border = Style::default().fg(Color::Rgb(70, 90, 70)).bg(bg);
        for x in 0..w {
            grid[0][x] = ('▓', border);
            grid[h - 1][x] = ('▓', border);
        }
        for row in grid.iter_mut() {
            row[0] = ('▓', border);
            row[w - 1] = ('▓', border);
        }

        let (fx, fy) = self.state.food;
        if in_interior(self.state.food) {
            grid[fy as usize][fx as usize] = ('●', Style::default().fg(Color::Rgb(255, 90, 90)).bg(bg));
        }

        let body = Style::default().fg(Color::Rgb(80, 200, 80)).bg(bg);
        let mut prev: Option<Cell> = None;
        for &(x, y) in &self.state.segments {
            if !in_interior((x, y)) {
                continue;
            }
            let ch = match prev {
                None => '■',
                Some((px, _)) if px == x => '█',
                Some(_) => '■',
            };
            let style = if prev.is_none() {
                body.fg(Color::Rgb(160, 255, 120)).add_modifier(Modifier::BOLD)
            } else {
                body
            };
            grid[y as usize][x as usize] = (ch, style);
            prev = Some((x, y));
        }

        grid.into_iter()
            .map(|row| {
                let spans: Vec<Span<'static>> = row
                    .into_iter()
                    .map(|(ch, style)| Span::styled(String::from(ch), style))
                    .collect();
                Line::from(spans)
            })
            .collect()
    }
}

impl Game for Snake {
    type State = SnakeState;

    fn name(&self) -> &'static str {
        "Snake"
    }

    fn banner(&self) -> &'static [&'static str] {
        BANNER
    }

    fn pacing(&self) -> Pacing {
        PACING
    }

    fn update(&mut self, key: KeyEvent) -> Status {
        if self.is_game_over() {
            return self.status;
        }
        if let Some(heading) = key.heading() {
            self.steer(heading);
        }
        self.advance();
        self.status
    }

    fn status(&self) -> Status {
        self.status
    }

    fn state(&self) -> &SnakeState {
        &self.state
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Length(HEIGHT as u16),
                Constraint::Min(0),
            ])
            .split(area);

        let status = Line::from(vec![
            Span::styled(
                format!(" Score: {} ", self.state.score),
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ),
            Span::styled("│", Style::default().fg(Color::DarkGray)),
            Span::styled(
                format!(" Length: {} ", self.state.segments.len()),
                Style::default().fg(Color::Green),
            ),
        ]);
        frame.render_widget(Paragraph::new(status), chunks[0]);
        frame.render_widget(Paragraph::new(self.render_field()), chunks[1]);
    }

    fn reset(&mut self) {
        let seed = self.rng.gen();
        *self = Snake::new(seed);
    }

    fn summary(&self) -> String {
        format!("Final Score: {}", self.state.score)
    }

    fn controls(&self) -> &'static str {
        "WASD or arrows steer │ SPACE quit"
    }
}
