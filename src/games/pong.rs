use std::time::Duration;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::games::{Game, Status};
use crate::input::{Heading, KeyEvent};
use crate::scheduler::Pacing;

pub const WIDTH: i32 = 60;
pub const HEIGHT: i32 = 20;
pub const PADDLE_HEIGHT: i32 = 4;
pub const PADDLE_MIN: i32 = 1;
pub const PADDLE_MAX: i32 = HEIGHT - PADDLE_HEIGHT - 1;

// Columns the paddles are drawn in
const COMPUTER_COLUMN: i32 = 1;
const PLAYER_COLUMN: i32 = WIDTH - 2;

const TOP: f32 = 1.0;
const BOTTOM: f32 = (HEIGHT - 2) as f32;

const PACING: Pacing = Pacing::new(Duration::from_millis(33), 60);

const BANNER: &[&str] = &[
    "██████╗  ██████╗ ███╗   ██╗ ██████╗ ",
    "██╔══██╗██╔═══██╗████╗  ██║██╔════╝ ",
    "██████╔╝██║   ██║██╔██╗ ██║██║  ███╗",
    "██╔═══╝ ██║   ██║██║╚██╗██║██║   ██║",
    "██║     ╚██████╔╝██║ ╚████║╚██████╔╝",
    "╚═╝      ╚═════╝ ╚═╝  ╚═══╝ ╚═════╝ ",
];

#[derive(Debug, Clone, PartialEq)]
pub struct PongState {
    pub ball_x: f32,
    pub ball_y: f32,
    pub ball_dx: f32,
    pub ball_dy: f32,
    /// Top row of the left (computer) paddle.
    pub computer_paddle: i32,
    /// Top row of the right (player) paddle.
    pub player_paddle: i32,
    pub computer_score: u32,
    pub player_score: u32,
}

/// Vertical velocity after a paddle hit at relative position `contact`
/// (0 = paddle top, 1 = paddle bottom).
pub fn deflect(dy: f32, contact: f32) -> f32 {
    0.5 * dy + (contact - 0.5) * 2.0
}

fn spans(paddle: i32, y: f32) -> bool {
    paddle as f32 <= y && y < (paddle + PADDLE_HEIGHT) as f32
}

fn contact_point(paddle: i32, y: f32) -> f32 {
    (y - paddle as f32) / PADDLE_HEIGHT as f32
}

pub struct Pong {
    state: PongState,
    rng: Pcg32,
    target_score: Option<u32>,
}

impl Pong {
    pub fn new(seed: u64, target_score: Option<u32>) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let dx = serve_direction(&mut rng);
        Self {
            state: PongState {
                ball_x: (WIDTH / 2) as f32,
                ball_y: (HEIGHT / 2) as f32,
                ball_dx: dx,
                ball_dy: 0.0,
                computer_paddle: HEIGHT / 2 - PADDLE_HEIGHT / 2,
                player_paddle: HEIGHT / 2 - PADDLE_HEIGHT / 2,
                computer_score: 0,
                player_score: 0,
            },
            rng,
            target_score,
        }
    }

    fn move_player(&mut self, key: KeyEvent) {
        let paddle = &mut self.state.player_paddle;
        match key.heading() {
            Some(Heading::Up) => *paddle = (*paddle - 1).max(PADDLE_MIN),
            Some(Heading::Down) => *paddle = (*paddle + 1).min(PADDLE_MAX),
            _ => {}
        }
    }

    /// Step the computer paddle one cell toward the ball, ignoring offsets
    /// within a cell and balls hugging a wall.
    fn track_ball(&mut self) {
        let s = &mut self.state;
        if !(s.ball_y > TOP && s.ball_y < BOTTOM) {
            return;
        }
        let target = s.ball_y - (PADDLE_HEIGHT / 2) as f32;
        let paddle = s.computer_paddle as f32;
        if target < paddle - 1.0 {
            s.computer_paddle = (s.computer_paddle - 1).max(PADDLE_MIN);
        } else if target > paddle + 1.0 {
            s.computer_paddle = (s.computer_paddle + 1).min(PADDLE_MAX);
        }
    }

    fn move_ball(&mut self) {
        let s = &mut self.state;
        s.ball_x += s.ball_dx;
        s.ball_y += s.ball_dy;

        // Walls
        if s.ball_y <= TOP {
            s.ball_y = TOP;
            s.ball_dy = s.ball_dy.abs();
        } else if s.ball_y >= BOTTOM {
            s.ball_y = BOTTOM;
            s.ball_dy = -s.ball_dy.abs();
        }

        // Paddles
        if s.ball_x <= (COMPUTER_COLUMN + 1) as f32 && spans(s.computer_paddle, s.ball_y) {
            s.ball_dx = s.ball_dx.abs();
            s.ball_dy = deflect(s.ball_dy, contact_point(s.computer_paddle, s.ball_y));
            s.ball_x = (COMPUTER_COLUMN + 2) as f32;
        }
        if s.ball_x >= (PLAYER_COLUMN - 1) as f32 && spans(s.player_paddle, s.ball_y) {
            s.ball_dx = -s.ball_dx.abs();
            s.ball_dy = deflect(s.ball_dy, contact_point(s.player_paddle, s.ball_y));
            s.ball_x = (PLAYER_COLUMN - 2) as f32;
        }

        // Goals
        if s.ball_x <= 0.0 {
            s.player_score += 1;
            self.reset_ball();
        } else if s.ball_x >= (WIDTH - 1) as f32 {
            s.computer_score += 1;
            self.reset_ball();
        }

        let s = &mut self.state;
        s.ball_x = s.ball_x.clamp(0.0, (WIDTH - 1) as f32);
        s.ball_y = s.ball_y.clamp(TOP, BOTTOM);
    }

    fn reset_ball(&mut self) {
        self.state.ball_x = (WIDTH / 2) as f32;
        self.state.ball_y = (HEIGHT / 2) as f32;
        self.state.ball_dx = serve_direction(&mut self.rng);
        self.state.ball_dy = 0.0;
    }

    fn render_field(&self) -> Vec<Line<'static>> {
        let bg = Color::Rgb(10, 10, 20);
        let w = WIDTH as usize;
        let h = HEIGHT as usize;
        let mut grid: Vec<Vec<(char, Style)>> = vec![vec![(' ', Style::default().bg(bg)); w]; h];

        let border = Style::default().fg(Color::Rgb(60, 60, 80)).bg(bg);
        for x in 0..w {
            grid[0][x] = ('■', border);
            grid[h - 1][x] = ('■', border);
        }

        let paddles = [
            (COMPUTER_COLUMN, self.state.computer_paddle, Color::Rgb(220, 90, 90)),
            (PLAYER_COLUMN, self.state.player_paddle, Color::Rgb(90, 180, 255)),
        ];
        for (column, top, color) in paddles {
            for row in top..top + PADDLE_HEIGHT {
                if row > 0 && row < HEIGHT - 1 {
                    grid[row as usize][column as usize] = ('█', Style::default().fg(color).bg(bg));
                }
            }
        }

        let bx = self.state.ball_x as usize;
        let by = self.state.ball_y as usize;
        if by > 0 && by < h - 1 && bx > 0 && bx < w - 1 {
            grid[by][bx] = (
                'O',
                Style::default().fg(Color::White).bg(bg).add_modifier(Modifier::BOLD),
            );
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

fn serve_direction(rng: &mut Pcg32) -> f32 {
    if rng.gen_bool(0.5) {
        1.0
    } else {
        -1.0
    }
}

impl Game for Pong {
    type State = PongState;

    fn name(&self) -> &'static str {
        "Pong"
    }

    fn banner(&self) -> &'static [&'static str] {
        BANNER
    }

    fn pacing(&self) -> Pacing {
        PACING
    }

    fn update(&mut self, key: KeyEvent) -> Status {
        if self.is_game_over() {
            return self.status();
        }
        self.move_player(key);
        self.track_ball();
        self.move_ball();
        self.status()
    }

    fn status(&self) -> Status {
        match self.target_score {
            Some(target) if self.state.player_score >= target => Status::Won,
            Some(target) if self.state.computer_score >= target => Status::Lost,
            _ => Status::Running,
        }
    }

    fn state(&self) -> &PongState {
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

        let mut status = vec![
            Span::styled(
                format!(" Computer: {} ", self.state.computer_score),
                Style::default().fg(Color::Rgb(220, 90, 90)).add_modifier(Modifier::BOLD),
            ),
            Span::styled("│", Style::default().fg(Color::DarkGray)),
            Span::styled(
                format!(" Player: {} ", self.state.player_score),
                Style::default().fg(Color::Rgb(90, 180, 255)).add_modifier(Modifier::BOLD),
            ),
        ];
        if let Some(target) = self.target_score {
            status.push(Span::styled("│", Style::default().fg(Color::DarkGray)));
            status.push(Span::styled(format!(" First to {} ", target), Style::default().fg(Color::Gray)));
        }
        frame.render_widget(Paragraph::new(Line::from(status)), chunks[0]);
        frame.render_widget(Paragraph::new(self.render_field()), chunks[1]);
    }

    fn reset(&mut self) {
        let seed = self.rng.gen();
        *self = Pong::new(seed, self.target_score);
    }

    fn summary(&self) -> String {
        format!(
            "Computer: {} | Player: {}",
            self.state.computer_score, self.state.player_score
        )
    }

    fn controls(&self) -> &'static str {
        "W/S or ↑↓ move paddle │ SPACE quit"
    }
}
