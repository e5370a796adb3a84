pub mod title;

use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::games::{Game, Status};
use crate::session::{EndReason, GameSession, Phase};

pub fn render<G: Game>(frame: &mut Frame, session: &GameSession<G>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),   // Content
            Constraint::Length(1), // Controls
        ])
        .split(frame.area());

    let game = session.game();
    render_header(frame, session, chunks[0]);

    match session.phase() {
        Phase::Title => {
            title::render_title(frame, chunks[1], game.name(), game.banner(), game.controls());
        }
        Phase::Playing | Phase::GameOver | Phase::Exit => {
            game.render(frame, chunks[1]);
            let controls = Paragraph::new(Span::styled(
                game.controls(),
                Style::default().fg(Color::Rgb(100, 100, 130)),
            ))
            .alignment(Alignment::Center);
            frame.render_widget(controls, chunks[2]);
        }
    }

    // Game-over overlay (renders on top of everything)
    if matches!(session.phase(), Phase::GameOver | Phase::Exit) {
        render_game_over(frame, frame.area(), session);
    }
}

fn render_header<G: Game>(frame: &mut Frame, session: &GameSession<G>, area: Rect) {
    let (label, color) = match session.phase() {
        Phase::Title => ("Title", Color::Rgb(120, 120, 140)),
        Phase::Playing => ("Playing", Color::Rgb(80, 220, 80)),
        Phase::GameOver | Phase::Exit => ("Game Over", Color::Rgb(220, 80, 80)),
    };
    let mut spans = vec![
        Span::styled(
            session.game().name(),
            Style::default().fg(Color::Rgb(255, 220, 80)).add_modifier(Modifier::BOLD),
        ),
        Span::styled(" │ ", Style::default().fg(Color::Rgb(60, 60, 80))),
        Span::styled(label, Style::default().fg(color)),
    ];
    if session.rounds() > 1 {
        spans.push(Span::styled(" │ ", Style::default().fg(Color::Rgb(60, 60, 80))));
        spans.push(Span::styled(
            format!("Round {}", session.rounds()),
            Style::default().fg(Color::White),
        ));
    }

    let header = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Rgb(60, 150, 200)))
            .border_type(BorderType::Rounded)
            .title(" 🕹 termcade ")
            .title_style(
                Style::default()
                    .fg(Color::Rgb(200, 120, 255))
                    .add_modifier(Modifier::BOLD),
            ),
    );
    frame.render_widget(header, area);
}

fn render_game_over<G: Game>(frame: &mut Frame, area: Rect, session: &GameSession<G>) {
    let summary = session.game().summary();
    let overlay_w = (summary.chars().count() as u16 + 8).max(36).min(area.width.saturating_sub(4));
    let overlay_h = 9u16.min(area.height.saturating_sub(4));
    let x = area.x + (area.width.saturating_sub(overlay_w)) / 2;
    let y = area.y + (area.height.saturating_sub(overlay_h)) / 2;
    let overlay_area = Rect::new(x, y, overlay_w, overlay_h);

    // Clear background
    frame.render_widget(Clear, overlay_area);

    let (heading, color) = match session.end_reason() {
        Some(EndReason::Finished(Status::Won)) => (" YOU WIN! ", Color::Rgb(80, 220, 80)),
        Some(EndReason::Finished(Status::Lost)) => (" GAME OVER ", Color::Rgb(220, 80, 80)),
        Some(EndReason::Finished(Status::Tie)) => (" TIE ", Color::Rgb(255, 220, 80)),
        Some(EndReason::TimedOut) => (" TIME UP ", Color::Rgb(255, 160, 60)),
        _ => (" GAME OVER ", Color::Rgb(180, 180, 200)),
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Double)
        .border_style(Style::default().fg(color))
        .title(heading)
        .title_style(Style::default().fg(color).add_modifier(Modifier::BOLD))
        .style(Style::default().bg(Color::Rgb(15, 15, 25)));
    let inner = block.inner(overlay_area);
    frame.render_widget(block, overlay_area);

    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            summary,
            Style::default().fg(Color::Rgb(255, 255, 255)).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];
    if session.replay_available() {
        lines.push(Line::from(vec![
            Span::styled("Enter", Style::default().fg(Color::Rgb(80, 200, 255)).add_modifier(Modifier::BOLD)),
            Span::styled(" play again  ", Style::default().fg(Color::Rgb(100, 100, 130))),
            Span::styled("Space", Style::default().fg(Color::Rgb(80, 200, 255)).add_modifier(Modifier::BOLD)),
            Span::styled(" quit", Style::default().fg(Color::Rgb(100, 100, 130))),
        ]));
    } else {
        lines.push(Line::from(Span::styled(
            "Thanks for playing!",
            Style::default().fg(Color::Rgb(100, 100, 130)),
        )));
    }

    let p = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .style(Style::default().bg(Color::Rgb(15, 15, 25)));
    frame.render_widget(p, inner);
}
