use ratatui::prelude::*;
use ratatui::widgets::*;

pub fn render_title(frame: &mut Frame, area: Rect, name: &str, banner: &[&str], controls: &str) {
    let banner_h = banner.len() as u16 + 2;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(banner_h), // Banner
            Constraint::Length(1),
            Constraint::Length(5), // Controls
            Constraint::Length(2), // Prompt
            Constraint::Min(0),
        ])
        .split(area);

    let banner_lines: Vec<Line> = banner
        .iter()
        .map(|row| {
            Line::from(Span::styled(
                *row,
                Style::default().fg(Color::Rgb(80, 200, 255)).add_modifier(Modifier::BOLD),
            ))
        })
        .collect();
    let banner_widget = Paragraph::new(banner_lines).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Double)
            .border_style(Style::default().fg(Color::Rgb(60, 150, 200))),
    );
    frame.render_widget(banner_widget, chunks[1]);

    let controls_widget = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(controls, Style::default().fg(Color::Rgb(140, 140, 140)))),
    ])
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::Rgb(50, 100, 140)))
            .title(format!(" 🎮 {} Control ", name))
            .title_style(Style::default().fg(Color::Rgb(255, 220, 80)).add_modifier(Modifier::BOLD)),
    );
    frame.render_widget(controls_widget, chunks[3]);

    let prompt = Paragraph::new(Line::from(vec![
        Span::styled("▶ Press ", Style::default().fg(Color::Rgb(100, 100, 130))),
        Span::styled("ENTER", Style::default().fg(Color::Rgb(255, 220, 80)).add_modifier(Modifier::BOLD)),
        Span::styled(" to play", Style::default().fg(Color::Rgb(100, 100, 130))),
    ]))
    .alignment(Alignment::Center);
    frame.render_widget(prompt, chunks[4]);
}
