use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use super::App;
use crate::display;

/// Render the recommendations for the selected title.
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Selected song
            Constraint::Min(5),    // Recommendations
            Constraint::Length(3), // Help bar
        ])
        .split(area);

    let selected = app.selected_title.as_deref().unwrap_or_default();
    let header = Paragraph::new(format!("Top Recommendations for \"{selected}\""))
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(header, chunks[0]);

    let mut lines: Vec<Line> = Vec::new();
    if app.results.is_empty() {
        lines.push(Line::from("No recommendations."));
    }
    for (rank, recommendation) in app.results.iter().enumerate() {
        if rank > 0 {
            lines.push(Line::from(""));
        }
        lines.push(Line::from(vec![
            Span::styled(
                format!("{}. {}", rank + 1, display::heading(recommendation)),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("  {:.3}", recommendation.recommendation.score),
                Style::default().fg(Color::DarkGray),
            ),
        ]));
        for (label, value) in display::detail_lines(recommendation) {
            let style = if value == display::NOT_FOUND {
                Style::default().fg(Color::DarkGray)
            } else {
                Style::default()
            };
            lines.push(Line::from(vec![
                Span::styled(format!("   {label}: "), Style::default().fg(Color::Yellow)),
                Span::styled(value, style),
            ]));
        }
    }

    let body = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(Block::default().borders(Borders::ALL).title("Recommendations"));
    frame.render_widget(body, chunks[1]);

    let help = Paragraph::new("  Esc/b Back  q Quit")
        .style(Style::default().fg(Color::DarkGray))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(help, chunks[2]);
}
