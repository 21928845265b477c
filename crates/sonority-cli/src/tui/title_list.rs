use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table};

use super::App;

/// Render the title list view.
pub fn render(frame: &mut Frame, app: &mut App) {
    let area = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title bar
            Constraint::Min(5),    // Title table
            Constraint::Length(3), // Status / help bar
        ])
        .split(area);

    render_title(frame, app, chunks[0]);
    render_table(frame, app, chunks[1]);
    render_footer(frame, app, chunks[2]);
}

fn render_title(frame: &mut Frame, app: &App, area: Rect) {
    let filter = if app.editing_filter {
        format!("    Filter: {}_", app.filter)
    } else if app.filter.is_empty() {
        String::new()
    } else {
        format!("    Filter: {}", app.filter)
    };
    let title = Paragraph::new(format!("Pick a Song    {} titles{filter}", app.titles.len()))
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(title, area);
}

fn render_table(frame: &mut Frame, app: &mut App, area: Rect) {
    let header = Row::new(vec![
        Cell::from("#").style(Style::default().fg(Color::DarkGray)),
        Cell::from("Title").style(Style::default().add_modifier(Modifier::BOLD)),
    ])
    .height(1);

    // Borders and header take three lines.
    app.set_viewport_height(usize::from(area.height.saturating_sub(3)));
    let viewport_height = app.viewport_height;
    let titles = app.visible_titles();
    let visible_start = app.offset;
    let visible_end = (visible_start + viewport_height).min(titles.len());

    let rows: Vec<Row> = titles
        .iter()
        .enumerate()
        .skip(visible_start)
        .take(viewport_height)
        .map(|(i, title)| {
            let style = if i == app.selected {
                Style::default().bg(Color::DarkGray).fg(Color::White)
            } else {
                Style::default()
            };
            Row::new(vec![
                Cell::from(format!("{}", i + 1)),
                Cell::from((*title).to_string()),
            ])
            .style(style)
        })
        .collect();

    let title = if titles.len() > viewport_height {
        format!(
            "Titles [{}-{} of {}]",
            visible_start + 1,
            visible_end,
            titles.len()
        )
    } else {
        "Titles".to_string()
    };

    let table = Table::new(rows, [Constraint::Length(6), Constraint::Percentage(90)])
        .header(header)
        .block(Block::default().borders(Borders::ALL).title(title));

    frame.render_widget(table, area);
}

fn render_footer(frame: &mut Frame, app: &App, area: Rect) {
    let (text, colour) = match &app.status {
        Some(status) => (format!("  {status}"), Color::Yellow),
        None if app.editing_filter => (
            "  Type to filter  Backspace Delete  Enter/Esc Done".to_string(),
            Color::DarkGray,
        ),
        None => (
            "  \u{2191}/k Up  \u{2193}/j Down  / Filter  Enter Recommend  q Quit".to_string(),
            Color::DarkGray,
        ),
    };
    let footer = Paragraph::new(text)
        .style(Style::default().fg(colour))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(footer, area);
}
