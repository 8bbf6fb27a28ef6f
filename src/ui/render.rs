// Lays a RenderSnapshot out on the terminal
// Row 0 now playing, then the list body, then status bar, message/prompt and key hints

use super::snapshot::{Body, ListPane, ListRow, OverlayView, RenderSnapshot, HINT_LINE};
use crate::error::StatusKind;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, LineGauge, Paragraph},
    Frame,
};

/// Lines of chrome around the list body.
pub const CHROME_ROWS: u16 = 4;

pub fn body_rows(height: u16) -> usize {
    height.saturating_sub(CHROME_ROWS) as usize
}

pub fn draw(f: &mut Frame, snapshot: &RenderSnapshot) {
    let area = f.area();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // now playing
            Constraint::Min(0),    // list body
            Constraint::Length(1), // status bar
            Constraint::Length(1), // message or prompt
            Constraint::Length(1), // key hints
        ])
        .split(area);

    render_now_playing(f, chunks[0], snapshot);
    match &snapshot.body {
        Body::Single(pane) => render_pane(f, chunks[1], pane, Borders::NONE),
        Body::Albums { albums, songs } => {
            let columns = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
                .split(chunks[1]);
            render_pane(f, columns[0], albums, Borders::NONE);
            render_pane(f, columns[1], songs, Borders::LEFT);
        }
    }

    let bar = Paragraph::new(snapshot.status_bar.as_str())
        .style(Style::default().fg(Color::Black).bg(Color::Cyan));
    f.render_widget(bar, chunks[2]);

    render_message(f, chunks[3], snapshot);

    let hints = Paragraph::new(HINT_LINE).style(Style::default().fg(Color::DarkGray));
    f.render_widget(hints, chunks[4]);

    match &snapshot.overlay {
        Some(OverlayView::Help { lines, scroll }) => render_help(f, area, lines, *scroll),
        Some(OverlayView::Version(text)) => {
            let line = Paragraph::new(text.as_str())
                .style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD));
            f.render_widget(Clear, chunks[2]);
            f.render_widget(line, chunks[2]);
        }
        None => {}
    }
}

fn render_now_playing(f: &mut Frame, area: Rect, snapshot: &RenderSnapshot) {
    let now = &snapshot.now_playing;
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(28)])
        .split(area);

    let title = Paragraph::new(format!(" {}", now.line()))
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD));
    f.render_widget(title, columns[0]);

    if now.title.is_some() {
        let gauge = LineGauge::default()
            .filled_style(Style::default().fg(Color::Green))
            .unfilled_style(Style::default().fg(Color::DarkGray))
            .ratio(now.progress);
        f.render_widget(gauge, columns[1]);
    }
}

fn render_pane(f: &mut Frame, area: Rect, pane: &ListPane, borders: Borders) {
    let block = Block::default().borders(borders);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let width = inner.width as usize;
    let lines: Vec<Line> = pane.rows.iter().map(|row| row_line(row, width, pane.focused)).collect();
    f.render_widget(Paragraph::new(lines), inner);
}

fn row_line(row: &ListRow, width: usize, focused: bool) -> Line<'static> {
    let marker = if row.selected {
        " ► "
    } else if row.playing {
        " ♪ "
    } else {
        "   "
    };

    let stamp = row.timestamp.clone().unwrap_or_default();
    let room = width.saturating_sub(3 + stamp.chars().count() + 1);
    let mut text: String = row.text.chars().take(room).collect();
    if !stamp.is_empty() {
        let pad = room.saturating_sub(text.chars().count());
        text.push_str(&" ".repeat(pad));
        text.push(' ');
        text.push_str(&stamp);
    }

    let style = if row.selected && focused {
        Style::default().fg(Color::Black).bg(Color::Yellow)
    } else if row.selected {
        Style::default().add_modifier(Modifier::REVERSED)
    } else if row.playing {
        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };

    Line::from(vec![Span::raw(marker), Span::raw(text)]).style(style)
}

fn render_message(f: &mut Frame, area: Rect, snapshot: &RenderSnapshot) {
    let paragraph = if let Some(prompt) = &snapshot.prompt {
        Paragraph::new(format!(" {}", prompt.text())).style(Style::default().fg(Color::Cyan))
    } else if let Some((text, kind)) = &snapshot.status {
        let (icon, color) = match kind {
            StatusKind::Info => ("✓", Color::Green),
            StatusKind::Error => ("✗", Color::Red),
        };
        Paragraph::new(format!(" {} {}", icon, text)).style(Style::default().fg(color))
    } else {
        Paragraph::new("")
    };
    f.render_widget(paragraph, area);
}

fn render_help(f: &mut Frame, area: Rect, lines: &[String], scroll: usize) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(area);

    let visible: Vec<Line> = lines
        .iter()
        .skip(scroll)
        .take(chunks[0].height as usize)
        .map(|line| Line::raw(line.clone()))
        .collect();

    f.render_widget(Clear, area);
    f.render_widget(Paragraph::new(visible), chunks[0]);

    let footer = format!(
        " Scroll: j/k or Up/Down | q to exit | Line {}/{}",
        scroll + 1,
        lines.len()
    );
    f.render_widget(
        Paragraph::new(footer).style(Style::default().fg(Color::Black).bg(Color::Cyan)),
        chunks[1],
    );
}
