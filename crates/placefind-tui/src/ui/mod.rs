pub mod autocomplete;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph};

use crate::app::App;

const MAX_WIDGET_WIDTH: u16 = 72;

/// Render the entire UI.
pub fn render(frame: &mut Frame, app: &mut App) {
    let size = frame.area();
    frame.render_widget(Block::default().style(Style::default().bg(app.theme.bg())), size);

    let main_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // header
            Constraint::Length(1), // spacer
            Constraint::Min(3),    // widget
            Constraint::Length(1), // status bar
        ])
        .split(size);

    render_header(frame, app, main_layout[0]);

    let body = centered_columns(MAX_WIDGET_WIDTH, main_layout[2]);
    let spin = app.now.saturating_duration_since(app.started).as_millis() as usize / 80;
    autocomplete::render(frame, &mut app.widget, &app.theme, app.now, spin, body);

    render_statusbar(frame, app, main_layout[3]);
}

fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let line = Line::from(vec![
        Span::styled(
            " placefind ",
            Style::default()
                .fg(app.theme.focus())
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled("address search", Style::default().fg(app.theme.muted())),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn render_statusbar(frame: &mut Frame, app: &App, area: Rect) {
    let color = if app.selected.is_some() {
        app.theme.success()
    } else {
        app.theme.muted()
    };
    let line = Line::from(Span::styled(
        format!(" {}", app.status_message),
        Style::default().fg(color),
    ));
    frame.render_widget(
        Paragraph::new(line).style(Style::default().bg(app.theme.active_row())),
        area,
    );
}

/// Horizontally center a column of at most `width` cells inside `area`.
pub fn centered_columns(width: u16, area: Rect) -> Rect {
    let w = width.min(area.width);
    Rect {
        x: area.x + (area.width - w) / 2,
        width: w,
        ..area
    }
}
