use std::time::Instant;

use placefind_core::{QueryState, SearchOption};
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, Paragraph};

use crate::autocomplete::{AutoComplete, Hitbox};
use crate::theme::Theme;

const SPINNER: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
const INPUT_HEIGHT: u16 = 3;

pub const LOADING_TEXT: &str = "Loading...";
pub const EMPTY_TEXT: &str = "No Option";

/// What the dropdown body shows, in precedence order.
#[derive(Debug, PartialEq, Eq)]
pub enum DropdownBody<'a> {
    Loading,
    Error(&'a str),
    Empty,
    Options(&'a [SearchOption]),
}

impl<'a> DropdownBody<'a> {
    pub fn from_state(state: &'a QueryState) -> Self {
        match state {
            QueryState::Fetching => Self::Loading,
            QueryState::Failed(msg) => Self::Error(msg),
            QueryState::Idle => Self::Empty,
            QueryState::Ready(result) => match result.data.as_deref() {
                Some(options) if !options.is_empty() => Self::Options(options),
                _ => Self::Empty,
            },
        }
    }

    fn rows(&self) -> usize {
        match self {
            Self::Options(options) => options.len(),
            _ => 1,
        }
    }
}

/// Draw the input and, when open, the dropdown. Records the hitbox used
/// for pointer handling.
pub fn render(
    frame: &mut Frame,
    widget: &mut AutoComplete,
    theme: &Theme,
    now: Instant,
    spin: usize,
    area: Rect,
) {
    if area.height < INPUT_HEIGHT {
        widget.set_hitbox(Hitbox::default());
        return;
    }

    let input_area = Rect {
        height: INPUT_HEIGHT,
        ..area
    };
    let state = widget.query_state();
    render_input(frame, widget, &state, theme, spin, input_area);

    let mut hitbox = Hitbox {
        input: input_area,
        ..Hitbox::default()
    };

    let below = Rect {
        y: area.y + INPUT_HEIGHT,
        height: area.height - INPUT_HEIGHT,
        ..area
    };
    if widget.is_open() && below.height > 2 {
        render_dropdown(frame, widget, &state, theme, now, below, &mut hitbox);
    }

    widget.set_hitbox(hitbox);
}

fn render_input(
    frame: &mut Frame,
    widget: &AutoComplete,
    state: &QueryState,
    theme: &Theme,
    spin: usize,
    area: Rect,
) {
    let border = if widget.is_focused() {
        theme.focus()
    } else {
        theme.border()
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border))
        .style(Style::default().bg(theme.bg()));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let adornment = if state.is_fetching() {
        Span::styled(SPINNER[spin % SPINNER.len()], Style::default().fg(theme.spinner()))
    } else if widget.is_open() {
        Span::styled("▲", Style::default().fg(theme.focus()))
    } else {
        Span::styled("▼", Style::default().fg(theme.muted()))
    };

    let text = widget.current_text();
    let mut spans = vec![Span::raw(" ")];
    if text.is_empty() {
        spans.push(Span::styled(
            widget.placeholder().to_string(),
            Style::default().fg(theme.muted()),
        ));
    } else {
        spans.push(Span::styled(text.to_string(), Style::default().fg(theme.fg_bright())));
    }
    if widget.is_focused() {
        spans.push(Span::styled("▏", Style::default().fg(theme.focus())));
    }

    let used: usize = spans.iter().map(|s| s.content.chars().count()).sum();
    let pad = usize::from(inner.width).saturating_sub(used + 2);
    spans.push(Span::raw(" ".repeat(pad)));
    spans.push(adornment);

    frame.render_widget(Paragraph::new(Line::from(spans)), inner);
}

fn render_dropdown(
    frame: &mut Frame,
    widget: &AutoComplete,
    state: &QueryState,
    theme: &Theme,
    now: Instant,
    area: Rect,
    hitbox: &mut Hitbox,
) {
    let body = DropdownBody::from_state(state);
    let progress = widget.reveal_progress(now);

    let visible = body.rows().min(widget.max_visible()).max(1);
    let revealed = ((visible as f64 * progress).ceil() as usize).clamp(1, visible);
    let max_rows = usize::from(area.height.saturating_sub(2));
    let rows = revealed.min(max_rows);
    let height = rows as u16 + 2;

    let rect = Rect { height, ..area };
    frame.render_widget(Clear, rect);

    let mut block_style = Style::default().bg(theme.bg());
    if progress < 0.5 {
        block_style = block_style.add_modifier(Modifier::DIM);
    }
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border()))
        .style(block_style);
    let inner = block.inner(rect);
    frame.render_widget(block, rect);
    hitbox.dropdown = Some(rect);

    match body {
        DropdownBody::Loading => message(frame, LOADING_TEXT, theme.muted(), inner),
        DropdownBody::Empty => message(frame, EMPTY_TEXT, theme.muted(), inner),
        DropdownBody::Error(msg) => {
            message(frame, &format!("⚠ Search failed: {msg}"), theme.danger(), inner)
        }
        DropdownBody::Options(options) => {
            let selection = widget.selection();
            let scroll = match selection {
                Some(sel) if sel >= rows => sel + 1 - rows,
                _ => 0,
            };

            let items: Vec<ListItem> = options
                .iter()
                .enumerate()
                .skip(scroll)
                .take(rows)
                .map(|(i, option)| {
                    let active = selection == Some(i);
                    let (prefix, style) = if active {
                        (
                            "▶ ",
                            Style::default()
                                .bg(theme.active_row())
                                .fg(theme.fg_bright())
                                .add_modifier(Modifier::BOLD),
                        )
                    } else {
                        ("  ", Style::default().fg(theme.fg()))
                    };
                    ListItem::new(Line::from(vec![
                        Span::styled(prefix, Style::default().fg(theme.marker())),
                        Span::raw(option.address.clone()),
                    ]))
                    .style(style)
                })
                .collect();

            frame.render_widget(List::new(items), inner);
            hitbox.options = Some(inner);
            hitbox.scroll = scroll;
        }
    }
}

fn message(frame: &mut Frame, text: &str, color: ratatui::style::Color, area: Rect) {
    let line = Line::from(Span::styled(format!(" {text}"), Style::default().fg(color)));
    frame.render_widget(Paragraph::new(line), area);
}
