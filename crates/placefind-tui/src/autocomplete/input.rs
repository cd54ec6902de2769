use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Position;

use super::AutoComplete;

/// `ArrowDown`: advance by one, never past the last option.
pub fn step_down(selection: Option<usize>, count: usize) -> Option<usize> {
    let next = selection.map_or(0, |i| i + 1);
    if next < count { Some(next) } else { selection }
}

/// `ArrowUp`: no-op without a selection, stays at the first option.
pub fn step_up(selection: Option<usize>) -> Option<usize> {
    selection.map(|i| i.saturating_sub(1))
}

impl AutoComplete {
    pub fn handle_key(&mut self, key: KeyEvent, now: Instant) {
        match key.code {
            KeyCode::Char(c)
                if !key
                    .modifiers
                    .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
            {
                self.insert_char(c, now);
            }
            KeyCode::Backspace => self.backspace(now),
            KeyCode::Esc => {
                self.close();
                self.blur();
            }
            KeyCode::Down | KeyCode::Up | KeyCode::Enter => self.navigate(key.code),
            _ => {}
        }
    }

    /// Arrow and Enter handling. Ignored while the current key is in flight
    /// or the dropdown is closed.
    fn navigate(&mut self, code: KeyCode) {
        if !self.is_open() || self.is_fetching() {
            return;
        }

        match code {
            KeyCode::Down => self.selection = step_down(self.selection, self.option_count()),
            KeyCode::Up => self.selection = step_up(self.selection),
            KeyCode::Enter => {
                if let Some(index) = self.selection {
                    self.commit(index);
                }
            }
            _ => {}
        }
    }

    pub fn handle_pointer(&mut self, ev: MouseEvent, now: Instant) {
        if ev.kind != MouseEventKind::Down(MouseButton::Left) {
            return;
        }
        let pos = Position::new(ev.column, ev.row);
        let hitbox = self.hitbox;

        if hitbox.input.contains(pos) {
            self.focus(now);
            self.open(now);
            return;
        }

        let in_dropdown = self.is_open() && hitbox.dropdown.is_some_and(|r| r.contains(pos));
        if in_dropdown {
            if let Some(rows) = hitbox.options.filter(|r| r.contains(pos)) {
                let index = hitbox.scroll + usize::from(pos.y - rows.y);
                self.commit(index);
            }
            return;
        }

        self.close();
        self.blur();
    }
}
