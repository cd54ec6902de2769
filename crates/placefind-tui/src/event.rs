use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event as CrosstermEvent, KeyEvent, KeyEventKind, MouseEvent};
use placefind_core::ListenerSet;

/// Events that the TUI can handle.
#[derive(Debug)]
pub enum AppEvent {
    /// A key press event.
    Key(KeyEvent),
    /// A mouse event (clicks, scrolls).
    Mouse(MouseEvent),
    /// Terminal was resized.
    Resize(u16, u16),
    /// Periodic tick for the debounce timer and animations.
    Tick,
}

/// Polls for terminal events with a configurable tick rate.
pub struct EventHandler {
    tick_rate: Duration,
}

impl EventHandler {
    pub fn new(tick_rate: Duration) -> Self {
        Self { tick_rate }
    }

    /// Block until the next event (key press, mouse, resize, or tick timeout).
    pub fn next(&self) -> Result<AppEvent> {
        if event::poll(self.tick_rate)? {
            match event::read()? {
                CrosstermEvent::Key(key) if key.kind != KeyEventKind::Release => {
                    Ok(AppEvent::Key(key))
                }
                CrosstermEvent::Mouse(mouse) => Ok(AppEvent::Mouse(mouse)),
                CrosstermEvent::Resize(w, h) => Ok(AppEvent::Resize(w, h)),
                _ => Ok(AppEvent::Tick),
            }
        } else {
            Ok(AppEvent::Tick)
        }
    }
}

/// Host-wide event streams that widgets subscribe to.
///
/// Cloning shares the same listener sets.
#[derive(Debug, Clone, Default)]
pub struct EventRouter {
    pub pointer: ListenerSet<MouseEvent>,
    pub keyboard: ListenerSet<KeyEvent>,
}

impl EventRouter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dispatch_key(&self, key: &KeyEvent) {
        self.keyboard.emit(key);
    }

    pub fn dispatch_pointer(&self, ev: &MouseEvent) {
        self.pointer.emit(ev);
    }
}
