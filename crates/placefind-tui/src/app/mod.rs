use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent};
use placefind_core::{AppConfig, ListenerGuard, QueryCache, SearchOption};
use tokio::sync::mpsc::{UnboundedReceiver, unbounded_channel};

use crate::autocomplete::AutoComplete;
use crate::event::{AppEvent, EventRouter};
use crate::theme::Theme;

/// Root view: hosts the autocomplete widget and the status bar.
pub struct App {
    pub should_quit: bool,

    /// App configuration.
    pub config: AppConfig,

    pub theme: Theme,

    /// Global pointer and keyboard streams.
    pub router: EventRouter,

    pub widget: AutoComplete,

    /// Status bar message.
    pub status_message: String,

    /// Last option committed by the widget.
    pub selected: Option<SearchOption>,

    /// Clock value of the latest tick or event.
    pub now: Instant,

    /// When the view was created. Drives the spinner.
    pub started: Instant,

    selections: UnboundedReceiver<SearchOption>,
    _selection_guard: ListenerGuard,
}

impl App {
    /// Build the root view around an injected request cache.
    pub fn new(config: AppConfig, cache: QueryCache) -> Self {
        let router = EventRouter::new();
        let mut widget = AutoComplete::new(cache, &config);
        widget.mount(&router);

        let (tx, selections) = unbounded_channel();
        let selection_guard = widget.on_select(move |option| {
            let _ = tx.send(option.clone());
        });

        let started = Instant::now();
        Self {
            should_quit: false,
            config,
            theme: Theme::default(),
            router,
            widget,
            status_message: default_status(),
            selected: None,
            now: started,
            started,
            selections,
            _selection_guard: selection_guard,
        }
    }

    pub fn handle_event(&mut self, event: AppEvent, now: Instant) {
        match event {
            AppEvent::Key(key) => self.handle_key(key, now),
            AppEvent::Mouse(ev) => self.handle_mouse(ev, now),
            AppEvent::Resize(_, _) | AppEvent::Tick => {}
        }
        self.tick(now);
    }

    pub fn tick(&mut self, now: Instant) {
        self.now = now;
        self.widget.tick(now);
        self.drain_selections();
    }

    pub fn handle_key(&mut self, key: KeyEvent, now: Instant) {
        self.now = now;
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        if self.widget.is_focused() {
            if key.code == KeyCode::Tab {
                self.widget.blur();
            } else {
                self.router.dispatch_key(&key);
                self.widget.pump(now);
            }
        } else {
            match key.code {
                KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
                KeyCode::Tab | KeyCode::Enter | KeyCode::Char('/') | KeyCode::Char('i') => {
                    self.widget.focus(now);
                }
                _ => {}
            }
        }
        self.drain_selections();
    }

    pub fn handle_mouse(&mut self, ev: MouseEvent, now: Instant) {
        self.now = now;
        self.router.dispatch_pointer(&ev);
        self.widget.pump(now);
        self.drain_selections();
    }

    /// Tear down the widget's global listeners.
    pub fn unmount(&mut self) {
        self.widget.unmount();
    }

    fn drain_selections(&mut self) {
        while let Ok(option) = self.selections.try_recv() {
            self.status_message = format!("Selected: {} ({})", option.address, option.place_id);
            self.selected = Some(option);
        }
    }
}

fn default_status() -> String {
    "Tab focus · ↑↓ move · Enter select · Esc close · q quit".to_string()
}
