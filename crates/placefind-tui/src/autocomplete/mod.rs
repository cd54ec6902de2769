mod input;

use std::time::{Duration, Instant};

use crossterm::event::{KeyEvent, MouseEvent};
use placefind_core::{
    AppConfig, Debouncer, ListenerGuard, ListenerSet, QueryCache, QueryKey, QueryState,
    SearchOption,
};
use ratatui::layout::Rect;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};
use tracing::{debug, info};

use crate::event::EventRouter;

pub use input::{step_down, step_up};

/// Dropdown visibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dropdown {
    Closed,
    Open { opened_at: Instant },
}

/// Input forwarded from the global listeners into the widget.
#[derive(Debug, Clone, Copy)]
pub enum WidgetInput {
    Key(KeyEvent),
    Pointer(MouseEvent),
}

/// Screen regions recorded by the last render, used for pointer hit tests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Hitbox {
    pub input: Rect,
    /// Whole dropdown container, borders included.
    pub dropdown: Option<Rect>,
    /// Rows that hold options.
    pub options: Option<Rect>,
    /// Index of the option drawn on the first row of `options`.
    pub scroll: usize,
}

/// Debounced address-search autocomplete.
///
/// All state lives here. Time is passed in explicitly: [`tick`](Self::tick)
/// advances the debounce timer and must be called regularly by the host.
pub struct AutoComplete {
    cache: QueryCache,
    debouncer: Debouncer<String>,

    dropdown: Dropdown,
    current_text: String,
    debounced_text: String,
    /// `None` means no keyboard selection.
    selection: Option<usize>,
    focused: bool,
    /// Reserved. Query state is authoritative for loading.
    loading: bool,

    placeholder: String,
    max_visible: usize,
    reveal: Duration,
    hitbox: Hitbox,
    last_committed: Option<SearchOption>,

    on_select: ListenerSet<SearchOption>,
    inbox_tx: UnboundedSender<WidgetInput>,
    inbox_rx: UnboundedReceiver<WidgetInput>,
    router: Option<EventRouter>,
    pointer_guard: Option<ListenerGuard>,
    key_guard: Option<ListenerGuard>,
}

impl AutoComplete {
    pub fn new(cache: QueryCache, config: &AppConfig) -> Self {
        let (inbox_tx, inbox_rx) = unbounded_channel();
        Self {
            cache,
            debouncer: Debouncer::new(config.debounce()),
            dropdown: Dropdown::Closed,
            current_text: String::new(),
            debounced_text: String::new(),
            selection: None,
            focused: false,
            loading: false,
            placeholder: config.ui.placeholder.clone(),
            max_visible: usize::from(config.ui.max_visible_options.max(1)),
            reveal: config.reveal(),
            hitbox: Hitbox::default(),
            last_committed: None,
            on_select: ListenerSet::new(),
            inbox_tx,
            inbox_rx,
            router: None,
            pointer_guard: None,
            key_guard: None,
        }
    }

    // ─── Lifecycle ─────────────────────────────────────────

    /// Attach to the host's global event streams. The pointer listener
    /// lives until [`unmount`](Self::unmount); the keyboard listener only
    /// while focused.
    pub fn mount(&mut self, router: &EventRouter) {
        self.unmount();
        let tx = self.inbox_tx.clone();
        self.pointer_guard = Some(router.pointer.subscribe(move |ev| {
            let _ = tx.send(WidgetInput::Pointer(*ev));
        }));
        self.router = Some(router.clone());
        if self.focused {
            self.subscribe_keys();
        }
    }

    /// Release every listener registered by [`mount`](Self::mount).
    pub fn unmount(&mut self) {
        self.key_guard = None;
        self.pointer_guard = None;
        self.router = None;
    }

    /// Subscribe to committed selections (Enter or click on an option).
    #[must_use = "dropping the guard unsubscribes immediately"]
    pub fn on_select<F>(&self, listener: F) -> ListenerGuard
    where
        F: Fn(&SearchOption) + Send + Sync + 'static,
    {
        self.on_select.subscribe(listener)
    }

    // ─── Focus & dropdown ──────────────────────────────────

    /// Focus the input. Focusing opens the dropdown.
    pub fn focus(&mut self, now: Instant) {
        if !self.focused {
            self.focused = true;
            self.subscribe_keys();
            debug!("autocomplete focused");
        }
        self.open(now);
    }

    pub fn blur(&mut self) {
        if self.focused {
            self.focused = false;
            self.key_guard = None;
            debug!("autocomplete blurred");
        }
    }

    pub fn open(&mut self, now: Instant) {
        if self.dropdown == Dropdown::Closed {
            self.dropdown = Dropdown::Open { opened_at: now };
            self.selection = None;
        }
    }

    /// Close the dropdown. Always clears the keyboard selection.
    pub fn close(&mut self) {
        self.dropdown = Dropdown::Closed;
        self.selection = None;
    }

    // ─── Text ──────────────────────────────────────────────

    pub fn insert_char(&mut self, c: char, now: Instant) {
        let mut text = self.current_text.clone();
        text.push(c);
        self.set_text(text, now);
    }

    pub fn backspace(&mut self, now: Instant) {
        let mut text = self.current_text.clone();
        if text.pop().is_some() {
            self.set_text(text, now);
        }
    }

    /// Replace the input text. Non-empty text re-arms the debounce timer;
    /// empty text cancels it and keeps the last debounced value.
    pub fn set_text(&mut self, text: impl Into<String>, now: Instant) {
        self.current_text = text.into();
        if self.current_text.is_empty() {
            self.debouncer.cancel();
        } else {
            self.debouncer.push(self.current_text.clone(), now);
        }
    }

    // ─── Clock ─────────────────────────────────────────────

    /// Process forwarded events, fire the debounce timer if due and keep
    /// the selection inside the current option list.
    pub fn tick(&mut self, now: Instant) {
        self.pump(now);

        if let Some(text) = self.debouncer.poll(now) {
            self.apply_debounced(text);
        }

        let count = self.option_count();
        if let Some(sel) = self.selection {
            if sel >= count {
                self.selection = count.checked_sub(1);
            }
        }
    }

    /// Handle everything the global listeners forwarded since the last call.
    pub fn pump(&mut self, now: Instant) {
        while let Ok(input) = self.inbox_rx.try_recv() {
            match input {
                WidgetInput::Key(key) => self.handle_key(key, now),
                WidgetInput::Pointer(ev) => self.handle_pointer(ev, now),
            }
        }
    }

    fn apply_debounced(&mut self, text: String) {
        if text == self.debounced_text {
            return;
        }
        debug!(text = %text, "debounced query");
        self.debounced_text = text;
        self.selection = None;
        let key = self.query_key();
        self.cache.ensure(&key);
    }

    // ─── Selection ─────────────────────────────────────────

    fn commit(&mut self, index: usize) {
        let Some(option) = self.query_state().options().get(index).cloned() else {
            return;
        };
        info!(place_id = %option.place_id, address = %option.address, "selection committed");
        self.on_select.emit(&option);
        self.last_committed = Some(option);
    }

    fn subscribe_keys(&mut self) {
        if let Some(router) = &self.router {
            let tx = self.inbox_tx.clone();
            self.key_guard = Some(router.keyboard.subscribe(move |key| {
                let _ = tx.send(WidgetInput::Key(*key));
            }));
        }
    }

    // ─── Derived state ─────────────────────────────────────

    pub fn query_key(&self) -> QueryKey {
        QueryKey::place(self.debounced_text.clone())
    }

    /// State of the query for the current debounced key. Results for any
    /// other key are never observed here.
    pub fn query_state(&self) -> QueryState {
        let key = self.query_key();
        if !key.is_enabled() {
            return QueryState::Idle;
        }
        self.cache.state(&key)
    }

    pub fn is_fetching(&self) -> bool {
        self.query_state().is_fetching()
    }

    pub fn option_count(&self) -> usize {
        self.query_state().options().len()
    }

    /// Fraction of the dropdown revealed at `now`, in `0.0..=1.0`.
    pub fn reveal_progress(&self, now: Instant) -> f64 {
        match self.dropdown {
            Dropdown::Closed => 0.0,
            Dropdown::Open { opened_at } => {
                if self.reveal.is_zero() {
                    return 1.0;
                }
                let elapsed = now.saturating_duration_since(opened_at);
                (elapsed.as_secs_f64() / self.reveal.as_secs_f64()).min(1.0)
            }
        }
    }

    // ─── Accessors ─────────────────────────────────────────

    pub fn cache(&self) -> &QueryCache {
        &self.cache
    }

    pub fn dropdown(&self) -> Dropdown {
        self.dropdown
    }

    pub fn is_open(&self) -> bool {
        matches!(self.dropdown, Dropdown::Open { .. })
    }

    pub fn current_text(&self) -> &str {
        &self.current_text
    }

    pub fn debounced_text(&self) -> &str {
        &self.debounced_text
    }

    pub fn selection(&self) -> Option<usize> {
        self.selection
    }

    /// Selection as a signed index, `-1` when nothing is selected.
    pub fn selection_index(&self) -> isize {
        self.selection.map_or(-1, |i| i as isize)
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn placeholder(&self) -> &str {
        &self.placeholder
    }

    pub fn max_visible(&self) -> usize {
        self.max_visible
    }

    pub fn last_committed(&self) -> Option<&SearchOption> {
        self.last_committed.as_ref()
    }

    pub fn debounce_deadline(&self) -> Option<Instant> {
        self.debouncer.deadline()
    }

    pub fn hitbox(&self) -> Hitbox {
        self.hitbox
    }

    pub fn set_hitbox(&mut self, hitbox: Hitbox) {
        self.hitbox = hitbox;
    }
}

#[cfg(test)]
mod tests;
