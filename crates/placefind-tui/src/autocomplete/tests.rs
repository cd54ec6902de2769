use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use crossterm::event::{
    KeyCode, KeyEvent, KeyEventKind, KeyEventState, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};
use placefind_core::{AppConfig, MemorySource, QueryCache, QueryResult, QueryState, SearchOption};
use proptest::prelude::*;
use ratatui::layout::Rect;

use super::*;
use crate::event::EventRouter;

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent {
        code,
        modifiers: KeyModifiers::NONE,
        kind: KeyEventKind::Press,
        state: KeyEventState::NONE,
    }
}

fn click(column: u16, row: u16) -> MouseEvent {
    MouseEvent {
        kind: MouseEventKind::Down(MouseButton::Left),
        column,
        row,
        modifiers: KeyModifiers::NONE,
    }
}

fn options(n: usize) -> QueryResult {
    QueryResult::with_options(
        (0..n)
            .map(|i| SearchOption::new(format!("id{i}"), format!("Address {i}")))
            .collect(),
    )
}

fn widget_with(source: Arc<MemorySource>) -> AutoComplete {
    AutoComplete::new(QueryCache::new(source), &AppConfig::default())
}

fn type_text(w: &mut AutoComplete, text: &str, at: Instant) {
    for c in text.chars() {
        w.insert_char(c, at);
    }
}

async fn settle(w: &AutoComplete) {
    w.cache().fetch(&w.query_key()).await;
}

/// Focused, open widget showing `n` options for "road".
async fn widget_with_options(n: usize) -> (AutoComplete, Instant) {
    let source = Arc::new(MemorySource::new().respond("road", options(n)));
    let mut w = widget_with(source);
    let t0 = Instant::now();
    w.focus(t0);
    type_text(&mut w, "road", t0);
    w.tick(t0 + ms(800));
    settle(&w).await;
    (w, t0 + ms(900))
}

// ─── Debounce ──────────────────────────────────────────────

#[tokio::test]
async fn test_single_word_fires_one_request() {
    let source = Arc::new(MemorySource::new().respond("pizza", options(2)));
    let mut w = widget_with(source.clone());
    let t0 = Instant::now();

    for (i, c) in "pizza".chars().enumerate() {
        w.insert_char(c, t0 + ms(i as u64 * 50));
        w.tick(t0 + ms(i as u64 * 50));
    }
    assert_eq!(w.current_text(), "pizza");
    assert_eq!(w.debounced_text(), "");

    w.tick(t0 + ms(1000));
    settle(&w).await;
    w.tick(t0 + ms(2000));

    assert_eq!(w.debounced_text(), "pizza");
    assert_eq!(source.requested(), vec!["pizza".to_string()]);
}

#[tokio::test]
async fn test_rapid_typing_coalesces() {
    let source = Arc::new(MemorySource::new());
    let mut w = widget_with(source.clone());
    let t0 = Instant::now();

    w.set_text("p", t0);
    w.tick(t0);
    w.set_text("pi", t0 + ms(100));
    w.tick(t0 + ms(100));
    w.set_text("piz", t0 + ms(200));
    w.tick(t0 + ms(200));

    // First deadline has passed, but it was re-armed.
    w.tick(t0 + ms(760));
    assert_eq!(w.debounced_text(), "");

    w.tick(t0 + ms(1200));
    settle(&w).await;
    assert_eq!(source.requested(), vec!["piz".to_string()]);
}

#[tokio::test]
async fn test_clearing_text_cancels_pending() {
    let source = Arc::new(MemorySource::new());
    let mut w = widget_with(source.clone());
    let t0 = Instant::now();

    w.set_text("a", t0);
    w.backspace(t0 + ms(100));
    assert_eq!(w.current_text(), "");
    assert!(w.debounce_deadline().is_none());

    w.tick(t0 + ms(2000));
    assert_eq!(w.debounced_text(), "");
    assert_eq!(source.calls(), 0);
    assert!(matches!(w.query_state(), QueryState::Idle));
}

#[tokio::test]
async fn test_repeated_key_is_served_from_cache() {
    let source = Arc::new(MemorySource::new().respond("bar", options(1)));
    let mut w = widget_with(source.clone());
    let t0 = Instant::now();

    w.set_text("bar", t0);
    w.tick(t0 + ms(800));
    settle(&w).await;

    w.set_text("baz", t0 + ms(1000));
    w.tick(t0 + ms(1800));
    settle(&w).await;

    w.set_text("bar", t0 + ms(2000));
    w.tick(t0 + ms(2800));
    assert_eq!(w.option_count(), 1);
    assert_eq!(source.calls(), 2);
}

// ─── Dropdown ──────────────────────────────────────────────

#[tokio::test]
async fn test_initially_closed_and_focus_opens() {
    let mut w = widget_with(Arc::new(MemorySource::new()));
    assert_eq!(w.dropdown(), Dropdown::Closed);
    assert_eq!(w.selection_index(), -1);

    w.focus(Instant::now());
    assert!(w.is_open());
    assert_eq!(w.selection_index(), -1);
}

#[tokio::test]
async fn test_outside_click_closes_and_resets_selection() {
    let (mut w, now) = widget_with_options(3).await;
    w.set_hitbox(Hitbox {
        input: Rect::new(0, 0, 40, 3),
        dropdown: Some(Rect::new(0, 3, 40, 5)),
        options: Some(Rect::new(1, 4, 38, 3)),
        scroll: 0,
    });
    w.handle_key(key(KeyCode::Down), now);
    w.handle_key(key(KeyCode::Down), now);
    assert_eq!(w.selection_index(), 1);

    w.handle_pointer(click(60, 15), now);
    assert_eq!(w.dropdown(), Dropdown::Closed);
    assert_eq!(w.selection_index(), -1);
    assert!(!w.is_focused());
}

#[tokio::test]
async fn test_click_inside_dropdown_border_keeps_it_open() {
    let (mut w, now) = widget_with_options(3).await;
    w.set_hitbox(Hitbox {
        input: Rect::new(0, 0, 40, 3),
        dropdown: Some(Rect::new(0, 3, 40, 5)),
        options: Some(Rect::new(1, 4, 38, 3)),
        scroll: 0,
    });

    w.handle_pointer(click(0, 3), now);
    assert!(w.is_open());
}

#[tokio::test]
async fn test_click_on_input_reopens() {
    let (mut w, now) = widget_with_options(3).await;
    w.set_hitbox(Hitbox {
        input: Rect::new(0, 0, 40, 3),
        ..Hitbox::default()
    });
    w.close();

    w.handle_pointer(click(5, 1), now);
    assert!(w.is_open());
    assert!(w.is_focused());
    assert_eq!(w.selection_index(), -1);
}

// ─── Keyboard ──────────────────────────────────────────────

#[tokio::test]
async fn test_arrow_down_clamps_at_last_option() {
    let (mut w, now) = widget_with_options(3).await;
    for _ in 0..4 {
        w.handle_key(key(KeyCode::Down), now);
    }
    assert_eq!(w.selection_index(), 2);
}

#[tokio::test]
async fn test_arrow_up_rules() {
    let (mut w, now) = widget_with_options(3).await;

    w.handle_key(key(KeyCode::Up), now);
    assert_eq!(w.selection_index(), -1);

    w.handle_key(key(KeyCode::Down), now);
    w.handle_key(key(KeyCode::Up), now);
    assert_eq!(w.selection_index(), 0);

    w.handle_key(key(KeyCode::Down), now);
    w.handle_key(key(KeyCode::Down), now);
    w.handle_key(key(KeyCode::Up), now);
    assert_eq!(w.selection_index(), 1);
}

#[tokio::test]
async fn test_navigation_ignored_while_fetching() {
    let source = Arc::new(MemorySource::new().with_latency(Duration::from_secs(60)));
    let mut w = widget_with(source);
    let t0 = Instant::now();
    w.focus(t0);
    w.set_text("slow", t0);
    w.tick(t0 + ms(800));
    assert!(w.is_fetching());

    w.handle_key(key(KeyCode::Down), t0 + ms(900));
    assert_eq!(w.selection_index(), -1);
}

#[tokio::test]
async fn test_navigation_ignored_while_closed() {
    let (mut w, now) = widget_with_options(3).await;
    w.close();
    w.handle_key(key(KeyCode::Down), now);
    assert_eq!(w.selection_index(), -1);
}

#[tokio::test]
async fn test_enter_commits_to_listeners() {
    let (mut w, now) = widget_with_options(3).await;
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let _guard = w.on_select(move |option| {
        sink.lock().unwrap().push(option.place_id.clone());
    });

    w.handle_key(key(KeyCode::Enter), now);
    assert!(seen.lock().unwrap().is_empty());

    w.handle_key(key(KeyCode::Down), now);
    w.handle_key(key(KeyCode::Down), now);
    w.handle_key(key(KeyCode::Enter), now);
    assert_eq!(*seen.lock().unwrap(), vec!["id1".to_string()]);
    assert_eq!(w.last_committed().map(|o| o.address.as_str()), Some("Address 1"));
}

#[tokio::test]
async fn test_escape_closes_and_blurs() {
    let (mut w, now) = widget_with_options(2).await;
    w.handle_key(key(KeyCode::Down), now);
    w.handle_key(key(KeyCode::Esc), now);
    assert!(!w.is_open());
    assert!(!w.is_focused());
    assert_eq!(w.selection_index(), -1);
}

#[tokio::test]
async fn test_new_key_resets_selection() {
    let source = Arc::new(
        MemorySource::new()
            .respond("road", options(3))
            .respond("roads", options(1)),
    );
    let mut w = widget_with(source);
    let t0 = Instant::now();
    w.focus(t0);
    w.set_text("road", t0);
    w.tick(t0 + ms(800));
    settle(&w).await;
    w.handle_key(key(KeyCode::Down), t0 + ms(900));
    w.handle_key(key(KeyCode::Down), t0 + ms(900));
    w.handle_key(key(KeyCode::Down), t0 + ms(900));
    assert_eq!(w.selection_index(), 2);

    w.insert_char('s', t0 + ms(1000));
    w.tick(t0 + ms(1800));
    assert_eq!(w.selection_index(), -1);
}

// ─── Listeners ─────────────────────────────────────────────

#[tokio::test]
async fn test_key_listener_follows_focus() {
    let router = EventRouter::new();
    let mut w = widget_with(Arc::new(MemorySource::new()));
    w.mount(&router);
    assert_eq!(router.pointer.len(), 1);
    assert!(router.keyboard.is_empty());

    let t0 = Instant::now();
    w.focus(t0);
    assert_eq!(router.keyboard.len(), 1);

    router.dispatch_key(&key(KeyCode::Char('x')));
    w.pump(t0);
    assert_eq!(w.current_text(), "x");

    w.blur();
    assert!(router.keyboard.is_empty());
    router.dispatch_key(&key(KeyCode::Char('y')));
    w.pump(t0);
    assert_eq!(w.current_text(), "x");

    w.focus(t0);
    w.focus(t0);
    assert_eq!(router.keyboard.len(), 1);
}

#[tokio::test]
async fn test_drop_releases_listeners() {
    let router = EventRouter::new();
    {
        let mut w = widget_with(Arc::new(MemorySource::new()));
        w.mount(&router);
        w.focus(Instant::now());
        assert_eq!(router.pointer.len(), 1);
        assert_eq!(router.keyboard.len(), 1);
    }
    assert!(router.pointer.is_empty());
    assert!(router.keyboard.is_empty());
}

// ─── Stale responses ───────────────────────────────────────

#[tokio::test]
async fn test_superseded_response_is_not_shown() {
    let source = Arc::new(
        MemorySource::new()
            .respond("a", options(5))
            .respond("ab", options(1)),
    );
    let mut w = widget_with(source);
    let t0 = Instant::now();

    w.set_text("a", t0);
    w.tick(t0 + ms(800));
    w.set_text("ab", t0 + ms(850));
    w.tick(t0 + ms(1700));

    settle(&w).await;
    w.cache().fetch(&placefind_core::QueryKey::place("a")).await;

    assert_eq!(w.debounced_text(), "ab");
    assert_eq!(w.option_count(), 1);
}

// ─── Properties ────────────────────────────────────────────

#[test]
fn test_step_functions() {
    assert_eq!(step_down(None, 0), None);
    assert_eq!(step_down(None, 3), Some(0));
    assert_eq!(step_down(Some(2), 3), Some(2));
    assert_eq!(step_up(None), None);
    assert_eq!(step_up(Some(0)), Some(0));
    assert_eq!(step_up(Some(2)), Some(1));
}

proptest! {
    #[test]
    fn selection_stays_in_bounds(count in 0usize..20, moves in proptest::collection::vec(any::<bool>(), 0..64)) {
        let mut selection = None;
        for down in moves {
            selection = if down { step_down(selection, count) } else { step_up(selection) };
            let idx = selection.map_or(-1, |i| i as isize);
            prop_assert!(idx >= -1);
            prop_assert!(idx <= count as isize - 1);
        }
    }
}
