pub mod app;
pub mod autocomplete;
pub mod event;
pub mod theme;
pub mod ui;

use std::io::{self, IsTerminal};
use std::time::Instant;

use anyhow::Result;
use crossterm::ExecutableCommand;
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use placefind_core::PlacefindError;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tracing::info;

use app::App;
use event::EventHandler;

/// Mount the widget on the terminal and run until the user quits.
///
/// Fails with [`PlacefindError::MountPointMissing`] when stdout is not a
/// terminal.
pub fn run_tui(app: &mut App) -> Result<()> {
    if !io::stdout().is_terminal() {
        return Err(PlacefindError::MountPointMissing("stdout is not a terminal".to_string()).into());
    }

    // Install panic hook
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = io::stdout().execute(DisableMouseCapture);
        let _ = io::stdout().execute(LeaveAlternateScreen);
        original_hook(info);
    }));

    // Setup terminal
    enable_raw_mode()?;
    io::stdout().execute(EnterAlternateScreen)?;
    io::stdout().execute(EnableMouseCapture)?;
    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;
    info!("widget mounted");

    let event_handler = EventHandler::new(app.config.tick_rate());
    let result = event_loop(&mut terminal, app, &event_handler);

    app.unmount();

    // Restore terminal
    disable_raw_mode()?;
    io::stdout().execute(DisableMouseCapture)?;
    io::stdout().execute(LeaveAlternateScreen)?;
    info!("widget unmounted");
    result
}

fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &EventHandler,
) -> Result<()> {
    loop {
        app.tick(Instant::now());
        terminal.draw(|frame| ui::render(frame, app))?;

        let event = events.next()?;
        app.handle_event(event, Instant::now());

        if app.should_quit {
            return Ok(());
        }
    }
}
