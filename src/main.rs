//! MetroDoc entry point: terminal setup, wiring, event loop, teardown.

use std::io;
use std::time::Duration;

use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::mpsc;

use metrodoc::config::AppConfig;
use metrodoc::core::{logging, prefs::PrefsStore};
use metrodoc::tui::{app::AppState, services::Services};

#[tokio::main]
async fn main() {
    let config = AppConfig::load();
    let _log_guard = logging::init(&config.data_dir());
    log::info!("Starting {} v{}", metrodoc::NAME, metrodoc::VERSION);

    if let Err(e) = run(config).await {
        eprintln!("metrodoc: {e}");
        std::process::exit(1);
    }
}

async fn run(config: AppConfig) -> io::Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    if config.tui.mouse_enabled {
        execute!(stdout, EnableMouseCapture)?;
    }
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let (event_tx, event_rx) = mpsc::unbounded_channel();
    let services = Services::init(&config, event_tx);
    let prefs = PrefsStore::open(config.data_dir());

    let mut app = AppState::new(services, prefs, event_rx);
    let result = app
        .run(&mut terminal, Duration::from_millis(config.tui.tick_rate_ms))
        .await;

    // Restore the terminal even when the loop errored.
    disable_raw_mode()?;
    if config.tui.mouse_enabled {
        execute!(terminal.backend_mut(), DisableMouseCapture)?;
    }
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}
