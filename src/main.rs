mod api;
mod app;
mod chart;
mod config;
mod error;
mod filter;
mod format;
mod logging;
mod poller;
mod state;
mod theme;
mod types;
mod ui;

use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing::{error, info};

use api::CoinGeckoClient;
use app::App;
use config::Config;
use state::Action;
use types::*;

/// Live cryptocurrency prices and 7-day charts in the terminal.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Config file (defaults to <config dir>/pulse/config.yaml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Fiat currency to price assets in
    #[arg(long, value_enum)]
    currency: Option<Currency>,

    #[arg(long, value_enum)]
    theme: Option<ThemeMode>,

    /// Seconds between listing refreshes
    #[arg(long)]
    refresh: Option<u64>,

    /// Asset id charted on startup
    #[arg(long)]
    asset: Option<String>,
}

impl Cli {
    fn apply(&self, mut config: Config) -> Config {
        if let Some(currency) = self.currency {
            config.currency = currency;
        }
        if let Some(theme) = self.theme {
            config.theme = theme;
        }
        if let Some(secs) = self.refresh {
            config.refresh_interval_secs = secs;
        }
        if let Some(ref asset) = self.asset {
            config.default_asset = asset.clone();
        }
        config.normalized()
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = cli.apply(Config::load(cli.config.as_deref())?);
    let log_path = logging::init()?;
    info!(log = %log_path.display(), "pulse starting");

    let client = CoinGeckoClient::new(&config.api_base_url, config.request_timeout())
        .context("Failed to build HTTP client")?;
    let mut app = App::new(config, Arc::new(client));

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app);
    app.unmount();

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(ref e) = result {
        error!(error = %e, "fatal");
        eprintln!("Error: {}", e);
    }
    info!("pulse stopped");

    result
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    let tick_rate = Duration::from_millis(250);
    app.mount();

    loop {
        app.drain_outcomes();
        app.update_refresh_display();

        terminal.draw(|f| ui::draw(f, &mut *app))?;

        if app.quit {
            return Ok(());
        }

        if event::poll(tick_rate)? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
                    app.quit = true;
                    continue;
                }

                match app.input_mode {
                    InputMode::Search => handle_search_key(app, key),
                    InputMode::Normal => handle_normal_key(app, key),
                }
            }
        }
    }
}

fn handle_search_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            app.set_query(String::new());
            app.input_mode = InputMode::Normal;
        }
        KeyCode::Enter => {
            app.input_mode = InputMode::Normal;
        }
        KeyCode::Backspace => app.pop_query_char(),
        KeyCode::Down => app.cursor_down(1),
        KeyCode::Up => app.cursor_up(1),
        KeyCode::Char(c) => app.push_query_char(c),
        _ => {}
    }
}

fn handle_normal_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => app.quit = true,
        KeyCode::Esc => {
            if app.state.query.is_empty() {
                app.quit = true;
            } else {
                app.set_query(String::new());
            }
        }
        KeyCode::Char('/') => app.input_mode = InputMode::Search,
        KeyCode::Char('j') | KeyCode::Down => app.cursor_down(1),
        KeyCode::Char('k') | KeyCode::Up => app.cursor_up(1),
        KeyCode::PageDown => app.cursor_down(app.page_height),
        KeyCode::PageUp => app.cursor_up(app.page_height),
        KeyCode::Char('d') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.cursor_down(app.page_height)
        }
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.cursor_up(app.page_height)
        }
        KeyCode::Char('g') => app.cursor_top(),
        KeyCode::Char('G') => app.cursor_bottom(),
        KeyCode::Enter => app.select_cursor(),
        KeyCode::Char('c') => app.cycle_currency(true),
        KeyCode::Char('C') => app.cycle_currency(false),
        KeyCode::Char('t') => app.dispatch(Action::ThemeToggled),
        KeyCode::Char('r') => app.dispatch(Action::RefreshRequested),
        KeyCode::Char('R') => app.dispatch(Action::HistoryReloadRequested),
        _ => {}
    }
}
