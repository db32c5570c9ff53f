mod app;
use app::App;

mod config;
mod logging;
mod ui;

use std::error::Error;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use ratatui::Terminal;
use ratatui::crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, MouseButton, MouseEventKind,
};
use ratatui::crossterm::execute;
use ratatui::crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::layout::Position;
use ratatui::prelude::CrosstermBackend;
use ratatui_image::picker::Picker;
use tracing::{info, warn};

use crate::app::catalog::HttpCatalog;
use crate::app::controller::Controller;
use crate::app::view::NavItem;
use crate::config::AppConfig;

#[derive(Parser, Debug)]
#[command(name = "phim_tui", version, about = "Browse the OPhim movie catalog from the terminal")]
struct Cli {
    /// Config file (defaults to <config dir>/phim_tui/config.json)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Catalog API base URL
    #[arg(long)]
    base_url: Option<String>,

    /// Log filter, e.g. `debug` or `phim_tui=trace`
    #[arg(long)]
    log_level: Option<String>,
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(AppConfig::config_path);
    let (mut config, config_error) = match AppConfig::load_from(&config_path) {
        Ok(config) => (config, None),
        Err(e) => (AppConfig::default(), Some(e)),
    };
    config.apply_env();
    if let Some(url) = cli.base_url {
        config.api_base_url = url;
    }
    if let Some(level) = cli.log_level {
        config.logging.level = level;
    }

    let _log_guard = logging::init_logging(&config)?;
    if let Some(e) = config_error {
        warn!(error = %e, "falling back to default configuration");
    }
    info!(base_url = %config.api_base_url, "starting");

    let catalog = HttpCatalog::new(&config.api_base_url, &config.user_agent)?;
    let controller = Controller::new(Arc::new(catalog), &config.placeholder_image_url);

    // setup terminal
    enable_raw_mode()?;
    let mut stderr = io::stderr(); // This is a special case. Normally using stdout is fine
    execute!(stderr, EnterAlternateScreen, EnableMouseCapture)?;

    let picker = match Picker::from_query_stdio() {
        Ok(picker) => Some(picker),
        Err(e) => {
            warn!(error = ?e, "terminal graphics query failed, using half blocks");
            Some(Picker::halfblocks())
        }
    };

    let backend = CrosstermBackend::new(stderr);
    let mut terminal = Terminal::new(backend)?;

    // create app and run it
    let mut app = App::new(controller, picker);
    let result = run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    info!("exiting");
    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stderr>>,
    app: &mut App,
) -> Result<(), Box<dyn Error>> {
    app.navigate(NavItem::Home);

    loop {
        app.tick();
        terminal.draw(|f| ui::ui(f, app))?;

        // Poll for events with a timeout so finished requests and the spinner show up
        if !event::poll(Duration::from_millis(100))? {
            continue;
        }

        match event::read()? {
            Event::Key(key) => {
                if key.kind == event::KeyEventKind::Release {
                    // Skip events that are not KeyEventKind::Press
                    continue;
                }

                if app.handle_key(key.code) {
                    return Ok(());
                }
            }
            Event::Mouse(mouse) => {
                if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
                    continue;
                }
                let outside = app
                    .modal_area
                    .is_some_and(|area| !area.contains(Position::new(mouse.column, mouse.row)));
                if outside {
                    app.close_modal();
                }
            }
            _ => {}
        }
    }
}
