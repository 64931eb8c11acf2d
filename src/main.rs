use std::error::Error;
use std::io::Stdout;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use crossterm::ExecutableCommand;
use crossterm::event::{self, Event};
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

mod api;
mod app;
mod config;
mod dates;
mod editor;
mod joins;
mod loader;
mod logging;
mod models;
mod routes;
#[cfg(test)]
mod test_support;
mod ui;
mod views;

use api::ApiClient;
use app::App;
use config::UrlSources;
use routes::Route;

#[derive(Debug, Parser)]
#[command(name = "octofit", version, about = "OctoFit Tracker in the terminal")]
struct Cli {
    /// Backend API base URL, e.g. http://localhost:8000/api/
    #[arg(long)]
    api_url: Option<String>,

    /// Codespace name used to derive the forwarded backend URL
    #[arg(long)]
    codespace: Option<String>,

    /// Path of the view to open first
    #[arg(long, default_value = "/")]
    route: String,

    /// Where to write diagnostics
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if let Some(path) = cli.log_file.clone().or_else(config::default_log_path) {
        if let Err(err) = logging::init(&path) {
            eprintln!("Logging disabled ({}): {err}", path.display());
        }
    }

    let base_url = config::resolve_base_url(&UrlSources::gather(cli.api_url, cli.codespace));
    let client = ApiClient::new(&base_url)?;
    let route = Route::from_path(&cli.route).unwrap_or_else(|| {
        tracing::warn!(path = %cli.route, "Unknown route, opening home");
        Route::Home
    });
    tracing::info!(api = %base_url, route = route.path(), "Starting OctoFit");

    let theme = config::read_theme().unwrap_or_default();

    let mut stdout = std::io::stdout();
    enable_raw_mode()?;
    stdout.execute(EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let mut app = App::new(client, route, theme);
    let result = run(&mut terminal, &mut app);

    disable_raw_mode()?;
    terminal.backend_mut().execute(LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut App,
) -> Result<(), Box<dyn Error>> {
    loop {
        app.process_messages();

        terminal.draw(|frame| ui::draw(frame, app))?;

        if app.should_quit {
            return Ok(());
        }

        if event::poll(Duration::from_millis(120))? {
            if let Event::Key(key) = event::read()? {
                app.handle_key_event(key);
            }
        }
    }
}
