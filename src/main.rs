mod api;
mod app;
mod config;
mod leads;
mod theme;
mod ui;

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use app::{App, Backend};
use config::AppConfig;
use leads::{Lead, LeadStatus};

#[derive(Parser, Debug)]
#[command(name = "prospect")]
#[command(version = "0.1.0")]
#[command(about = "A terminal lead-pipeline manager for generic business-record APIs")]
struct Args {
    /// Print a JSON pipeline summary and exit (for scripts and status bars)
    #[arg(short, long)]
    summary: bool,

    /// Override the configured API base URL
    #[arg(long)]
    api_url: Option<String>,

    /// Run on bundled sample data, no network
    #[arg(long)]
    demo: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let mut config = AppConfig::load()?;
    if let Some(url) = args.api_url {
        config.api_url = url;
    }

    let backend = if args.demo {
        Backend::Demo
    } else {
        Backend::Api(api::Client::new(&config.api_url)?)
    };

    // Handle CLI-only commands
    if args.summary {
        return print_summary(backend).await;
    }

    // Run TUI
    run_tui(config, backend).await
}

/// Pipeline snapshot as JSON: per-stage counts plus the open pipeline value.
async fn print_summary(backend: Backend) -> Result<()> {
    let leads: Vec<Lead> = match backend {
        Backend::Demo => leads::demo::sample_leads(),
        Backend::Api(client) => client.fetch_leads().await?,
    };

    let mut stages = serde_json::Map::new();
    for status in LeadStatus::ALL {
        let count = leads.iter().filter(|l| l.status == status).count();
        stages.insert(status.label().to_lowercase(), count.into());
    }

    // Open pipeline excludes closed deals.
    let open_value: f64 = leads
        .iter()
        .filter(|l| !matches!(l.status, LeadStatus::ClosedWon | LeadStatus::ClosedLost))
        .filter_map(|l| l.estimated_value)
        .sum();
    let won_value: f64 = leads
        .iter()
        .filter(|l| l.status == LeadStatus::ClosedWon)
        .filter_map(|l| l.estimated_value)
        .sum();

    let output = serde_json::json!({
        "total": leads.len(),
        "stages": stages,
        "open_value": open_value,
        "won_value": won_value,
        "follow_ups_due": leads
            .iter()
            .filter(|l| l.follow_up_due(chrono::Utc::now()))
            .count(),
    });

    println!("{}", serde_json::to_string(&output)?);
    Ok(())
}

async fn run_tui(config: AppConfig, backend: Backend) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend_term = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend_term)?;

    // Create app state
    let initial_width = terminal.size()?.width;
    let mut app = App::new(config, backend, initial_width).await?;

    // Main loop
    let result = run_app(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        if event::poll(std::time::Duration::from_millis(100))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    match key.code {
                        KeyCode::Char('q') if app.accepts_global_keys() => return Ok(()),
                        KeyCode::Char('c')
                            if key.modifiers.contains(event::KeyModifiers::CONTROL) =>
                        {
                            return Ok(())
                        }
                        _ => {
                            // Handle key and catch any errors to prevent crashes
                            if let Err(e) = app.handle_key(key).await {
                                app.set_status(format!("Error: {}", e));
                            }
                        }
                    }
                }
                Event::Resize(width, _) => app.on_resize(width),
                _ => {}
            }
        }

        // Status timeouts, background refresh, follow-up notifications
        let _ = app.tick().await;
    }
}
