use std::fs::OpenOptions;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Layout},
    Terminal,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use sysmon_dash::app::{summary_json, App};
use sysmon_dash::config::{CliOverrides, Settings};
use sysmon_dash::poller::{execute as execute_command, PollHandle, PollingController};
use sysmon_dash::source::{Contract, HttpBackend, MetricsBackend};
use sysmon_dash::{events, ui};

#[derive(Parser, Debug)]
#[command(name = "sysmon-dash")]
#[command(about = "Terminal dashboard for SysMonitor device telemetry and weather metrics")]
struct Args {
    /// Path to a TOML config file (default: ./sysmon-dash.toml if present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Backend base URL (e.g. http://localhost:5000)
    #[arg(short, long)]
    url: Option<String>,

    /// Backend API shape
    #[arg(long, value_enum)]
    contract: Option<Contract>,

    /// Refresh interval (e.g. "60s", "1m", "500ms")
    #[arg(short, long)]
    refresh: Option<String>,

    /// Rows per table page
    #[arg(long)]
    page_size: Option<usize>,

    /// Where to write logs (the terminal belongs to the UI)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Fetch once, print the dashboard state as JSON and exit
    #[arg(long)]
    once: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let overrides = CliOverrides {
        base_url: args.url,
        contract: args.contract,
        refresh: args.refresh,
        page_size: args.page_size,
        log_file: args.log_file,
    };
    let settings = Settings::load(args.config.as_deref(), &overrides)?;

    init_logging(&settings.log_file)?;
    tracing::info!(
        base_url = %settings.base_url,
        contract = %settings.contract,
        refresh_secs = settings.refresh.as_secs_f64(),
        page_size = settings.page_size,
        "Configuration loaded"
    );

    let backend = HttpBackend::builder()
        .endpoint(settings.base_url.clone())
        .collection_url(settings.collection_url.clone())
        .timeout(settings.request_timeout)
        .build()
        .context("Failed to create HTTP client")?;

    if args.once {
        return run_once(&settings, &backend);
    }

    run_tui(&settings, Arc::new(backend))
}

/// Send logs to a file; stdout is owned by the terminal UI.
fn init_logging(path: &Path) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file {}", path.display()))?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,sysmon_dash=debug".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false),
        )
        .init();

    Ok(())
}

/// Fetch one snapshot and print the derived dashboard state as JSON
fn run_once(settings: &Settings, backend: &HttpBackend) -> Result<()> {
    let rt = tokio::runtime::Runtime::new()?;

    let mut controller = PollingController::new(
        settings.contract,
        settings.metric_ids.clone(),
        settings.page_size,
    );
    controller.refresh();
    if settings.contract == Contract::Paged {
        controller.prefetch_weather();
    }

    rt.block_on(async {
        for command in controller.take_commands() {
            let update = execute_command(backend, command).await;
            controller.apply(update);
        }
    });

    if controller.last_updated().is_none() {
        let err = controller.last_error().unwrap_or("no data received");
        anyhow::bail!("Failed to fetch metrics from {}: {}", backend.endpoint(), err);
    }

    println!("{}", serde_json::to_string_pretty(&summary_json(&controller))?);
    Ok(())
}

/// Run the TUI against a live backend
fn run_tui(settings: &Settings, backend: Arc<dyn MetricsBackend>) -> Result<()> {
    // The poller's tasks run here while the UI loop owns the main thread
    let rt = tokio::runtime::Runtime::new()?;
    let _guard = rt.enter();

    let theme = ui::Theme::auto_detect();
    let controller = PollingController::new(
        settings.contract,
        settings.metric_ids.clone(),
        settings.page_size,
    );
    let mut app = App::new(controller, backend.description(), settings.refresh, theme);
    let mut poller = PollHandle::spawn(backend, settings.refresh);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let term_backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(term_backend)?;

    // Setup panic hook to restore terminal
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
        original_hook(panic);
    }));

    let result = run_app(&mut terminal, &mut app, &mut poller);

    poller.shutdown();
    tracing::info!("Poller stopped");

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

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    poller: &mut PollHandle,
) -> Result<()> {
    // Minimum terminal size for usable display
    const MIN_WIDTH: u16 = 60;
    const MIN_HEIGHT: u16 = 16;

    while app.running {
        terminal.draw(|frame| {
            let area = frame.area();

            if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
                let msg = format!(
                    "Terminal too small: {}x{}\nMinimum: {}x{}\n\nResize to continue",
                    area.width, area.height, MIN_WIDTH, MIN_HEIGHT
                );
                let paragraph = ratatui::widgets::Paragraph::new(msg)
                    .alignment(ratatui::layout::Alignment::Center)
                    .style(ratatui::style::Style::default().fg(ratatui::style::Color::Yellow));
                let centered = ratatui::layout::Rect::new(
                    0,
                    (area.height / 2).saturating_sub(2),
                    area.width,
                    5.min(area.height),
                );
                frame.render_widget(paragraph, centered);
                return;
            }

            let chunks = Layout::vertical([
                Constraint::Length(1), // Header bar
                Constraint::Length(1), // Tabs
                Constraint::Min(12),   // Content
                Constraint::Length(1), // Status bar
            ])
            .split(area);

            ui::common::render_header(frame, app, chunks[0]);
            ui::common::render_tabs(frame, app, chunks[1]);
            ui::render_content(frame, app, chunks[2]);
            ui::common::render_status_bar(frame, app, chunks[3]);

            if app.show_help {
                ui::common::render_help(frame, app, area);
            }
        })?;

        if let Some(event) = events::poll_event(Duration::from_millis(100))? {
            match event {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    events::handle_key_event(app, key)
                }
                Event::Mouse(mouse) => events::handle_mouse_event(app, mouse),
                _ => {}
            }
        }

        app.pump(poller);
    }

    Ok(())
}
