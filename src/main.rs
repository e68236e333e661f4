use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use anyhow::{Context as _, Result};
use clap::Parser;
use crossterm::event::{self, DisableMouseCapture, EnableMouseCapture, Event};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use apicat::app::{App, AppOptions};
use apicat::config::{self, Config};
use apicat::infrastructure::{
    CatalogClient, DemoCatalogClient, HttpCatalogClient, RuntimeBridge, RuntimeCommand,
    WorkerSettings,
};
use apicat::{events, ui};

#[derive(Debug, Parser)]
#[command(
    name = "apicat",
    version,
    about = "apicat: a terminal dashboard for the API Mediation Layer API Catalog"
)]
struct Args {
    /// Gateway base URL (e.g. https://localhost:10010)
    #[arg(long)]
    gateway: Option<String>,

    /// Use a built-in catalog instead of a gateway
    #[arg(long)]
    demo: bool,

    /// Seconds between catalog polls
    #[arg(long)]
    poll_interval: Option<u64>,

    /// Accept self-signed gateway certificates
    #[arg(long)]
    insecure: bool,

    /// Write logs here instead of the data directory
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.log_file.clone())?;
    install_panic_hook();

    let mut config = config::load();
    if let Some(gateway) = args.gateway.clone() {
        config.gateway_url = gateway;
    }
    if let Some(secs) = args.poll_interval {
        config.poll_interval_secs = secs;
    }
    if args.insecure {
        config.accept_invalid_certs = true;
    }
    if config.accept_invalid_certs {
        tracing::warn!("TLS certificate verification is disabled");
    }

    tracing::info!(gateway = %config.gateway_url, demo = args.demo, "starting apicat");

    let client: Arc<dyn CatalogClient> = if args.demo {
        Arc::new(DemoCatalogClient::new())
    } else {
        Arc::new(HttpCatalogClient::new(
            &config.gateway_url,
            config.request_timeout(),
            config.accept_invalid_certs,
        )?)
    };
    let settings = WorkerSettings {
        poll_interval: config.poll_interval(),
        max_retries: config.max_retries,
        ..WorkerSettings::default()
    };
    let runtime = RuntimeBridge::new(Arc::clone(&client), settings)?;

    let mut app = App::new(app_options(&config, &client, args.demo));

    let mut stdout = io::stdout();
    enable_raw_mode()?;
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    app.start();
    let res = run_app(&mut terminal, app, runtime);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        tracing::error!("{err:?}");
        eprintln!("{err:?}");
    }

    Ok(())
}

fn app_options(config: &Config, client: &Arc<dyn CatalogClient>, demo: bool) -> AppOptions {
    AppOptions {
        gateway: client.endpoint_name(),
        require_login: config.require_login && !demo,
        username: config.username.clone(),
        enabler_data: config.enabler_data(),
        search_debounce: config.search_debounce(),
        export_dir: config.export_dir(),
        system_clipboard: true,
    }
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    mut app: App,
    runtime: RuntimeBridge,
) -> Result<()> {
    let tick_rate = Duration::from_millis(200);
    let mut last_tick = Instant::now();

    loop {
        pump_background(&mut app, &runtime);
        app.sync();
        forward_commands(&mut app, &runtime);
        terminal.draw(|f| ui::draw(f, &app))?;
        if app.should_quit {
            let _ = runtime.send(RuntimeCommand::Shutdown);
            return Ok(());
        }

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or_else(|| Duration::from_secs(0));

        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) => events::handle_key(&mut app, key),
                Event::Resize(_, _) => {}
                _ => {}
            }
            forward_commands(&mut app, &runtime);
        }

        if last_tick.elapsed() >= tick_rate {
            app.on_tick();
            last_tick = Instant::now();
        }
    }
}

fn pump_background(app: &mut App, runtime: &RuntimeBridge) {
    for event in runtime.poll_events() {
        app.apply_runtime_event(event);
    }
}

fn forward_commands(app: &mut App, runtime: &RuntimeBridge) {
    for command in app.take_commands() {
        if let Err(err) = runtime.send(command) {
            tracing::error!("worker unavailable: {err:#}");
            app.set_status("Background worker stopped", apicat::app::StatusLevel::Error);
            break;
        }
    }
}

/// Log to a file; the terminal belongs to the UI
fn init_logging(path: Option<PathBuf>) -> Result<()> {
    let Some(path) = path.or_else(config::log_path) else {
        return Ok(());
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create log directory {}", parent.display()))?;
    }
    let file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("Failed to open log file {}", path.display()))?;

    let filter = EnvFilter::try_from_env("APICAT_LOG")
        .unwrap_or_else(|_| EnvFilter::new("apicat=info"));
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .with_target(true),
        )
        .with(filter)
        .init();
    Ok(())
}

fn install_panic_hook() {
    std::panic::set_hook(Box::new(|info| {
        let location = info
            .location()
            .map(|l| format!("{}:{}", l.file(), l.line()))
            .unwrap_or_default();
        let message = ui::shield::panic_message(info.payload());
        tracing::error!(location = %location, "panic: {message}");
    }));
}
