use std::io::stdout;
use std::path::PathBuf;

use clap::Parser;
use color_eyre::Result;
use color_eyre::eyre::{WrapErr, eyre};
use crossterm::event::KeyEventKind;

use sysmon::app::App;
use sysmon::config::{Config, load_config, load_config_from_path};
use sysmon::event::{Event, EventHandler};
use sysmon::{batch, logging, ui};

#[derive(Parser)]
#[command(
    name = "sysmon",
    version,
    about = "Interactive process monitor for Linux procfs"
)]
struct Cli {
    /// Path to config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Refresh rate in milliseconds
    #[arg(long)]
    refresh_rate: Option<u64>,

    /// Initial sort column: cpu or memory
    #[arg(long)]
    sort: Option<String>,

    /// Root of the proc filesystem to sample
    #[arg(long)]
    proc_root: Option<PathBuf>,

    /// Write diagnostics to this file
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Log level: error, warn, info, debug, trace
    #[arg(long)]
    log_level: Option<String>,

    /// Print N refresh cycles as text instead of starting the UI
    #[arg(long, value_name = "N")]
    batch: Option<usize>,

    /// Rows per table in batch mode
    #[arg(long, default_value_t = 20)]
    batch_rows: usize,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    let config = load_config_for_cli(&cli);
    logging::init(config.general.log_file.as_deref(), &config.general.log_level)?;

    if !config.general.proc_root.is_dir() {
        return Err(eyre!(
            "proc root {} is not a directory",
            config.general.proc_root.display()
        ));
    }
    let mut app = App::new(&config)?;

    if let Some(iterations) = cli.batch {
        let mut out = stdout().lock();
        return batch::run(&mut app, iterations, cli.batch_rows, &mut out).await;
    }

    let mut terminal = ratatui::init();
    let result = run(&mut terminal, &mut app).await;
    ratatui::restore();

    result
}

async fn run(terminal: &mut ratatui::DefaultTerminal, app: &mut App) -> Result<()> {
    let mut events = EventHandler::new(app.refresh_interval);

    terminal.draw(|frame| ui::draw(frame, app))?;

    while app.running {
        // Wake up when a status message is due to expire, even between ticks
        let next = match app.status_remaining() {
            Some(remaining) => tokio::time::timeout(remaining, events.next()).await.ok(),
            None => Some(events.next().await),
        };
        let Some(next) = next else {
            if app.expire_status() {
                terminal
                    .draw(|frame| ui::draw(frame, app))
                    .wrap_err("failed to draw frame")?;
            }
            continue;
        };
        let Some(event) = next else {
            break;
        };
        let should_draw = match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                let action = app.map_key(key);
                app.dispatch(action);
                true
            }
            Event::Key(_) => false,
            Event::Tick => {
                app.refresh_data();
                true
            }
            Event::Resize => true,
        };
        events.set_tick_rate(app.refresh_interval);
        let should_draw = app.expire_status() || should_draw;
        if should_draw && app.running {
            terminal
                .draw(|frame| ui::draw(frame, app))
                .wrap_err("failed to draw frame")?;
        }
    }

    Ok(())
}

fn load_config_for_cli(cli: &Cli) -> Config {
    let mut config = match &cli.config {
        Some(path) => load_config_from_path(path),
        None => load_config(),
    };

    if let Some(rate) = cli.refresh_rate {
        config.general.refresh_rate_ms = rate;
    }
    if let Some(ref sort) = cli.sort {
        config.general.default_sort = sort.clone();
    }
    if let Some(ref root) = cli.proc_root {
        config.general.proc_root = root.clone();
    }
    if let Some(ref path) = cli.log_file {
        config.general.log_file = Some(path.clone());
    }
    if let Some(ref level) = cli.log_level {
        config.general.log_level = level.clone();
    }

    config
}
