//! CLI entry point for the bikeshare analytics dashboard.
//!
//! Provides subcommands for one-shot destination maps and summary tables, and
//! an interactive session where control changes are typed line by line.

use anyhow::{Context, Result};
use bikeshare_dash::{
    aggregation::build_summary_table,
    config::DashboardConfig,
    dataset::{DAYS_OF_WEEK, Dataset, load_dataset, parse_day},
    fetch::{BasicClient, DEFAULT_TIMEOUT},
    output::{print_json, write_records},
    view::{
        Controls, CsvRenderer, Dashboard, DurationRange, Flow, Renderer, TerminalRenderer,
        command::HELP, dispatch, parse_command, recompute,
    },
};
use clap::{Parser, Subcommand};
use std::ffi::OsStr;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "bikeshare_dash")]
#[command(about = "Bikeshare trip destinations and station summaries", long_about = None)]
struct Cli {
    /// JSON config file with data paths and control defaults
    #[arg(long, global = true)]
    config: Option<String>,

    /// Trip log CSV (path or URL, optionally gzipped)
    #[arg(long, global = true)]
    trips: Option<String>,

    /// Station locations CSV (path or URL, optionally gzipped)
    #[arg(long, global = true)]
    stations: Option<String>,

    /// Download timeout for URL sources, in seconds
    #[arg(long, global = true, default_value_t = DEFAULT_TIMEOUT.as_secs())]
    timeout: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute destination markers for up to five origin stations
    Map {
        /// Origin station; repeat for several (defaults to the configured origins)
        #[arg(short, long = "origin", value_name = "STATION")]
        origins: Vec<String>,

        /// Day of week; repeat for several (defaults to all days)
        #[arg(short, long = "day", value_name = "DAY")]
        days: Vec<String>,

        /// Shortest trip to count, in minutes
        #[arg(long)]
        min_duration: Option<u32>,

        /// Longest trip to count, in minutes
        #[arg(long)]
        max_duration: Option<u32>,

        /// Write map.csv and origins.csv into this directory instead of printing
        #[arg(long)]
        output_dir: Option<String>,

        /// Log the result as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Per-station trip totals, average duration and top destinations
    Summary {
        /// CSV file to write the table to
        #[arg(short, long)]
        output: Option<String>,

        /// Only print the busiest N stations
        #[arg(short = 'n', long)]
        limit: Option<usize>,

        /// Log the table as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// List the origin stations that can be selected
    Stations,
    /// Change controls interactively and watch the map update
    Interactive {
        /// Also keep map.csv, origins.csv and summary.csv current in this directory
        #[arg(short = 'o', long)]
        output_dir: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/bikeshare_dash.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("bikeshare_dash.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => DashboardConfig::load(path)?,
        None => DashboardConfig::default(),
    }
    .with_env_overrides()
    .with_overrides(cli.trips, cli.stations);

    let client = BasicClient::with_timeout(Duration::from_secs(cli.timeout))?;
    let dataset = load_dataset(&client, &config.dataset_paths()).await?;

    match cli.command {
        Commands::Map {
            origins,
            days,
            min_duration,
            max_duration,
            output_dir,
            json,
        } => {
            let controls = map_controls(&config, origins, days, min_duration, max_duration)?;
            controls
                .validate(&dataset.origin_stations())
                .context("invalid map selection")?;

            let view = recompute(&dataset, &controls);
            info!(
                destinations = view.map.destinations.len(),
                origins = view.map.origins.len(),
                warnings = view.map.warnings.len(),
                "Map computed"
            );

            if json {
                print_json(&view.map)?;
            } else if let Some(dir) = output_dir {
                CsvRenderer::new(dir)?.render_map(&view)?;
            } else {
                TerminalRenderer::new(std::io::stdout().lock()).render_map(&view)?;
            }
        }
        Commands::Summary {
            output,
            limit,
            json,
        } => {
            let table = build_summary_table(&dataset.trips);
            info!(stations = table.len(), trips = table.total_trips(), "Summary computed");

            if json {
                print_json(&table.rows)?;
            } else if let Some(path) = output {
                write_records(Path::new(&path), &table.rows)?;
                info!(path = %path, "Summary table written");
            } else {
                let mut renderer = TerminalRenderer::new(std::io::stdout().lock());
                if let Some(limit) = limit {
                    renderer = renderer.with_summary_limit(limit);
                }
                renderer.render_summary(&table)?;
            }
        }
        Commands::Stations => {
            let mut out = std::io::stdout().lock();
            for name in dataset.origin_stations() {
                writeln!(out, "{name}")?;
            }
        }
        Commands::Interactive { output_dir } => {
            run_interactive(dataset, &config, output_dir).await?;
        }
    }

    Ok(())
}

/// Controls for a one-shot map: flags where given, config defaults otherwise.
fn map_controls(
    config: &DashboardConfig,
    origins: Vec<String>,
    days: Vec<String>,
    min_duration: Option<u32>,
    max_duration: Option<u32>,
) -> Result<Controls> {
    let origins = if origins.is_empty() {
        config.default_origins.clone()
    } else {
        origins
    };
    let days = if days.is_empty() {
        DAYS_OF_WEEK.to_vec()
    } else {
        days.iter()
            .map(|d| parse_day(d).with_context(|| format!("unknown day '{d}'")))
            .collect::<Result<Vec<_>>>()?
    };
    let (default_min, default_max) = config.default_duration;
    let duration = DurationRange::new(
        min_duration.unwrap_or(default_min),
        max_duration.unwrap_or(default_max),
    );
    Ok(Controls::new(origins, days, duration))
}

/// Reads commands from stdin until `quit` or end of input.
#[tracing::instrument(skip_all)]
async fn run_interactive(
    dataset: Dataset,
    config: &DashboardConfig,
    output_dir: Option<String>,
) -> Result<()> {
    let mut targets: Vec<Box<dyn Renderer>> =
        vec![Box::new(TerminalRenderer::new(std::io::stdout()).with_summary_limit(25))];
    if let Some(dir) = output_dir {
        targets.push(Box::new(CsvRenderer::new(dir)?));
    }

    let mut controls = Controls::new(
        config.default_origins.clone(),
        DAYS_OF_WEEK,
        DurationRange::new(config.default_duration.0, config.default_duration.1),
    );
    for missing in controls.retain_known_origins(&dataset.origin_stations()) {
        warn!(origin = %missing, "Default origin has no trips, leaving it unselected");
    }
    let mut dashboard = Dashboard::new(Arc::new(dataset), controls, targets)
        .context("configured default controls are invalid")?;

    let mut out = std::io::stdout();
    writeln!(out, "Type 'help' for commands.")?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match parse_command(&line) {
            Ok(Some(command)) => {
                if dispatch(&mut dashboard, command, &mut out)? == Flow::Quit {
                    break;
                }
            }
            Ok(None) => {}
            Err(e) => {
                error!(error = %e, "Unreadable command");
                writeln!(out, "error: {e:#}\n{HELP}")?;
            }
        }
        out.flush()?;
    }

    info!("Interactive session finished");
    Ok(())
}
