//! CLI entry point for the MRT crowd heatmap tool.
//!
//! Provides subcommands for rendering the crowd/taxi map, saving a snapshot of
//! the live feeds for offline rendering, and listing the known train lines.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use mrt_crowd_heatmap::fetch::{ApiKey, BasicClient};
use mrt_crowd_heatmap::infra::datamall::{DEFAULT_BASE_URL, DataMallClient, MAX_TAXI_PAGES};
use mrt_crowd_heatmap::infra::snapshot::SnapshotSource;
use mrt_crowd_heatmap::pipeline::{RenderOptions, render_map, snapshot};
use mrt_crowd_heatmap::services::datamall_api::TrainLine;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "mrt_crowd_heatmap")]
#[command(about = "Render MRT/LRT crowd density and taxi availability as a heatmap", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Connection settings for LTA DataMall.
#[derive(Args)]
struct DataMallArgs {
    /// DataMall account key, sent as the `AccountKey` header
    #[arg(long, env = "DATAMALL_ACCOUNT_KEY", hide_env_values = true)]
    account_key: Option<String>,

    /// DataMall service root
    #[arg(long, env = "DATAMALL_BASE_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 30)]
    timeout_secs: u64,

    /// Maximum Taxi-Availability pages (500 records each) per run
    #[arg(long, default_value_t = MAX_TAXI_PAGES)]
    max_taxi_pages: usize,
}

impl DataMallArgs {
    fn client(&self) -> Result<DataMallClient<ApiKey<BasicClient>>> {
        let key = self
            .account_key
            .as_deref()
            .context("DATAMALL_ACCOUNT_KEY must be set (or pass --account-key)")?;
        let client =
            DataMallClient::new(key, &self.base_url, Duration::from_secs(self.timeout_secs))?;
        Ok(client.with_max_taxi_pages(self.max_taxi_pages))
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch crowd and taxi data and write the heatmap page
    Render {
        /// Station reference CSV (STN_NO, STN_NAME, Latitude, Longitude)
        #[arg(short, long, default_value = "data/mrt_stations.csv")]
        stations: PathBuf,

        /// HTML file to write
        #[arg(short, long, default_value = "Map.html")]
        output: PathBuf,

        /// Optional: also write the merged station table to this CSV
        #[arg(long)]
        merged_csv: Option<PathBuf>,

        /// Comma-separated line codes to fetch (default: all lines)
        #[arg(short, long, value_delimiter = ',')]
        lines: Vec<TrainLine>,

        /// Optional: render from a saved snapshot instead of the live API
        #[arg(long)]
        snapshot_dir: Option<PathBuf>,

        #[command(flatten)]
        datamall: DataMallArgs,
    },
    /// Fetch crowd and taxi data and save them as CSV for offline rendering
    Snapshot {
        /// Directory to write crowd.csv and taxi.csv into
        #[arg(short, long, default_value = "snapshots")]
        output_dir: PathBuf,

        /// Comma-separated line codes to fetch (default: all lines)
        #[arg(short, long, value_delimiter = ',')]
        lines: Vec<TrainLine>,

        #[command(flatten)]
        datamall: DataMallArgs,
    },
    /// List the train lines covered by the crowd feed
    Lines,
}

/// Colored stderr output plus a JSON log file rolled daily.
fn init_tracing() -> Result<WorkerGuard> {
    let log_file_path = std::env::var("LOG_FILE_PATH")
        .unwrap_or_else(|_| "logs/mrt_crowd_heatmap.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("mrt_crowd_heatmap.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);

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

    Ok(guard)
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    let _log_guard = init_tracing()?;

    let cli = Cli::parse();

    match cli.command {
        Commands::Render {
            stations,
            output,
            merged_csv,
            lines,
            snapshot_dir,
            datamall,
        } => {
            let opts = RenderOptions {
                stations_path: stations,
                output_path: output,
                merged_csv,
                lines,
            };

            let summary = match snapshot_dir {
                Some(dir) => {
                    info!(dir = %dir.display(), "Rendering from snapshot");
                    render_map(&SnapshotSource::new(dir), &opts).await?
                }
                None => render_map(&datamall.client()?, &opts).await?,
            };

            info!(
                stations = summary.stations,
                with_crowd_level = summary.with_crowd_level,
                taxis = summary.taxis,
                "Render complete"
            );
        }
        Commands::Snapshot {
            output_dir,
            lines,
            datamall,
        } => {
            let client = datamall.client()?;
            let feed = snapshot(&client, &lines, &output_dir).await?;
            info!(
                dir = %output_dir.display(),
                crowd_records = feed.records.len(),
                "Snapshot complete"
            );
        }
        Commands::Lines => {
            for line in TrainLine::ALL {
                info!(code = line.code(), name = line.name(), "Line");
            }
            info!(total = TrainLine::ALL.len(), "Line list");
        }
    }

    Ok(())
}
