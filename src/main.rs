//! CLI entry point for the NTC route statistics tool.
//!
//! Provides subcommands for downloading the report, extracting its route
//! tables into CSV fragments, and combining the fragments into one CSV.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use ntc_route_stats::combine::combine;
use ntc_route_stats::config::Config;
use ntc_route_stats::extract::{PageRange, PageTextExtractor, extract_report};
use ntc_route_stats::fetch::{BasicClient, download_report};
use ntc_route_stats::observer::TracingObserver;
use ntc_route_stats::output::{CombineSummary, log_summary, summary_json};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "ntc_route_stats")]
#[command(about = "Extract and combine bus route statistics from the NTC report", long_about = None)]
struct Cli {
    /// Report base path; the PDF, fragments and combined CSV are derived from it
    #[arg(short, long, global = true, value_name = "BASE")]
    base: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Download the report PDF from a URL or copy it from a local path
    Fetch {
        /// URL or file path of the report (defaults to NTC_REPORT_URL)
        #[arg(value_name = "FILE_OR_URL")]
        source: Option<String>,
    },
    /// Extract the route tables of the report PDF into CSV fragments
    Extract {
        /// Pages holding the route tables, e.g. "199-215" or "1,3-5"
        #[arg(short, long)]
        pages: Option<String>,
    },
    /// Combine all CSV fragments in the data directory into one CSV
    Combine {
        /// Also print the run summary as JSON on stdout
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Extract then combine
    Run {
        /// Pages holding the route tables
        #[arg(short, long)]
        pages: Option<String>,

        /// Also print the run summary as JSON on stdout
        #[arg(long, default_value_t = false)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/ntc_route_stats.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("ntc_route_stats.log"));

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

    let mut config = Config::from_env();
    if let Some(base) = cli.base {
        config.report_base = base;
    }

    match cli.command {
        Commands::Fetch { source } => {
            let source = source
                .or_else(|| config.report_url.clone())
                .context("No report source given and NTC_REPORT_URL is not set")?;
            let dest = config.pdf_path();
            download_report(&BasicClient::new(), &source, &dest).await?;
        }
        Commands::Extract { pages } => {
            extract(&config, pages)?;
        }
        Commands::Combine { json } => {
            run_combine(&config, json)?;
        }
        Commands::Run { pages, json } => {
            extract(&config, pages)?;
            run_combine(&config, json)?;
        }
    }

    Ok(())
}

/// Extracts the selected pages, falling back to the configured page range.
fn extract(config: &Config, pages: Option<String>) -> Result<()> {
    let pages = pages.unwrap_or_else(|| config.pages.clone());
    let pages: PageRange = pages
        .parse()
        .with_context(|| format!("Invalid page selection {pages:?}"))?;

    let paths = extract_report(&PageTextExtractor, config, &pages)?;
    info!(fragments = paths.len(), "Extraction complete");
    Ok(())
}

fn run_combine(config: &Config, json: bool) -> Result<CombineSummary> {
    let summary = combine(&config.data_dir(), &config.combined_path(), &TracingObserver)?;
    log_summary(&summary);

    if json {
        println!("{}", summary_json(&summary)?);
    }

    Ok(summary)
}
