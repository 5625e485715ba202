//! DexScreener tokens scraper - main entry point
//!
//! Reads search targets from a JSON file, fetches matching pairs from
//! DexScreener and writes the normalized tokens to JSON and CSV.

use anyhow::Result;
use clap::{Parser, ValueEnum};
use dexscreener_tokens::config::DEFAULT_SETTINGS_PATH;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;

#[derive(Parser, Debug)]
#[command(name = "dexscreener-tokens")]
#[command(about = "DexScreener tokens scraper - collect live token data from DexScreener", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to JSON file describing scrape targets
    #[arg(long, default_value = "data/inputs.sample.json")]
    input: PathBuf,

    /// Directory where JSON/CSV results will be written (overrides settings file)
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Maximum pages to fetch per target (overrides settings and targets)
    #[arg(long)]
    max_pages: Option<u32>,

    /// Log verbosity
    #[arg(long, value_enum, ignore_case = true, default_value = "INFO")]
    log_level: LogLevel,

    /// Path to the settings file; built-in defaults are used if it is missing
    #[arg(long, default_value = DEFAULT_SETTINGS_PATH)]
    settings: PathBuf,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum LogLevel {
    #[value(name = "DEBUG")]
    Debug,
    #[value(name = "INFO")]
    Info,
    #[value(name = "WARNING")]
    Warning,
    #[value(name = "ERROR")]
    Error,
}

impl LogLevel {
    fn as_filter(self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warning => "warn",
            LogLevel::Error => "error",
        }
    }
}

fn setup_logging(level: LogLevel, command_name: &str) -> Result<()> {
    // Create logs directory
    std::fs::create_dir_all("logs")?;

    // Create log file with naming pattern: {command}_{date}.log
    let log_filename = format!(
        "{}_{}.log",
        command_name,
        chrono::Local::now().format("%Y-%m-%d_%H-%M-%S")
    );
    let log_path = PathBuf::from("logs").join(&log_filename);

    // Filter out noisy external crates
    let filter_str = format!(
        "{},hyper=warn,hyper_util=warn,reqwest=warn,rustls=warn,h2=warn",
        level.as_filter()
    );
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&filter_str));

    let file_appender = tracing_appender::rolling::never("logs", &log_filename);

    let console_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_ansi(true);

    // File layer - same format but without ANSI colors
    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(file_appender)
        .with_target(true)
        .with_line_number(true)
        .with_file(true)
        .with_ansi(false);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .init();

    info!("Logging initialized");
    info!("Log file: {}", log_path.display());

    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    dotenv::dotenv().ok();

    if let Err(e) = setup_logging(cli.log_level, "scrape") {
        eprintln!("Failed to initialize logging: {:#}", e);
        return ExitCode::from(1);
    }

    match commands::scrape::run(cli.settings, cli.input, cli.output_dir, cli.max_pages) {
        Ok(outcome) => ExitCode::from(outcome.exit_code()),
        Err(e) => {
            error!("{:#}", e);
            ExitCode::from(1)
        }
    }
}
