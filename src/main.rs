//! Bootline - sequential extension loader.
//!
//! Reads `bootline.toml`, registers the configured extensions against the
//! built-in module catalog and loads them one at a time.

mod builtin;
mod cli;
mod commands;

use std::sync::OnceLock;

use clap::Parser;
use tracing::{debug, error, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use bootline_config::{ConfigLoader, LogFormat, LoggingConfig};

use cli::{Cli, Commands};

static GUARD: OnceLock<WorkerGuard> = OnceLock::new();

/// Initialize tracing with console and optional file output.
///
/// `RUST_LOG` takes precedence over the configured level. When `file` or
/// `file_dir` is set, logs are also written with daily rotation.
fn init_tracing(logging: &LoggingConfig) -> Result<(), Box<dyn std::error::Error>> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&logging.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let console = match logging.format {
        LogFormat::Text => fmt::layer().with_target(true).with_ansi(true).boxed(),
        LogFormat::Json => fmt::layer().json().with_target(true).boxed(),
    };

    let file = match logging.log_dir() {
        Some(log_dir) => {
            std::fs::create_dir_all(&log_dir)?;
            let file_appender = RollingFileAppender::builder()
                .rotation(Rotation::DAILY)
                .filename_prefix("bootline")
                .filename_suffix("log")
                .max_log_files(30)
                .build(&log_dir)?;

            // The guard flushes buffered records on drop; keep it for the program duration.
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            let _ = GUARD.set(guard);

            Some(fmt::layer().with_writer(non_blocking).with_ansi(false))
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console)
        .with(file)
        .init();

    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let cli = Cli::parse();

    let config = ConfigLoader::load_optional(&cli.config)?;
    init_tracing(&config.logging).map_err(|e| e.to_string())?;
    if cli.config.exists() {
        debug!(config = %cli.config.display(), "Configuration loaded");
    } else {
        warn!(config = %cli.config.display(), "Configuration file not found; using defaults");
    }

    let result = match cli.command {
        None => commands::run(&config, true).await,
        Some(Commands::Run { no_hooks }) => commands::run(&config, !no_hooks).await,
        Some(Commands::Check) => commands::check(&cli.config),
        Some(Commands::Modules) => {
            commands::modules(&config);
            Ok(())
        }
    };

    if let Err(e) = &result {
        error!(error = %e, "Command failed");
    }
    result
}
