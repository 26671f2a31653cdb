//! Storefront CLI - shop from the terminal

mod commands;
mod config;
mod logging;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use commands::Commands;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{Level, error, info};

#[derive(Parser)]
#[command(name = "storefront")]
#[command(about = "Command-line client for the storefront API")]
#[command(version)]
struct Cli {
    /// Set logging level (defaults to `log_level` from the configuration)
    #[arg(short = 'l', long, global = true)]
    log_level: Option<LogLevel>,

    /// Configuration file (defaults to STATE_DIR/config.toml when present)
    #[arg(short = 'c', long, global = true, env = "STOREFRONT_CONFIG")]
    config: Option<PathBuf>,

    /// State directory for the session file and logs
    #[arg(short = 'd', long, global = true)]
    state_dir: Option<PathBuf>,

    /// Timeout for the whole command in seconds (0 = no timeout)
    #[arg(short = 't', long, global = true, default_value = "60")]
    timeout: u64,

    /// Disable file logging (only log to stderr)
    #[arg(long, global = true)]
    no_file_log: bool,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let settings = config::load(cli.config.as_deref(), cli.state_dir.clone())?;
    let filter = cli.log_level.map_or_else(
        || settings.log_level.clone(),
        |level| logging::level_filter(level.into()),
    );
    logging::init_logging(filter, &settings.session.state_dir, cli.no_file_log)?;

    info!("Starting storefront CLI");

    let outcome = if cli.timeout == 0 {
        cli.command.execute(settings).await
    } else {
        let timeout_duration = Duration::from_secs(cli.timeout);
        match tokio::time::timeout(timeout_duration, cli.command.execute(settings)).await {
            Ok(result) => result,
            Err(_) => {
                error!("Command timed out after {} seconds", cli.timeout);
                std::process::exit(1);
            }
        }
    };

    match outcome {
        Ok(()) => info!("Command completed successfully"),
        Err(e) => {
            error!("Command failed: {e:#}");
            eprintln!("error: {e:#}");
            std::process::exit(1);
        }
    }

    Ok(())
}

#[derive(Clone, Debug, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for Level {
    fn from(log_level: LogLevel) -> Self {
        match log_level {
            LogLevel::Error => Self::ERROR,
            LogLevel::Warn => Self::WARN,
            LogLevel::Info => Self::INFO,
            LogLevel::Debug => Self::DEBUG,
            LogLevel::Trace => Self::TRACE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_global_options_after_subcommand() {
        let cli = Cli::try_parse_from([
            "storefront",
            "cart",
            "show",
            "--log-level",
            "debug",
            "--timeout",
            "0",
            "--no-file-log",
        ])
        .unwrap();
        assert!(matches!(cli.log_level, Some(LogLevel::Debug)));
        assert_eq!(cli.timeout, 0);
        assert!(cli.no_file_log);
    }

    #[test]
    fn test_log_level_is_optional() {
        let cli = Cli::try_parse_from(["storefront", "whoami"]).unwrap();
        assert!(cli.log_level.is_none());
        assert_eq!(cli.timeout, 60);
    }

    #[test]
    fn test_log_level_maps_to_tracing_level() {
        assert_eq!(Level::from(LogLevel::Warn), Level::WARN);
        assert_eq!(Level::from(LogLevel::Trace), Level::TRACE);
    }
}
