//! TEMPO - Live Time Progress Bot
//!
//! A chat bot that keeps one message per conversation updated in place with
//! year, day and sub-minute progress bars, plus a liveness endpoint for
//! hosting-platform health checks.
//!
//! ## Usage
//!
//! ```bash
//! # Run with the token from the environment
//! BOT_TOKEN=123:abc tempo
//!
//! # Render times in a specific zone, serve liveness on port 8080
//! tempo --utc-offset +05:30 --port 8080
//!
//! # With verbose logging and JSON log files
//! tempo -v --log-dir /var/log/tempo
//! ```

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use tempo_bot::{run_bot, spawn_liveness_thread};
use tempo_core::config::{DEFAULT_API_BASE_URL, DEFAULT_PORT, DEFAULT_REQUEST_TIMEOUT_SECS};
use tempo_core::{BotConfig, LogGuard, TempoError, init_logging};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

/// TEMPO Live Time Progress Bot
///
/// Keeps a chat message updated every few seconds with how much of the
/// year, the day and the current minute has elapsed.
#[derive(Parser, Debug)]
#[command(name = "tempo")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Bot token issued by the provider
    #[arg(long, env = "BOT_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Port for the liveness HTTP server
    #[arg(long, env = "PORT", default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Reference time zone as a UTC offset, e.g. +05:30
    #[arg(long, env = "TEMPO_UTC_OFFSET", default_value = "+00:00", allow_hyphen_values = true)]
    utc_offset: String,

    /// Bot API base URL
    #[arg(long, env = "TEMPO_API_BASE_URL", default_value = DEFAULT_API_BASE_URL)]
    api_base_url: String,

    /// Timeout for a single Bot API request, in seconds
    #[arg(long, env = "TEMPO_REQUEST_TIMEOUT", default_value_t = DEFAULT_REQUEST_TIMEOUT_SECS)]
    request_timeout: u64,

    /// Directory for JSON log files (console only when unset)
    #[arg(long, env = "TEMPO_LOG_DIR")]
    log_dir: Option<PathBuf>,

    /// Enable verbose logging (increases log level)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let _guard = match setup_logging(&cli) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {}", e);
            return ExitCode::from(1);
        }
    };

    match run(cli) {
        Ok(()) => {
            info!("TEMPO exited normally");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("TEMPO error: {:#}", e);
            eprintln!("Error: {:#}", e);
            if let Some(hint) = e.downcast_ref::<TempoError>().and_then(TempoError::guidance) {
                eprintln!("Hint: {}", hint);
            }
            ExitCode::from(1)
        }
    }
}

/// Set up logging based on CLI arguments.
fn setup_logging(cli: &Cli) -> tempo_core::Result<LogGuard> {
    let debug = cli.verbose > 0;
    init_logging(cli.log_dir.clone(), debug)
}

/// Validate CLI arguments into a bot configuration.
fn build_config(cli: &Cli) -> tempo_core::Result<BotConfig> {
    BotConfig::default()
        .with_token(cli.token.clone())
        .with_port(cli.port)
        .with_api_base_url(cli.api_base_url.clone())
        .with_request_timeout(Duration::from_secs(cli.request_timeout))
        .with_log_dir(cli.log_dir.clone())
        .with_utc_offset(&cli.utc_offset)
}

/// Start the liveness thread, then run the bot on a current-thread runtime
/// until Ctrl-C.
fn run(cli: Cli) -> anyhow::Result<()> {
    let config = build_config(&cli)?;
    if config.uses_placeholder_token() {
        warn!("BOT_TOKEN is not set; the provider will reject the placeholder token");
    }

    info!(
        port = config.port,
        utc_offset = %config.utc_offset,
        "Starting TEMPO live time progress bot"
    );

    let liveness = spawn_liveness_thread(config.port)?;
    info!(addr = %liveness.local_addr(), "liveness server started");

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|source| TempoError::Runtime { source })?;

    runtime.block_on(async {
        let shutdown = CancellationToken::new();
        let on_signal = shutdown.clone();
        tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => info!("shutdown requested"),
                Err(e) => warn!(error = %e, "Failed to listen for Ctrl-C"),
            }
            on_signal.cancel();
        });

        run_bot(&config, shutdown).await
    })?;

    Ok(())
}
