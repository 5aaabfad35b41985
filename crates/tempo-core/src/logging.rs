//! Logging infrastructure for Tempo.
//!
//! Structured logging through the `tracing` ecosystem. Console output always
//! goes to stderr in a compact human-readable form, which is what hosting
//! platforms capture. When a log directory is given, a daily-rolling JSON lines
//! file is written there as well.
//!
//! ## Example
//!
//! ```no_run
//! use tempo_core::logging;
//!
//! let _guard = logging::init_logging(None, false).expect("logging init");
//! tracing::info!("Tempo started");
//! tracing::debug!(chat_id = 42, "session created");
//! ```

use std::path::PathBuf;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Layer,
};

use crate::error::{Result, TempoError};

/// File name prefix used by the rolling JSON appender.
pub const LOG_FILE_NAME: &str = "tempo.log";

/// Guard that must be held to ensure log flushing on shutdown.
///
/// Keep this guard alive for the lifetime of the application.
pub struct LogGuard {
    _file_guard: Option<WorkerGuard>,
}

/// Initialize the Tempo logging system.
///
/// # Arguments
///
/// * `log_dir` - Optional directory for JSON log files. Console only when `None`.
/// * `verbose` - If true, sets the default level to DEBUG. Otherwise INFO.
///
/// `RUST_LOG` overrides the default filter when set.
pub fn init_logging(log_dir: Option<PathBuf>, verbose: bool) -> Result<LogGuard> {
    let default_level = if verbose { "debug" } else { "info" };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "tempo={default_level},tempo_core={default_level},tempo_bot={default_level},\
             tempo_telegram={default_level},tempo_render={default_level}"
        ))
    });

    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(false)
        .with_thread_names(verbose)
        .with_file(verbose)
        .with_line_number(verbose)
        .compact();

    let (file_layer, file_guard) = match &log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir).map_err(|e| TempoError::DirectoryCreation {
                path: dir.clone(),
                source: e,
            })?;

            let file_appender = tracing_appender::rolling::daily(dir, LOG_FILE_NAME);
            let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);

            let layer = fmt::layer()
                .with_writer(non_blocking_file)
                .with_ansi(false)
                .json()
                .with_span_events(FmtSpan::CLOSE)
                .with_current_span(true)
                .with_span_list(true)
                .boxed();
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(console_layer)
        .try_init()
        .map_err(|e| TempoError::internal(format!("logging already initialized: {e}")))?;

    tracing::debug!(
        log_dir = ?log_dir.as_ref().map(|d| d.display().to_string()),
        verbose,
        "logging initialized"
    );

    Ok(LogGuard {
        _file_guard: file_guard,
    })
}

/// Initialize minimal console-only logging for tests.
pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}

/// Log a session lifecycle event with a consistent target.
///
/// # Example
///
/// ```ignore
/// log_session_event!(chat_id, "started");
/// log_session_event!(chat_id, "terminated", reason = "message not found");
/// ```
#[macro_export]
macro_rules! log_session_event {
    ($chat_id:expr, $event:expr) => {
        tracing::info!(
            target: "tempo::session",
            chat_id = %$chat_id,
            event = $event,
            "session event"
        )
    };
    ($chat_id:expr, $event:expr, $($field:tt)*) => {
        tracing::info!(
            target: "tempo::session",
            chat_id = %$chat_id,
            event = $event,
            $($field)*,
            "session event"
        )
    };
}
