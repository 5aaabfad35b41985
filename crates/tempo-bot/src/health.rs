//! Liveness HTTP server for hosting-platform health checks.
//!
//! Runs on its own OS thread with its own current-thread runtime, so a busy
//! bot runtime can never make the health check time out. It shares no state
//! with the bot.

use std::net::{SocketAddr, TcpListener as StdTcpListener};
use std::thread::JoinHandle;

use axum::{Router, routing::get};
use tempo_core::{Result, TempoError};
use tokio::net::TcpListener;
use tracing::{error, info};

/// Body served at `/`.
pub const ROOT_STATUS: &str = "🤖 Telegram Bot is running! ⏳";

/// Body served at `/health`.
pub const HEALTH_STATUS: &str = "OK";

async fn root() -> &'static str {
    ROOT_STATUS
}

async fn health() -> &'static str {
    HEALTH_STATUS
}

/// Liveness routes. Unknown paths get axum's default 404.
pub fn router() -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
}

/// Serve the liveness routes on an already bound listener.
pub async fn serve(listener: TcpListener) -> Result<()> {
    axum::serve(listener, router())
        .await
        .map_err(|e| TempoError::Server {
            message: e.to_string(),
        })
}

/// A liveness server running on a background thread.
pub struct LivenessServer {
    addr: SocketAddr,
    thread: JoinHandle<()>,
}

impl LivenessServer {
    /// Address the server is bound to.
    pub fn local_addr(&self) -> SocketAddr {
        self.addr
    }

    /// Whether the server thread has exited.
    pub fn is_finished(&self) -> bool {
        self.thread.is_finished()
    }
}

/// Bind `0.0.0.0:<port>` and serve liveness on a dedicated thread.
///
/// The socket is bound before this returns, so a port conflict is reported
/// to the caller instead of dying silently on the background thread.
pub fn spawn_liveness_thread(port: u16) -> Result<LivenessServer> {
    let bind_addr = SocketAddr::from(([0, 0, 0, 0], port));
    let bind_error = |source| TempoError::ServerBind {
        addr: bind_addr.to_string(),
        source,
    };

    let listener = StdTcpListener::bind(bind_addr).map_err(bind_error)?;
    listener.set_nonblocking(true).map_err(bind_error)?;
    let addr = listener.local_addr().map_err(bind_error)?;

    let thread = std::thread::Builder::new()
        .name("tempo-liveness".to_string())
        .spawn(move || {
            let runtime = match tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
            {
                Ok(runtime) => runtime,
                Err(e) => {
                    error!(error = %e, "Failed to build liveness runtime");
                    return;
                }
            };

            let result = runtime.block_on(async move {
                let listener = TcpListener::from_std(listener).map_err(|source| {
                    TempoError::ServerBind {
                        addr: addr.to_string(),
                        source,
                    }
                })?;
                info!(%addr, "liveness server listening");
                serve(listener).await
            });

            if let Err(e) = result {
                error!(error = %e, "Liveness server stopped");
            }
        })
        .map_err(|source| TempoError::Runtime { source })?;

    Ok(LivenessServer { addr, thread })
}
