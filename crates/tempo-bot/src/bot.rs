//! Wiring of the bot runtime.

use std::sync::Arc;

use tempo_core::{BotConfig, Result};
use tempo_telegram::{MessageTransport, TelegramClient, TelegramConfig, UpdateSource};
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::clock::SystemClock;
use crate::commands::Dispatcher;
use crate::poller::Poller;
use crate::session::SessionRegistry;
use crate::updater::Updater;

/// Validate the token, then poll for commands until `shutdown` is cancelled.
///
/// Must run inside a tokio runtime. Returns an error if the provider rejects
/// the token, at startup or later.
pub async fn run_bot(config: &BotConfig, shutdown: CancellationToken) -> Result<()> {
    let client = Arc::new(TelegramClient::from_config(TelegramConfig::from(config))?);

    let me = client.get_me().await?;
    info!(
        bot_id = me.id,
        username = me.username.as_deref().unwrap_or(""),
        utc_offset = %config.utc_offset,
        "bot authorized"
    );

    let transport: Arc<dyn MessageTransport> = client.clone();
    let source: Arc<dyn UpdateSource> = client;
    let sessions = Arc::new(SessionRegistry::new());
    let clock = Arc::new(SystemClock::new(config.utc_offset));

    let updater = Updater::new(Arc::clone(&transport), Arc::clone(&sessions), clock);
    let dispatcher = Dispatcher::new(transport, Arc::clone(&sessions), updater);

    Poller::new(source, dispatcher).run(shutdown).await?;

    info!(
        active_sessions = sessions.active_count(),
        "bot stopped"
    );
    Ok(())
}
