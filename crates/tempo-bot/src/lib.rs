//! # tempo-bot
//!
//! The live time progress bot.
//!
//! This crate provides:
//! - [`SessionRegistry`] - per-conversation state with generations and cancellation
//! - [`Updater`] - the continuous-update loop that edits one message in place
//! - [`Dispatcher`] - `/start`, `/progress`, `/stop`, `/stats` and `/help`
//! - [`Poller`] - long-polling command intake
//! - [`health`] - the liveness HTTP server
//! - [`run_bot`] - everything above wired to the Telegram client
//!
//! ## Example
//!
//! ```no_run
//! use tempo_bot::run_bot;
//! use tempo_core::BotConfig;
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn example() -> tempo_core::Result<()> {
//! let config = BotConfig::default().with_token(Some("123:abc".to_string()));
//! run_bot(&config, CancellationToken::new()).await?;
//! # Ok(())
//! # }
//! ```

pub mod bot;
pub mod clock;
pub mod commands;
pub mod health;
pub mod poller;
pub mod session;
pub mod texts;
pub mod updater;

pub use bot::run_bot;
pub use clock::{Clock, SystemClock, TokioClock};
pub use commands::{Command, CommandEvent, CommandOutcome, Dispatcher};
pub use health::{LivenessServer, spawn_liveness_thread};
pub use poller::{Poller, events_from};
pub use session::{LoopTicket, SessionRegistry, SessionSnapshot};
pub use updater::{LoopExit, LoopTiming, Updater};
