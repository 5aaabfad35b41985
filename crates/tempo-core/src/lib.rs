//! # tempo-core
//!
//! Core errors, logging and configuration shared by the Tempo crates.
//!
//! This crate provides:
//! - [`TempoError`] - Error type for startup and runtime plumbing
//! - [`logging`] - Tracing setup and the session-event macro
//! - [`config`] - Validated bot configuration
//!
//! ## Example
//!
//! ```no_run
//! use tempo_core::{BotConfig, logging};
//!
//! fn main() -> tempo_core::Result<()> {
//!     let _guard = logging::init_logging(None, false)?;
//!     let config = BotConfig::default().with_utc_offset("+05:30")?;
//!     tracing::info!(port = config.port, "configured");
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod logging;

pub use config::{BotConfig, parse_utc_offset};
pub use error::{Result, TempoError};
pub use logging::{LogGuard, init_logging};
