//! # tempo-telegram
//!
//! Message transport for Tempo.
//!
//! This crate provides:
//! - [`MessageTransport`] / [`UpdateSource`] - the seams the bot talks through
//! - [`TelegramClient`] - Telegram Bot API over HTTP (reqwest)
//! - [`MockTransport`] - scripted in-memory transport for tests
//! - [`TransportError`] - provider errors classified into an [`ErrorKind`]

pub mod client;
pub mod config;
pub mod error;
pub mod mock;
pub mod transport;
pub mod types;

pub use client::TelegramClient;
pub use config::TelegramConfig;
pub use error::{ErrorKind, Result, TransportError};
pub use mock::{EditAttempt, MockTransport, SentMessage};
pub use transport::{MessageTransport, UpdateSource};
pub use types::{Chat, ChatId, Message, MessageId, Update, User};
