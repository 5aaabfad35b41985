//! Error types for Tempo startup and runtime plumbing.
//!
//! This module defines [`TempoError`], the error enum shared by the binary and
//! the library crates for everything that is not a per-message delivery
//! failure. Delivery failures have their own structured type in
//! `tempo-telegram` because the update loop branches on them.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using [`TempoError`].
pub type Result<T> = std::result::Result<T, TempoError>;

/// Error type for Tempo operations outside the message transport.
#[derive(Debug, Error)]
pub enum TempoError {
    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// A configuration value could not be parsed
    #[error("Invalid configuration value for {field}: {message}")]
    ConfigInvalid { field: String, message: String },

    /// The bot token was rejected by the provider
    #[error("Bot token rejected: {message}")]
    TokenRejected { message: String },

    // =========================================================================
    // I/O Errors
    // =========================================================================
    /// Directory creation failed
    #[error("Failed to create directory: {path}")]
    DirectoryCreation {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Liveness server could not bind its socket
    #[error("Failed to bind liveness server on {addr}")]
    ServerBind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    /// Liveness server stopped with an error
    #[error("Liveness server error: {message}")]
    Server { message: String },

    /// Async runtime could not be built
    #[error("Failed to build async runtime")]
    Runtime {
        #[source]
        source: std::io::Error,
    },

    // =========================================================================
    // Transport Errors (startup only)
    // =========================================================================
    /// The transport could not be reached during startup
    #[error("Transport unavailable: {message}")]
    TransportUnavailable { message: String },

    // =========================================================================
    // Internal Errors
    // =========================================================================
    /// Internal error (bug in Tempo)
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl TempoError {
    /// Create a ConfigInvalid error
    pub fn config_invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConfigInvalid {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a TokenRejected error
    pub fn token_rejected(message: impl Into<String>) -> Self {
        Self::TokenRejected {
            message: message.into(),
        }
    }

    /// Create a TransportUnavailable error
    pub fn transport_unavailable(message: impl Into<String>) -> Self {
        Self::TransportUnavailable {
            message: message.into(),
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Returns true if this is a configuration error
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            Self::ConfigInvalid { .. } | Self::TokenRejected { .. }
        )
    }

    /// Returns true if the process should exit on this error
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::ConfigInvalid { .. }
                | Self::TokenRejected { .. }
                | Self::ServerBind { .. }
                | Self::Runtime { .. }
                | Self::Internal { .. }
        )
    }

    /// Returns actionable guidance for the operator
    pub fn guidance(&self) -> Option<&'static str> {
        match self {
            Self::TokenRejected { .. } => {
                Some("Set BOT_TOKEN to the token issued by @BotFather")
            }
            Self::ConfigInvalid { .. } => Some("Run 'tempo --help' to see accepted values"),
            Self::ServerBind { .. } => Some("Choose a free port with PORT or --port"),
            Self::TransportUnavailable { .. } => {
                Some("Check network access to the Telegram Bot API")
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_invalid_error() {
        let err = TempoError::config_invalid("utc_offset", "expected +HH:MM");
        assert!(err.to_string().contains("utc_offset"));
        assert!(err.is_config_error());
        assert!(err.is_fatal());
        assert!(err.guidance().is_some());
    }

    #[test]
    fn test_token_rejected_guidance() {
        let err = TempoError::token_rejected("Unauthorized");
        assert_eq!(
            err.guidance(),
            Some("Set BOT_TOKEN to the token issued by @BotFather")
        );
    }

    #[test]
    fn test_transport_unavailable_is_not_fatal() {
        let err = TempoError::transport_unavailable("connection refused");
        assert!(!err.is_fatal());
        assert!(!err.is_config_error());
    }
}
