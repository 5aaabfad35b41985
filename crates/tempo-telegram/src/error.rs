//! Error types for the message transport.
//!
//! Provider failures are classified once, here, into an [`ErrorKind`] so the
//! update loop can branch on a discriminant instead of matching text.

use std::time::Duration;

use thiserror::Error;

/// Transport errors.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The message to edit no longer exists
    #[error("Message not found: {0}")]
    MessageNotFound(String),

    /// The message exists but the provider refuses edits to it
    #[error("Message can't be edited: {0}")]
    MessageNotEditable(String),

    /// The new text is identical to the current text
    #[error("Message is not modified")]
    NotModified,

    /// Provider flood control
    #[error("Too many requests (retry after {retry_after:?})")]
    RateLimited { retry_after: Option<Duration> },

    /// The bot token was rejected
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// The bot may no longer write to the chat (blocked, kicked, left)
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Any other API-level error
    #[error("API error {code}: {description}")]
    Api { code: i64, description: String },

    /// The response envelope was well-formed JSON but missing data
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// HTTP request error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Discriminant the update loop branches on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    MessageNotFound,
    MessageNotEditable,
    NotModified,
    RateLimited,
    Unauthorized,
    Forbidden,
    Other,
}

impl TransportError {
    /// Classify an API error envelope.
    ///
    /// `retry_after` is the provider's `parameters.retry_after` in seconds.
    pub fn from_api(code: i64, description: &str, retry_after: Option<u64>) -> Self {
        let lower = description.to_lowercase();

        if code == 429 || lower.contains("too many requests") || lower.contains("flood") {
            return Self::RateLimited {
                retry_after: retry_after.map(Duration::from_secs),
            };
        }
        if lower.contains("message to edit not found") || lower.contains("message not found") {
            return Self::MessageNotFound(description.to_string());
        }
        if lower.contains("message can't be edited") {
            return Self::MessageNotEditable(description.to_string());
        }
        if lower.contains("message is not modified") {
            return Self::NotModified;
        }

        match code {
            401 => Self::Unauthorized(description.to_string()),
            403 => Self::Forbidden(description.to_string()),
            _ => Self::Api {
                code,
                description: description.to_string(),
            },
        }
    }

    /// The classified kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MessageNotFound(_) => ErrorKind::MessageNotFound,
            Self::MessageNotEditable(_) => ErrorKind::MessageNotEditable,
            Self::NotModified => ErrorKind::NotModified,
            Self::RateLimited { .. } => ErrorKind::RateLimited,
            Self::Unauthorized(_) => ErrorKind::Unauthorized,
            Self::Forbidden(_) => ErrorKind::Forbidden,
            Self::Api { .. }
            | Self::MalformedResponse(_)
            | Self::Http(_)
            | Self::Json(_) => ErrorKind::Other,
        }
    }

    /// True when the tracked message can never be edited again.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::MessageNotFound | ErrorKind::MessageNotEditable | ErrorKind::Forbidden
        )
    }

    /// True for provider throttling.
    pub fn is_rate_limit(&self) -> bool {
        self.kind() == ErrorKind::RateLimited
    }

    /// Provider-suggested wait, if any.
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            Self::RateLimited { retry_after } => *retry_after,
            _ => None,
        }
    }

    /// True for connection-level failures.
    pub fn is_network_error(&self) -> bool {
        match self {
            Self::Http(e) => e.is_connect() || e.is_timeout() || e.is_request(),
            _ => false,
        }
    }
}

impl From<TransportError> for tempo_core::TempoError {
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::Unauthorized(msg) => tempo_core::TempoError::token_rejected(msg),
            other => tempo_core::TempoError::transport_unavailable(other.to_string()),
        }
    }
}

/// Result type for transport operations.
pub type Result<T> = std::result::Result<T, TransportError>;
