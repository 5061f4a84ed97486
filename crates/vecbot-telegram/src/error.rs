//! Error types for vecbot-telegram.

use thiserror::Error;

/// Result type alias for vecbot-telegram operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for Telegram Bot API calls.
#[derive(Debug, Error)]
pub enum Error {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Reqwest(reqwest::Error),
    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    /// The Bot API answered with `ok = false`.
    #[error("Telegram API error{}: {description}", .code.map(|c| format!(" {c}")).unwrap_or_default())]
    Api {
        /// Error code reported by the API.
        code: Option<i64>,
        /// Human-readable description.
        description: String,
    },
    /// Invalid client configuration.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Returns whether the error came from a request timing out.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Reqwest(e) if e.is_timeout())
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        // The request URL embeds the bot token.
        Self::Reqwest(err.without_url())
    }
}
