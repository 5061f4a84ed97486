//! Configuration for the Telegram client.

use std::time::Duration;

use crate::error::{Error, Result};

/// Default Bot API endpoint.
pub const DEFAULT_API_URL: &str = "https://api.telegram.org";

/// Default timeout for regular requests: 30 seconds.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Configuration for the Telegram client.
#[derive(Clone)]
pub struct TelegramConfig {
    /// Bot token issued by BotFather.
    pub token: String,
    /// Base URL of the Bot API.
    pub api_url: String,
    /// Timeout for regular requests. Long polls add their own wait on top.
    pub timeout: Duration,
    /// User-Agent header to send with requests.
    pub user_agent: String,
}

impl TelegramConfig {
    /// Creates a configuration for `token` with default settings.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            api_url: DEFAULT_API_URL.to_owned(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: format!("vecbot/{}", env!("CARGO_PKG_VERSION")),
        }
    }

    /// Sets the Bot API base URL.
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.token.trim().is_empty() {
            return Err(Error::Config("telegram token cannot be empty".into()));
        }
        if !self.api_url.starts_with("http://") && !self.api_url.starts_with("https://") {
            return Err(Error::Config(
                "api_url must start with http:// or https://".into(),
            ));
        }
        if self.timeout.is_zero() {
            return Err(Error::Config("timeout cannot be zero".into()));
        }
        Ok(())
    }

    /// Returns the URL of a Bot API method.
    pub(crate) fn method_url(&self, method: &str) -> String {
        format!(
            "{}/bot{}/{}",
            self.api_url.trim_end_matches('/'),
            self.token,
            method
        )
    }
}

impl std::fmt::Debug for TelegramConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramConfig")
            .field("api_url", &self.api_url)
            .field("timeout", &self.timeout)
            .field("user_agent", &self.user_agent)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_method_urls() {
        let config = TelegramConfig::new("123:abc").with_api_url("http://localhost:8081/");
        assert_eq!(
            config.method_url("getUpdates"),
            "http://localhost:8081/bot123:abc/getUpdates"
        );
    }

    #[test]
    fn validation() {
        assert!(TelegramConfig::new("123:abc").validate().is_ok());
        assert!(TelegramConfig::new("  ").validate().is_err());
        assert!(
            TelegramConfig::new("123:abc")
                .with_api_url("api.telegram.org")
                .validate()
                .is_err()
        );
        assert!(
            TelegramConfig::new("123:abc")
                .with_timeout(Duration::ZERO)
                .validate()
                .is_err()
        );
    }

    #[test]
    fn debug_hides_token() {
        let printed = format!("{:?}", TelegramConfig::new("123:secret"));
        assert!(!printed.contains("secret"));
    }
}
