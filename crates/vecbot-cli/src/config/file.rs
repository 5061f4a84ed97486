//! Configuration file format.

use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use vecbot_vector::VectorStoreConfig;

/// Contents of the JSON configuration file.
#[derive(Clone, Serialize, Deserialize)]
pub struct BotConfig {
    /// Telegram bot token issued by BotFather.
    pub telegram_token: String,
    /// Backend connection settings and collection defaults.
    #[serde(flatten)]
    pub store: VectorStoreConfig,
    /// Long polling settings.
    #[serde(default)]
    pub polling: PollingConfig,
}

impl BotConfig {
    /// Reads and parses a configuration file.
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let contents = fs::read_to_string(path).context("failed to read configuration file")?;
        Self::from_json(&contents)
    }

    /// Parses a configuration document.
    pub fn from_json(contents: &str) -> anyhow::Result<Self> {
        serde_json::from_str(contents).context("failed to parse configuration file")
    }

    /// Validates all configuration values.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.telegram_token.trim().is_empty() {
            anyhow::bail!("telegram_token cannot be empty");
        }
        self.store.validate()?;
        self.polling.validate()?;
        Ok(())
    }
}

impl std::fmt::Debug for BotConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BotConfig")
            .field("store", &self.store)
            .field("polling", &self.polling)
            .finish_non_exhaustive()
    }
}

/// Long polling settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollingConfig {
    /// How long the Bot API may hold a `getUpdates` request, in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Delay before polling again after a failed request, in seconds.
    #[serde(default = "default_retry_delay_secs")]
    pub retry_delay_secs: u64,
}

impl PollingConfig {
    /// Returns the retry delay.
    pub fn retry_delay(&self) -> Duration {
        Duration::from_secs(self.retry_delay_secs)
    }

    /// Validates the polling settings.
    pub fn validate(&self) -> anyhow::Result<()> {
        // Telegram caps long polling at 50 seconds.
        if self.timeout_secs > 50 {
            anyhow::bail!(
                "polling timeout {} seconds is invalid, must be at most 50",
                self.timeout_secs
            );
        }
        if self.retry_delay_secs == 0 {
            anyhow::bail!("polling retry delay must be greater than zero");
        }
        Ok(())
    }
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            retry_delay_secs: default_retry_delay_secs(),
        }
    }
}

const fn default_timeout_secs() -> u64 {
    30
}

const fn default_retry_delay_secs() -> u64 {
    5
}
