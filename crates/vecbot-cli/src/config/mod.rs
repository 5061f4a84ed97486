//! CLI configuration management.
//!
//! ```text
//! Cli
//! ├── config: PathBuf          # JSON config file
//! ├── telegram_token: Option   # overrides the file value
//! └── log_format: LogFormat    # pretty or json
//!
//! BotConfig (config file)
//! ├── telegram_token
//! ├── milvus / qdrant          # backend connection settings
//! ├── collection               # dimensions, distance, batch size
//! └── polling                  # long-poll timeout, retry delay
//! ```
//!
//! Every CLI argument can also be provided through its environment variable.

mod file;

use std::path::PathBuf;
use std::process;

use anyhow::Context;
use clap::{Parser, ValueEnum};
pub use file::{BotConfig, PollingConfig};

use crate::{TRACING_TARGET_CONFIG, TRACING_TARGET_STARTUP};

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Human-readable output.
    #[default]
    Pretty,
    /// One JSON object per line.
    Json,
}

/// Command-line arguments.
#[derive(Debug, Clone, Parser)]
#[command(name = "vecbot")]
#[command(about = "Telegram bot for Milvus and Qdrant collections")]
#[command(version)]
pub struct Cli {
    /// Path of the JSON configuration file.
    #[arg(short, long, env = "VECBOT_CONFIG", default_value = "config.json")]
    pub config: PathBuf,

    /// Telegram bot token, overrides `telegram_token` from the file.
    #[arg(long, env = "TELEGRAM_TOKEN", hide_env_values = true)]
    pub telegram_token: Option<String>,

    /// Log output format.
    #[arg(long, env = "VECBOT_LOG_FORMAT", value_enum, default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,
}

impl Cli {
    /// Loads environment variables from .env file (if enabled) and parses CLI arguments.
    pub fn init() -> Self {
        Self::load_dotenv();
        Self::parse()
    }

    /// Loads environment variables from .env file if the dotenv feature is enabled.
    #[cfg(feature = "dotenv")]
    fn load_dotenv() {
        if let Err(err) = dotenvy::dotenv()
            && !err.not_found()
        {
            eprintln!("Warning: failed to load .env file: {err}");
        }
    }

    /// No-op when dotenv feature is disabled.
    #[cfg(not(feature = "dotenv"))]
    fn load_dotenv() {}

    /// Reads the config file and applies command-line overrides.
    pub fn load_config(&self) -> anyhow::Result<BotConfig> {
        let mut config = BotConfig::from_file(&self.config)
            .with_context(|| format!("failed to load {}", self.config.display()))?;

        if let Some(token) = &self.telegram_token {
            config.telegram_token = token.clone();
        }

        config.validate().context("invalid configuration")?;
        Ok(config)
    }

    /// Logs build information at debug level.
    pub fn log_build_info() {
        tracing::debug!(
            target: TRACING_TARGET_STARTUP,
            version = env!("CARGO_PKG_VERSION"),
            pid = process::id(),
            arch = std::env::consts::ARCH,
            os = std::env::consts::OS,
            features = ?Self::enabled_features(),
            "Build information"
        );
    }

    /// Logs the loaded configuration (no sensitive information).
    pub fn log_config(&self, config: &BotConfig) {
        tracing::info!(
            target: TRACING_TARGET_CONFIG,
            path = %self.config.display(),
            token_override = self.telegram_token.is_some(),
            milvus = %config.store.milvus.url(),
            qdrant = %config.store.qdrant.url(),
            dimensions = config.store.collection.dimensions,
            distance = %config.store.collection.distance,
            batch_size = config.store.collection.batch_size,
            poll_timeout_secs = config.polling.timeout_secs,
            "Configuration loaded"
        );
    }

    /// Returns a list of enabled compile-time features.
    fn enabled_features() -> Vec<&'static str> {
        [cfg!(feature = "dotenv").then_some("dotenv")]
            .into_iter()
            .flatten()
            .collect()
    }
}
