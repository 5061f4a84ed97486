#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod bot;
mod config;
mod telemetry;

use std::process;

use anyhow::Context;

use crate::bot::Bot;
use crate::config::Cli;

// Tracing target constants
pub const TRACING_TARGET_STARTUP: &str = "vecbot_cli::startup";
pub const TRACING_TARGET_SHUTDOWN: &str = "vecbot_cli::shutdown";
pub const TRACING_TARGET_POLLING: &str = "vecbot_cli::polling";
pub const TRACING_TARGET_CONFIG: &str = "vecbot_cli::config";

#[tokio::main]
async fn main() {
    let Err(error) = run().await else {
        tracing::info!(
            target: TRACING_TARGET_SHUTDOWN,
            "application terminated successfully"
        );
        process::exit(0);
    };

    if tracing::enabled!(tracing::Level::ERROR) {
        tracing::error!(
            target: TRACING_TARGET_SHUTDOWN,
            error = %format!("{error:#}"),
            "application terminated with error"
        );
    } else {
        eprintln!("Error: {error:#}");
    }

    process::exit(1);
}

/// Main application entry point.
async fn run() -> anyhow::Result<()> {
    let cli = Cli::init();

    telemetry::init_tracing(cli.log_format)?;

    tracing::info!(
        target: TRACING_TARGET_STARTUP,
        version = env!("CARGO_PKG_VERSION"),
        "starting vecbot"
    );
    Cli::log_build_info();

    let config = cli.load_config()?;
    cli.log_config(&config);

    let bot = Bot::new(config).context("failed to create bot")?;
    bot.run().await
}
