#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod client;
mod config;
mod error;
mod types;

pub use crate::client::TelegramClient;
pub use crate::config::TelegramConfig;
pub use crate::error::{Error, Result};
pub use crate::types::{BotCommand, Chat, Message, Update, User};

/// Tracing target for Telegram client operations.
pub const TRACING_TARGET: &str = "vecbot_telegram";
