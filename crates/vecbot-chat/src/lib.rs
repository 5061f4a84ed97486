#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod command;
mod controller;
mod messages;
mod session;
mod state;

pub use command::{Command, Input};
pub use controller::{ChatId, Controller};
pub use session::Session;
pub use state::DialogueState;

/// Tracing target for conversation handling.
pub const TRACING_TARGET: &str = "vecbot_chat";
