//! Per-chat prompt state.

use strum::Display;

use crate::command::Command;

/// Which prompt, if any, is waiting for a free-text answer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "snake_case")]
pub enum DialogueState {
    /// No prompt pending.
    #[default]
    Idle,
    /// Waiting for a backend name.
    AwaitingBackendName,
    /// Waiting for the name of a collection to create.
    AwaitingCollectionNameCreate,
    /// Waiting for the name of a collection to insert into.
    AwaitingCollectionNameInsert,
}

impl DialogueState {
    /// Returns the prompt state entered by a flow command.
    pub fn entered_by(command: Command) -> Option<Self> {
        match command {
            Command::UseDb => Some(Self::AwaitingBackendName),
            Command::CreateCollection => Some(Self::AwaitingCollectionNameCreate),
            Command::InsertVectors => Some(Self::AwaitingCollectionNameInsert),
            Command::Start | Command::Help | Command::Cancel => None,
        }
    }

    /// Returns whether a prompt is pending.
    pub fn is_pending(self) -> bool {
        self != Self::Idle
    }
}
