//! Reply texts.

use vecbot_vector::{BackendKind, CollectionCreated, VectorError, VectorsInserted};

use crate::command::Command;

pub(crate) const PROMPT_CREATE: &str = "Enter the name of the collection to create:";
pub(crate) const PROMPT_INSERT: &str = "Enter the name of the collection to add vectors to:";
pub(crate) const CANCELLED: &str = "Operation cancelled.";
pub(crate) const NOTHING_TO_CANCEL: &str = "Nothing to cancel.";
pub(crate) const BUSY: &str = "Finish or cancel the current operation first.";

pub(crate) fn start(active: BackendKind) -> String {
    format!("Hi! Current active database: {active}")
}

pub(crate) fn help() -> String {
    let mut text = String::from("Available commands:");
    for command in Command::all().filter(|c| !matches!(c, Command::Start | Command::Help)) {
        text.push_str(&format!("\n/{} - {}", command.name(), command.description()));
    }
    text
}

pub(crate) fn prompt_backend(available: &[BackendKind]) -> String {
    let list = available
        .iter()
        .map(|b| b.as_str())
        .collect::<Vec<_>>()
        .join("\n");
    format!("Available databases:\n{list}\nEnter the name of the database to use:")
}

pub(crate) fn backend_selected(kind: BackendKind) -> String {
    format!("Active backend: {kind}")
}

pub(crate) fn backend_failed(name: &str, err: &VectorError) -> String {
    match err {
        VectorError::UnknownBackend(_) => format!("Unknown database: {name}"),
        other => format!("Error: {other}"),
    }
}

pub(crate) fn collection_created(created: &CollectionCreated) -> String {
    format!(
        "Collection {} created in {}.",
        created.collection, created.backend
    )
}

pub(crate) fn vectors_inserted(inserted: &VectorsInserted) -> String {
    format!(
        "Added {} vectors to collection {} in {}.",
        inserted.count, inserted.collection, inserted.backend
    )
}

pub(crate) fn operation_failed(err: &VectorError) -> String {
    format!("Error: {err}")
}
