//! Conversation state machine.

use std::collections::HashMap;

use crate::TRACING_TARGET;
use crate::command::{Command, Input};
use crate::messages;
use crate::session::Session;
use crate::state::DialogueState;

/// Identifier of a chat.
pub type ChatId = i64;

/// Drives the prompt sequences of every chat against one [`Session`].
///
/// Input is handled one message at a time through `&mut self`; backend calls
/// are awaited inline and are not cancellable. Every backend error is turned
/// into a reply and the chat returns to [`DialogueState::Idle`].
#[derive(Debug)]
pub struct Controller {
    session: Session,
    dialogues: HashMap<ChatId, DialogueState>,
}

impl Controller {
    /// Creates a controller owning `session`.
    pub fn new(session: Session) -> Self {
        Self {
            session,
            dialogues: HashMap::new(),
        }
    }

    /// Returns the session.
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Returns the prompt state of a chat.
    pub fn state(&self, chat: ChatId) -> DialogueState {
        self.dialogues.get(&chat).copied().unwrap_or_default()
    }

    fn set_state(&mut self, chat: ChatId, state: DialogueState) {
        if state.is_pending() {
            self.dialogues.insert(chat, state);
        } else {
            self.dialogues.remove(&chat);
        }
    }

    /// Handles one message and returns the reply, if any.
    pub async fn handle(&mut self, chat: ChatId, input: Input) -> Option<String> {
        match input {
            Input::Command(command) => Some(self.handle_command(chat, command)),
            Input::Text(text) => self.handle_text(chat, &text).await,
            Input::UnknownCommand(name) => {
                tracing::debug!(
                    target: TRACING_TARGET,
                    chat,
                    command = %name,
                    "Ignoring unknown command"
                );
                None
            }
        }
    }

    fn handle_command(&mut self, chat: ChatId, command: Command) -> String {
        let state = self.state(chat);

        tracing::debug!(
            target: TRACING_TARGET,
            chat,
            command = %command,
            state = %state,
            "Handling command"
        );

        match command {
            Command::Start => messages::start(self.session.active_backend()),
            Command::Help => messages::help(),
            Command::Cancel if state.is_pending() => {
                self.set_state(chat, DialogueState::Idle);
                messages::CANCELLED.to_owned()
            }
            Command::Cancel => messages::NOTHING_TO_CANCEL.to_owned(),
            flow if state.is_pending() => {
                tracing::debug!(
                    target: TRACING_TARGET,
                    chat,
                    command = %flow,
                    pending = %state,
                    "Rejecting command while a prompt is pending"
                );
                messages::BUSY.to_owned()
            }
            flow => {
                let Some(next) = DialogueState::entered_by(flow) else {
                    return messages::help();
                };
                self.set_state(chat, next);
                self.prompt(next)
            }
        }
    }

    fn prompt(&self, state: DialogueState) -> String {
        match state {
            DialogueState::AwaitingBackendName => {
                messages::prompt_backend(&self.session.available_backends())
            }
            DialogueState::AwaitingCollectionNameCreate => messages::PROMPT_CREATE.to_owned(),
            DialogueState::AwaitingCollectionNameInsert => messages::PROMPT_INSERT.to_owned(),
            DialogueState::Idle => messages::help(),
        }
    }

    async fn handle_text(&mut self, chat: ChatId, text: &str) -> Option<String> {
        let state = self.state(chat);
        if !state.is_pending() {
            tracing::debug!(target: TRACING_TARGET, chat, "Ignoring text outside a prompt");
            return None;
        }

        let answer = text.trim();
        if answer.is_empty() {
            return Some(self.prompt(state));
        }

        // The prompt is consumed whatever the outcome.
        self.set_state(chat, DialogueState::Idle);

        let reply = match state {
            DialogueState::AwaitingBackendName => {
                match self.session.select_backend(answer).await {
                    Ok(kind) => messages::backend_selected(kind),
                    Err(err) => {
                        tracing::warn!(
                            target: TRACING_TARGET,
                            chat,
                            backend = %answer,
                            error = %err,
                            "Backend selection failed"
                        );
                        messages::backend_failed(answer, &err)
                    }
                }
            }
            DialogueState::AwaitingCollectionNameCreate => {
                match self.session.create_collection(answer).await {
                    Ok(created) => messages::collection_created(&created),
                    Err(err) => {
                        tracing::warn!(
                            target: TRACING_TARGET,
                            chat,
                            collection = %answer,
                            error = %err,
                            "Collection creation failed"
                        );
                        messages::operation_failed(&err)
                    }
                }
            }
            DialogueState::AwaitingCollectionNameInsert => {
                match self.session.insert_vectors(answer).await {
                    Ok(inserted) => messages::vectors_inserted(&inserted),
                    Err(err) => {
                        tracing::warn!(
                            target: TRACING_TARGET,
                            chat,
                            collection = %answer,
                            error = %err,
                            "Vector insertion failed"
                        );
                        messages::operation_failed(&err)
                    }
                }
            }
            DialogueState::Idle => return None,
        };

        Some(reply)
    }
}

#[cfg(test)]
mod tests {
    use vecbot_vector::mock::{MockConnector, MockState};
    use vecbot_vector::{
        BackendKind, BackendRegistry, CollectionConfig, CollectionSpec, Distance,
    };

    use super::*;

    const CHAT: ChatId = 42;

    fn controller(state: &MockState) -> Controller {
        let registry = BackendRegistry::new()
            .with_connector(MockConnector::new(BackendKind::Milvus, state.clone()))
            .with_connector(MockConnector::new(BackendKind::Qdrant, state.clone()));
        Controller::new(Session::new(registry, CollectionConfig::default()))
    }

    async fn send(controller: &mut Controller, text: &str) -> Option<String> {
        let input = Input::parse(text, None)?;
        controller.handle(CHAT, input).await
    }

    #[tokio::test]
    async fn start_reports_default_backend() {
        let state = MockState::default();
        let mut controller = controller(&state);

        let reply = send(&mut controller, "/start").await.unwrap();
        assert!(reply.contains("milvus"));
        assert_eq!(state.connect_calls(), 0);
    }

    #[tokio::test]
    async fn qdrant_scenario() {
        let state = MockState::default();
        let mut controller = controller(&state);

        let prompt = send(&mut controller, "/use_db").await.unwrap();
        assert!(prompt.contains("qdrant"));
        assert_eq!(controller.state(CHAT), DialogueState::AwaitingBackendName);

        let reply = send(&mut controller, "qdrant").await.unwrap();
        assert_eq!(reply, "Active backend: qdrant");
        assert_eq!(controller.session().active_backend(), BackendKind::Qdrant);
        assert_eq!(controller.state(CHAT), DialogueState::Idle);

        send(&mut controller, "/create_collection").await.unwrap();
        let reply = send(&mut controller, "demo").await.unwrap();
        assert_eq!(reply, "Collection demo created in qdrant.");

        let stored = state.collection(BackendKind::Qdrant, "demo").unwrap();
        assert_eq!(stored.spec, CollectionSpec::new(128, Distance::Cosine));

        send(&mut controller, "/insert_vectors").await.unwrap();
        let reply = send(&mut controller, "demo").await.unwrap();
        assert_eq!(reply, "Added 1000 vectors to collection demo in qdrant.");

        let stored = state.collection(BackendKind::Qdrant, "demo").unwrap();
        let ids: Vec<u64> = stored.points.iter().map(|p| p.id).collect();
        assert_eq!(ids, (0..1000).collect::<Vec<_>>());
        assert!(stored.points.iter().all(|p| p.vector.len() == 128));
        assert!(state.collection(BackendKind::Milvus, "demo").is_none());
    }

    #[tokio::test]
    async fn unknown_backend_keeps_active_backend() {
        let state = MockState::default();
        let mut controller = controller(&state);

        for name in ["postgres", "Qdrant", "MILVUS", "pinecone"] {
            send(&mut controller, "/use_db").await.unwrap();
            let reply = send(&mut controller, name).await.unwrap();
            assert_eq!(reply, format!("Unknown database: {name}"));
            assert_eq!(controller.session().active_backend(), BackendKind::Milvus);
            assert_eq!(controller.state(CHAT), DialogueState::Idle);
        }
        assert_eq!(state.connect_calls(), 0);
    }

    #[tokio::test]
    async fn connection_failure_keeps_active_backend() {
        let state = MockState::default();
        state.set_unreachable(true);
        let mut controller = controller(&state);

        send(&mut controller, "/use_db").await.unwrap();
        let reply = send(&mut controller, "qdrant").await.unwrap();

        assert!(reply.starts_with("Error: connection to qdrant failed"));
        assert_eq!(controller.session().active_backend(), BackendKind::Milvus);
        assert_eq!(controller.state(CHAT), DialogueState::Idle);
    }

    #[tokio::test]
    async fn operations_route_to_selected_backend() {
        let state = MockState::default();
        let mut controller = controller(&state);

        send(&mut controller, "/create_collection").await.unwrap();
        send(&mut controller, "first").await.unwrap();
        assert!(state.collection(BackendKind::Milvus, "first").is_some());

        send(&mut controller, "/use_db").await.unwrap();
        send(&mut controller, "qdrant").await.unwrap();
        send(&mut controller, "/create_collection").await.unwrap();
        send(&mut controller, "second").await.unwrap();

        assert!(state.collection(BackendKind::Qdrant, "second").is_some());
        assert!(state.collection(BackendKind::Milvus, "second").is_none());
    }

    #[tokio::test]
    async fn insert_into_missing_collection_fails_cleanly() {
        let state = MockState::default();
        let mut controller = controller(&state);

        send(&mut controller, "/insert_vectors").await.unwrap();
        let reply = send(&mut controller, "nowhere").await.unwrap();

        assert!(reply.starts_with("Error: failed to insert vectors into 'nowhere'"));
        assert!(reply.contains("collection not found"));
        assert!(state.collection(BackendKind::Milvus, "nowhere").is_none());
        assert_eq!(controller.state(CHAT), DialogueState::Idle);
    }

    #[tokio::test]
    async fn milvus_create_then_insert_stores_a_full_batch() {
        let state = MockState::default();
        let mut controller = controller(&state);

        send(&mut controller, "/create_collection").await.unwrap();
        send(&mut controller, "demo").await.unwrap();
        send(&mut controller, "/insert_vectors").await.unwrap();
        send(&mut controller, "demo").await.unwrap();

        let stored = state.collection(BackendKind::Milvus, "demo").unwrap();
        assert_eq!(stored.points.len(), 1000);
        assert!(stored.points.iter().all(|p| p.vector.len() == 128));
    }

    #[tokio::test]
    async fn cancel_makes_no_backend_call() {
        let state = MockState::default();
        let mut controller = controller(&state);

        for command in ["/use_db", "/create_collection", "/insert_vectors"] {
            send(&mut controller, command).await.unwrap();
            assert!(controller.state(CHAT).is_pending());

            let reply = send(&mut controller, "/cancel").await.unwrap();
            assert_eq!(reply, "Operation cancelled.");
            assert_eq!(controller.state(CHAT), DialogueState::Idle);
        }

        assert_eq!(state.connect_calls(), 0);
        assert_eq!(state.backend_calls(), 0);
        assert_eq!(
            send(&mut controller, "/cancel").await.unwrap(),
            "Nothing to cancel."
        );
    }

    #[tokio::test]
    async fn flow_command_while_pending_is_rejected() {
        let state = MockState::default();
        let mut controller = controller(&state);

        send(&mut controller, "/insert_vectors").await.unwrap();
        let reply = send(&mut controller, "/create_collection").await.unwrap();

        assert_eq!(reply, "Finish or cancel the current operation first.");
        assert_eq!(
            controller.state(CHAT),
            DialogueState::AwaitingCollectionNameInsert
        );

        // Start and help still answer without touching the prompt.
        assert!(send(&mut controller, "/help").await.is_some());
        assert_eq!(
            controller.state(CHAT),
            DialogueState::AwaitingCollectionNameInsert
        );
    }

    #[tokio::test]
    async fn idle_text_and_unknown_commands_are_ignored() {
        let state = MockState::default();
        let mut controller = controller(&state);

        assert_eq!(send(&mut controller, "hello").await, None);
        assert_eq!(send(&mut controller, "/frobnicate").await, None);
        assert_eq!(state.backend_calls(), 0);
    }

    #[tokio::test]
    async fn blank_answer_repeats_the_prompt() {
        let state = MockState::default();
        let mut controller = controller(&state);

        let prompt = send(&mut controller, "/create_collection").await.unwrap();
        let again = send(&mut controller, "   ").await.unwrap();

        assert_eq!(prompt, again);
        assert_eq!(
            controller.state(CHAT),
            DialogueState::AwaitingCollectionNameCreate
        );
    }

    #[tokio::test]
    async fn prompts_are_tracked_per_chat() {
        let state = MockState::default();
        let mut controller = controller(&state);

        controller
            .handle(1, Input::Command(Command::UseDb))
            .await
            .unwrap();

        assert_eq!(controller.state(1), DialogueState::AwaitingBackendName);
        assert_eq!(controller.state(2), DialogueState::Idle);
        assert_eq!(
            controller.handle(2, Input::Text("qdrant".into())).await,
            None
        );
        assert_eq!(controller.session().active_backend(), BackendKind::Milvus);
    }
}
