//! Bot API objects used by the bot.

use serde::{Deserialize, Serialize};

/// Response envelope returned by every Bot API method.
#[derive(Debug, Deserialize)]
pub(crate) struct ApiResponse<T> {
    pub ok: bool,
    pub result: Option<T>,
    pub description: Option<String>,
    pub error_code: Option<i64>,
}

/// A Telegram user or bot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier.
    pub id: i64,
    /// Whether this user is a bot.
    #[serde(default)]
    pub is_bot: bool,
    /// First name.
    pub first_name: String,
    /// Username, without the leading `@`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

/// A chat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chat {
    /// Unique identifier.
    pub id: i64,
    /// Chat type: `private`, `group`, `supergroup` or `channel`.
    #[serde(rename = "type")]
    pub kind: String,
}

/// A message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Identifier inside the chat.
    pub message_id: i64,
    /// Chat the message belongs to.
    pub chat: Chat,
    /// Sender, empty for channel posts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<User>,
    /// Unix time the message was sent.
    pub date: i64,
    /// Text of a text message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// An incoming update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Update {
    /// Monotonic update identifier.
    pub update_id: i64,
    /// New incoming message, if this update carries one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<Message>,
}

impl Update {
    /// Returns the chat id and text of a text message update.
    pub fn text_message(&self) -> Option<(i64, &str)> {
        let message = self.message.as_ref()?;
        let text = message.text.as_deref()?;
        Some((message.chat.id, text))
    }
}

/// Entry of the bot command menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BotCommand {
    /// Command name without the leading slash.
    pub command: String,
    /// Description shown in the menu.
    pub description: String,
}

impl BotCommand {
    /// Creates a menu entry.
    pub fn new(command: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            description: description.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_get_updates_response() {
        let body = r#"{
            "ok": true,
            "result": [
                {
                    "update_id": 10,
                    "message": {
                        "message_id": 1,
                        "from": { "id": 7, "is_bot": false, "first_name": "Ann" },
                        "chat": { "id": 7, "type": "private" },
                        "date": 1700000000,
                        "text": "/use_db"
                    }
                },
                { "update_id": 11, "edited_message": {} }
            ]
        }"#;

        let response: ApiResponse<Vec<Update>> = serde_json::from_str(body).unwrap();
        assert!(response.ok);

        let updates = response.result.unwrap();
        assert_eq!(updates.len(), 2);
        assert_eq!(updates[0].text_message(), Some((7, "/use_db")));
        assert_eq!(updates[1].text_message(), None);
    }

    #[test]
    fn decodes_error_response() {
        let body = r#"{"ok":false,"error_code":401,"description":"Unauthorized"}"#;
        let response: ApiResponse<User> = serde_json::from_str(body).unwrap();

        assert!(!response.ok);
        assert!(response.result.is_none());
        assert_eq!(response.error_code, Some(401));
        assert_eq!(response.description.as_deref(), Some("Unauthorized"));
    }
}
