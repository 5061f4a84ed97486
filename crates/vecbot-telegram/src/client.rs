//! Telegram Bot API client implementation using reqwest.

use std::sync::Arc;
use std::time::{Duration, Instant};

use reqwest::Client;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::json;

use crate::TRACING_TARGET;
use crate::config::TelegramConfig;
use crate::error::{Error, Result};
use crate::types::{ApiResponse, BotCommand, Message, Update, User};

/// Inner client that holds the HTTP client and configuration.
struct TelegramClientInner {
    http: Client,
    config: TelegramConfig,
}

impl std::fmt::Debug for TelegramClientInner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramClientInner")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Telegram Bot API client.
///
/// # Examples
///
/// ```rust,no_run
/// use vecbot_telegram::{TelegramClient, TelegramConfig};
///
/// # async fn run() -> vecbot_telegram::Result<()> {
/// let client = TelegramClient::new(TelegramConfig::new("123:abc"))?;
/// let updates = client.get_updates(None, 30).await?;
/// for update in updates {
///     if let Some((chat_id, text)) = update.text_message() {
///         client.send_message(chat_id, text).await?;
///     }
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct TelegramClient {
    inner: Arc<TelegramClientInner>,
}

impl TelegramClient {
    /// Creates a new client with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the HTTP client
    /// cannot be created.
    pub fn new(config: TelegramConfig) -> Result<Self> {
        config.validate()?;

        let http = Client::builder()
            .user_agent(&config.user_agent)
            .build()?;

        tracing::debug!(
            target: TRACING_TARGET,
            api_url = %config.api_url,
            timeout_ms = config.timeout.as_millis(),
            "Telegram client created"
        );

        Ok(Self {
            inner: Arc::new(TelegramClientInner { http, config }),
        })
    }

    /// Gets the client configuration.
    pub fn config(&self) -> &TelegramConfig {
        &self.inner.config
    }

    /// Calls a Bot API method and decodes its result.
    async fn call<P, R>(&self, method: &str, params: &P, timeout: Duration) -> Result<R>
    where
        P: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let started_at = Instant::now();

        let response = self
            .inner
            .http
            .post(self.inner.config.method_url(method))
            .json(params)
            .timeout(timeout)
            .send()
            .await?;

        let body = response.bytes().await?;
        let envelope: ApiResponse<R> = serde_json::from_slice(&body)?;

        tracing::trace!(
            target: TRACING_TARGET,
            method,
            ok = envelope.ok,
            elapsed_ms = started_at.elapsed().as_millis(),
            "Bot API call completed"
        );

        match envelope {
            ApiResponse {
                ok: true,
                result: Some(result),
                ..
            } => Ok(result),
            ApiResponse {
                error_code,
                description,
                ..
            } => Err(Error::Api {
                code: error_code,
                description: description.unwrap_or_else(|| format!("{method} returned no result")),
            }),
        }
    }

    /// Returns the bot's own account.
    pub async fn get_me(&self) -> Result<User> {
        self.call("getMe", &json!({}), self.inner.config.timeout)
            .await
    }

    /// Removes any webhook so that long polling can be used.
    ///
    /// With `drop_pending_updates`, updates queued while the bot was offline
    /// are discarded.
    pub async fn delete_webhook(&self, drop_pending_updates: bool) -> Result<bool> {
        let params = json!({ "drop_pending_updates": drop_pending_updates });
        self.call("deleteWebhook", &params, self.inner.config.timeout)
            .await
    }

    /// Long-polls for updates with an id of at least `offset`.
    ///
    /// The server holds the request for up to `timeout_secs` seconds when no
    /// update is available.
    pub async fn get_updates(&self, offset: Option<i64>, timeout_secs: u64) -> Result<Vec<Update>> {
        let params = json!({
            "offset": offset,
            "timeout": timeout_secs,
            "allowed_updates": ["message"],
        });
        let timeout = self.inner.config.timeout + Duration::from_secs(timeout_secs);
        self.call("getUpdates", &params, timeout).await
    }

    /// Sends a plain text message.
    pub async fn send_message(&self, chat_id: i64, text: &str) -> Result<Message> {
        tracing::debug!(
            target: TRACING_TARGET,
            chat_id,
            length = text.len(),
            "Sending message"
        );

        let params = json!({ "chat_id": chat_id, "text": text });
        self.call("sendMessage", &params, self.inner.config.timeout)
            .await
    }

    /// Replaces the bot's command menu.
    pub async fn set_my_commands(&self, commands: &[BotCommand]) -> Result<bool> {
        let params = json!({ "commands": commands });
        self.call("setMyCommands", &params, self.inner.config.timeout)
            .await
    }
}
