//! Long-polling loop connecting Telegram to the conversation controller.

mod shutdown;

use anyhow::Context;
pub use shutdown::shutdown_signal;
use vecbot_chat::{Command, Controller, Input, Session};
use vecbot_telegram::{BotCommand, TelegramClient, TelegramConfig, Update};
use vecbot_vector::BackendRegistry;

use crate::config::{BotConfig, PollingConfig};
use crate::{TRACING_TARGET_POLLING, TRACING_TARGET_STARTUP};

/// Returns the command menu registered with Telegram.
pub fn menu() -> Vec<BotCommand> {
    Command::all()
        .map(|command| BotCommand::new(command.name(), command.description()))
        .collect()
}

/// A running bot.
pub struct Bot {
    client: TelegramClient,
    controller: Controller,
    polling: PollingConfig,
    username: Option<String>,
}

impl Bot {
    /// Builds the bot from the loaded configuration.
    ///
    /// No backend is contacted until a chat needs it.
    pub fn new(config: BotConfig) -> anyhow::Result<Self> {
        let client = TelegramClient::new(TelegramConfig::new(config.telegram_token))
            .context("failed to create Telegram client")?;

        let registry = BackendRegistry::from_config(&config.store);
        let session = Session::new(registry, config.store.collection);

        Ok(Self {
            client,
            controller: Controller::new(session),
            polling: config.polling,
            username: None,
        })
    }

    /// Identifies the bot, switches it to long polling and publishes the menu.
    async fn prepare(&mut self) -> anyhow::Result<()> {
        let me = self
            .client
            .get_me()
            .await
            .context("failed to authenticate with the Bot API")?;

        tracing::info!(
            target: TRACING_TARGET_STARTUP,
            bot_id = me.id,
            username = me.username.as_deref().unwrap_or_default(),
            "Authenticated with Telegram"
        );
        self.username = me.username;

        self.client
            .delete_webhook(true)
            .await
            .context("failed to remove webhook")?;

        if let Err(err) = self.client.set_my_commands(&menu()).await {
            tracing::warn!(
                target: TRACING_TARGET_STARTUP,
                error = %err,
                "Failed to publish command menu"
            );
        }

        Ok(())
    }

    /// Polls for updates until a shutdown signal is received.
    ///
    /// Updates are handled one at a time, in the order Telegram delivers them.
    pub async fn run(mut self) -> anyhow::Result<()> {
        self.prepare().await?;

        tracing::info!(
            target: TRACING_TARGET_STARTUP,
            active_backend = %self.controller.session().active_backend(),
            "Bot is polling for updates"
        );

        let shutdown = shutdown_signal();
        tokio::pin!(shutdown);

        let mut offset = None;
        loop {
            let polled = tokio::select! {
                () = &mut shutdown => break,
                polled = self.client.get_updates(offset, self.polling.timeout_secs) => polled,
            };

            let updates = match polled {
                Ok(updates) => updates,
                Err(err) => {
                    tracing::warn!(
                        target: TRACING_TARGET_POLLING,
                        error = %err,
                        retry_in_secs = self.polling.retry_delay_secs,
                        "Failed to fetch updates"
                    );
                    tokio::select! {
                        () = &mut shutdown => break,
                        () = tokio::time::sleep(self.polling.retry_delay()) => continue,
                    }
                }
            };

            for update in updates {
                offset = Some(update.update_id + 1);
                self.dispatch(&update).await;
            }
        }

        tracing::info!(target: TRACING_TARGET_POLLING, "Polling stopped");
        Ok(())
    }

    /// Routes one update through the controller and sends the reply.
    async fn dispatch(&mut self, update: &Update) {
        let Some((chat_id, text)) = update.text_message() else {
            tracing::trace!(
                target: TRACING_TARGET_POLLING,
                update_id = update.update_id,
                "Skipping update without text"
            );
            return;
        };

        let Some(input) = Input::parse(text, self.username.as_deref()) else {
            return;
        };

        let Some(reply) = self.controller.handle(chat_id, input).await else {
            return;
        };

        if let Err(err) = self.client.send_message(chat_id, &reply).await {
            tracing::warn!(
                target: TRACING_TARGET_POLLING,
                chat_id,
                error = %err,
                "Failed to send reply"
            );
        }
    }
}
