//! Telegram Bot API delivery
//!
//! One GET to `{api_base}/bot{token}/sendMessage` per message, HTML parse
//! mode. A message counts as delivered only when the HTTP status is 2xx and
//! the body does not say `ok: false`.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use super::types::Notification;
use super::Notifier;
use crate::config::TelegramConfig;
use crate::errors::{FastMoverError, FastMoverResult};
use crate::logger::{self, LogTag};

/// Envelope of every Bot API response
#[derive(Debug, Deserialize)]
struct TelegramResponse {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}

/// Telegram notifier for sending messages to one chat
pub struct TelegramNotifier {
    client: Client,
    api_base_url: String,
    bot_token: String,
    chat_id: String,
}

impl TelegramNotifier {
    /// Notifier for the alert chat
    pub fn new(config: &TelegramConfig) -> FastMoverResult<Self> {
        Self::for_chat(config, &config.chat_id)
    }

    /// Notifier for the admin chat, when one is configured
    pub fn admin(config: &TelegramConfig) -> FastMoverResult<Option<Self>> {
        match config.admin_chat_id.as_deref() {
            Some(chat_id) if !chat_id.is_empty() => Self::for_chat(config, chat_id).map(Some),
            _ => Ok(None),
        }
    }

    /// Notifier for an arbitrary chat with the configured bot
    pub fn for_chat(config: &TelegramConfig, chat_id: &str) -> FastMoverResult<Self> {
        if config.bot_token.is_empty() {
            return Err(FastMoverError::Config("Bot token is empty".to_string()));
        }
        if chat_id.is_empty() {
            return Err(FastMoverError::Config("Chat ID is empty".to_string()));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            api_base_url: config.api_base_url.trim_end_matches('/').to_string(),
            bot_token: config.bot_token.clone(),
            chat_id: chat_id.to_string(),
        })
    }

    pub fn chat_id(&self) -> &str {
        &self.chat_id
    }

    fn endpoint(&self) -> String {
        format!("{}/bot{}/sendMessage", self.api_base_url, self.bot_token)
    }

    /// Send a pre-rendered HTML message
    pub async fn send_message(&self, message: &str) -> FastMoverResult<()> {
        let response = self
            .client
            .get(self.endpoint())
            .query(&[
                ("chat_id", self.chat_id.as_str()),
                ("text", message),
                ("parse_mode", "HTML"),
            ])
            .send()
            .await
            // The request URL carries the bot token
            .map_err(|e| FastMoverError::Http(e.without_url()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| FastMoverError::Http(e.without_url()))?;

        check_response(status.as_u16(), &body)?;

        logger::debug(
            LogTag::Telegram,
            &format!("Sent Telegram message (length={})", message.len()),
        );
        Ok(())
    }
}

/// Map a Bot API reply to delivery success or the most specific error
fn check_response(status: u16, body: &str) -> FastMoverResult<()> {
    let parsed = serde_json::from_str::<TelegramResponse>(body).ok();

    if !(200..300).contains(&status) {
        return Err(match parsed.and_then(|r| r.description) {
            Some(description) => FastMoverError::Telegram { description },
            None => FastMoverError::HttpStatus {
                endpoint: "sendMessage".to_string(),
                status,
            },
        });
    }

    match parsed {
        Some(TelegramResponse { ok: false, description }) => Err(FastMoverError::Telegram {
            description: description.unwrap_or_else(|| "unknown error".to_string()),
        }),
        _ => Ok(()),
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn send(&self, notification: &Notification) -> FastMoverResult<()> {
        let message = notification.format_html();
        self.send_message(&message).await
    }
}
