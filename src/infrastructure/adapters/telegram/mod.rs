//! Telegram adapter

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::application::errors::{BotError, DispatchError};
use crate::domain::entities::{BotCommand, Button, InboundMessage, Reply};
use crate::domain::traits::{Bot, BotInfo};

/// Telegram API base URL
const API_BASE: &str = "https://api.telegram.org";

/// Telegram update type
#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    pub update_id: i64,
    pub message: Option<Message>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    pub message_id: i64,
    pub from: Option<User>,
    pub chat: Chat,
    pub text: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
    pub id: i64,
}

/// Envelope of every Bot API response
#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    ok: bool,
    result: Option<T>,
    error_code: Option<i64>,
    description: Option<String>,
}

impl<T> ApiResponse<T> {
    /// `ok: false` with code 400 means Telegram refused the request itself
    /// (bad markup, unsupported button type for this chat, ...).
    fn into_result(self) -> Result<T, BotError> {
        let description = self.description.unwrap_or_else(|| "no description".to_string());
        match (self.ok, self.result) {
            (true, Some(result)) => Ok(result),
            (true, None) => Err(BotError::Parse("response has no result".to_string())),
            (false, _) => match self.error_code {
                Some(400) => Err(BotError::PlatformRejection(description)),
                code => Err(BotError::Api {
                    code: code.unwrap_or_default(),
                    description,
                }),
            },
        }
    }
}

#[derive(Debug, Serialize)]
struct SendMessageRequest {
    chat_id: i64,
    text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    parse_mode: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reply_markup: Option<InlineKeyboardMarkup>,
}

#[derive(Debug, Serialize)]
struct InlineKeyboardMarkup {
    inline_keyboard: Vec<Vec<InlineKeyboardButton>>,
}

#[derive(Debug, Serialize)]
struct InlineKeyboardButton {
    text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    web_app: Option<WebAppInfo>,
}

#[derive(Debug, Serialize)]
struct WebAppInfo {
    url: String,
}

impl From<&Button> for InlineKeyboardButton {
    fn from(button: &Button) -> Self {
        match button {
            Button::Link { label, url } => InlineKeyboardButton {
                text: label.clone(),
                url: Some(url.clone()),
                web_app: None,
            },
            Button::WebApp { label, url } => InlineKeyboardButton {
                text: label.clone(),
                url: None,
                web_app: Some(WebAppInfo { url: url.clone() }),
            },
        }
    }
}

impl SendMessageRequest {
    fn new(chat_id: i64, reply: &Reply) -> Self {
        let reply_markup = (!reply.rows.is_empty()).then(|| InlineKeyboardMarkup {
            inline_keyboard: reply
                .rows
                .iter()
                .map(|row| row.iter().map(InlineKeyboardButton::from).collect())
                .collect(),
        });

        Self {
            chat_id,
            text: reply.text.clone(),
            parse_mode: reply.parse_mode.map(|mode| mode.as_str()),
            reply_markup,
        }
    }
}

/// Telegram bot adapter
pub struct TelegramAdapter {
    token: String,
    client: Client,
    info: BotInfo,
}

impl TelegramAdapter {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            client: Client::new(),
            info: BotInfo {
                id: "unknown".to_string(),
                name: "mines-calculator-bot".to_string(),
                username: String::new(),
            },
        }
    }

    /// Get the API URL for a method
    fn api_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", API_BASE, self.token, method)
    }

    /// Token prefix that is safe to log
    pub fn token_hint(&self) -> &str {
        self.token
            .char_indices()
            .nth(8)
            .map_or(&self.token[..], |(i, _)| &self.token[..i])
    }

    /// POST a JSON body to a Bot API method and unwrap the response envelope
    async fn call<Req: Serialize + ?Sized, Res: DeserializeOwned>(
        &self,
        method: &str,
        request: &Req,
    ) -> Result<Res, BotError> {
        let response = self.client
            .post(self.api_url(method))
            .json(request)
            .send()
            .await
            .map_err(|e| BotError::Network(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| BotError::Network(e.to_string()))?;

        match serde_json::from_str::<ApiResponse<Res>>(&body) {
            Ok(envelope) => envelope.into_result(),
            Err(_) if !status.is_success() => Err(BotError::Api {
                code: i64::from(status.as_u16()),
                description: format!("Telegram API error: {}", status),
            }),
            Err(e) => Err(BotError::Parse(e.to_string())),
        }
    }

    /// Fetch bot info from Telegram API
    pub async fn fetch_bot_info(&mut self) -> Result<(), BotError> {
        #[derive(Deserialize)]
        struct BotInfoResponse {
            id: i64,
            first_name: String,
            username: Option<String>,
        }

        let data: BotInfoResponse = self.call("getMe", &serde_json::json!({})).await?;

        self.info = BotInfo {
            id: data.id.to_string(),
            name: data.first_name,
            username: data.username.unwrap_or_default(),
        };

        Ok(())
    }

    /// Get raw updates using getUpdates. Updates are decoded one at a time by
    /// [`TelegramAdapter::decode_update`] so a single bad update cannot drop the batch.
    pub async fn get_updates(&self, offset: i64, timeout: u64) -> Result<Vec<Value>, BotError> {
        #[derive(Serialize)]
        struct GetUpdatesRequest {
            offset: i64,
            timeout: u64,
            allowed_updates: Vec<String>,
        }

        let request = GetUpdatesRequest {
            offset,
            timeout,
            allowed_updates: vec!["message".to_string()],
        };

        self.call("getUpdates", &request).await
    }

    /// Get the next update offset
    pub fn get_next_offset(updates: &[Value], current: i64) -> i64 {
        updates.iter()
            .filter_map(|u| u.get("update_id").and_then(Value::as_i64))
            .map(|id| id + 1)
            .max()
            .map_or(current, |next| next.max(current))
    }

    /// Decode a raw update into a text message. `Ok(None)` for updates without text.
    pub fn decode_update(raw: &Value) -> Result<Option<InboundMessage>, DispatchError> {
        let update: Update = serde_json::from_value(raw.clone()).map_err(|e| DispatchError::MalformedUpdate {
            update_id: raw.get("update_id").and_then(Value::as_i64),
            reason: e.to_string(),
        })?;

        let Some(message) = update.message else {
            return Ok(None);
        };
        let Some(text) = message.text else {
            return Ok(None);
        };

        let mut inbound = InboundMessage::new(message.chat.id, text);
        if let Some(from) = message.from {
            inbound = inbound.with_sender(from.id, from.username);
        }
        Ok(Some(inbound))
    }

    /// Best-effort chat id of an update that failed to decode
    pub fn chat_id_hint(raw: &Value) -> Option<i64> {
        raw.pointer("/message/chat/id").and_then(Value::as_i64)
    }

    /// Register bot commands with Telegram
    pub async fn register_commands(&self) -> Result<(), BotError> {
        #[derive(Serialize)]
        struct Command {
            command: &'static str,
            description: &'static str,
        }

        #[derive(Serialize)]
        struct SetMyCommandsRequest {
            commands: Vec<Command>,
        }

        let request = SetMyCommandsRequest {
            commands: BotCommand::ALL
                .iter()
                .map(|cmd| Command {
                    command: cmd.name(),
                    description: cmd.description(),
                })
                .collect(),
        };

        let _: bool = self.call("setMyCommands", &request).await?;

        tracing::info!("Registered bot commands with Telegram");
        Ok(())
    }
}

#[async_trait]
impl Bot for TelegramAdapter {
    async fn send_reply(&self, chat_id: i64, reply: &Reply) -> Result<String, BotError> {
        #[derive(Deserialize)]
        struct MessageResult {
            message_id: i64,
        }

        tracing::debug!(chat_id, rows = reply.rows.len(), "Sending reply");

        let request = SendMessageRequest::new(chat_id, reply);
        let result: MessageResult = self.call("sendMessage", &request).await?;

        Ok(result.message_id.to_string())
    }

    fn bot_info(&self) -> BotInfo {
        self.info.clone()
    }
}
