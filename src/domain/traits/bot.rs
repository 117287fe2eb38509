use async_trait::async_trait;
use crate::domain::entities::Reply;
use crate::application::errors::BotError;

/// Bot trait - abstraction for messaging platform adapters
#[async_trait]
pub trait Bot: Send + Sync {
    /// Send a reply (text and optional button rows) to a chat, returning the message id.
    ///
    /// Implementations must report a refusal of the message shape itself as
    /// `BotError::PlatformRejection` so callers can retry with a simpler reply.
    async fn send_reply(&self, chat_id: i64, reply: &Reply) -> Result<String, BotError>;

    /// Get bot info
    fn bot_info(&self) -> BotInfo;
}

/// Bot information
#[derive(Debug, Clone)]
pub struct BotInfo {
    pub id: String,
    pub name: String,
    pub username: String,
}
