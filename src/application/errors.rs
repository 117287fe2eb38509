//! Application layer errors

use thiserror::Error;

/// Errors raised while talking to the messaging platform
#[derive(Error, Debug)]
pub enum BotError {
    /// The platform refused this particular message shape
    /// (e.g. web app buttons in a chat that does not support them).
    #[error("Platform rejected request: {0}")]
    PlatformRejection(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("API error {code}: {description}")]
    Api { code: i64, description: String },

    #[error("Parse error: {0}")]
    Parse(String),
}

impl BotError {
    pub fn is_platform_rejection(&self) -> bool {
        matches!(self, BotError::PlatformRejection(_))
    }
}

/// Faults raised outside any command handler
#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("Malformed update {update_id:?}: {reason}")]
    MalformedUpdate {
        update_id: Option<i64>,
        reason: String,
    },

    #[error("Handler for chat {chat_id} aborted: {reason}")]
    HandlerAborted { chat_id: i64, reason: String },

    #[error("Transport error: {0}")]
    Transport(#[from] BotError),
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value: {0}")]
    InvalidValue(String),

    #[error("Parse error: {0}")]
    Parse(String),
}
