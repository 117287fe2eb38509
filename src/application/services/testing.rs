//! Scripted bot used by the service and dispatcher tests

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

use crate::application::errors::BotError;
use crate::domain::entities::Reply;
use crate::domain::traits::{Bot, BotInfo};

/// Answers each `send_reply` with the next scripted result (success once the
/// script runs out) and records every attempt.
#[derive(Default)]
pub struct ScriptedBot {
    script: Mutex<VecDeque<Result<(), BotError>>>,
    sent: Mutex<Vec<(i64, Reply)>>,
}

impl ScriptedBot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_with(results: Vec<BotError>) -> Self {
        let bot = Self::new();
        bot.script
            .lock()
            .unwrap()
            .extend(results.into_iter().map(Err));
        bot
    }

    /// Every attempted reply, including the ones that were rejected
    pub fn attempts(&self) -> Vec<(i64, Reply)> {
        self.sent.lock().unwrap().clone()
    }

    pub fn rejection() -> BotError {
        BotError::PlatformRejection("Bad Request: BUTTON_TYPE_INVALID".to_string())
    }

    pub fn network() -> BotError {
        BotError::Network("connection reset".to_string())
    }
}

#[async_trait]
impl Bot for ScriptedBot {
    async fn send_reply(&self, chat_id: i64, reply: &Reply) -> Result<String, BotError> {
        let attempt = self.sent.lock().unwrap().len();
        self.sent.lock().unwrap().push((chat_id, reply.clone()));
        match self.script.lock().unwrap().pop_front() {
            Some(Err(e)) => Err(e),
            _ => Ok(attempt.to_string()),
        }
    }

    fn bot_info(&self) -> BotInfo {
        BotInfo {
            id: "1".to_string(),
            name: "Mines Calculator".to_string(),
            username: "mines_calc_bot".to_string(),
        }
    }
}
