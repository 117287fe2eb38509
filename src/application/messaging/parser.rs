//! Message parser - Turns inbound text into command events

use crate::domain::entities::{BotCommand, CommandEvent, InboundMessage};

/// Recognises `/command` and `/command@BotName` at the start of a message
pub struct MessageParser {
    bot_username: Option<String>,
}

impl MessageParser {
    /// `bot_username` is used to ignore commands addressed to other bots in groups
    pub fn new(bot_username: Option<String>) -> Self {
        Self {
            bot_username: bot_username.map(|u| u.trim_start_matches('@').to_string()),
        }
    }

    /// Parse a message into a command event; `None` for plain text or unknown commands
    pub fn parse(&self, message: &InboundMessage) -> Option<CommandEvent> {
        let command = self.parse_command(&message.text)?;

        let mut event = CommandEvent::new(command, message.chat_id);
        if let Some(user_id) = message.user_id {
            event = event.with_user(user_id, message.username.clone());
        }
        Some(event)
    }

    /// Parse the command name from the first token of `text`
    pub fn parse_command(&self, text: &str) -> Option<BotCommand> {
        let token = text.split_whitespace().next()?;
        let token = token.strip_prefix('/')?;

        let name = match token.split_once('@') {
            Some((name, mention)) => {
                // Bot usernames are case-insensitive on Telegram
                let addressed_to_us = self
                    .bot_username
                    .as_deref()
                    .is_some_and(|ours| ours.eq_ignore_ascii_case(mention));
                if !addressed_to_us {
                    return None;
                }
                name
            }
            None => token,
        };

        BotCommand::from_name(name)
    }
}
