//! Message dispatcher - Routes messages to the responder

use std::sync::Arc;

use crate::application::errors::DispatchError;
use crate::application::services::{CommandResponder, Outcome};
use crate::domain::entities::InboundMessage;
use crate::domain::traits::Bot;
use super::parser::MessageParser;

/// What became of one inbound message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatched {
    /// Plain text or an unknown command; nothing was sent
    NotACommand,
    /// The responder ran to completion
    Handled(Outcome),
    /// The handler task died; the global handler took over
    Aborted,
}

/// Routes inbound messages to the responder and absorbs faults so the
/// receive loop keeps running.
pub struct MessageDispatcher {
    bot: Arc<dyn Bot>,
    parser: MessageParser,
    responder: CommandResponder,
}

impl MessageDispatcher {
    pub fn new(bot: Arc<dyn Bot>, responder: CommandResponder) -> Self {
        let username = bot.bot_info().username;
        let parser = MessageParser::new((!username.is_empty()).then_some(username));
        Self {
            bot,
            parser,
            responder,
        }
    }

    /// Handle one inbound message.
    ///
    /// The handler runs on its own task so that a panic inside it is turned
    /// into a dispatch fault instead of tearing down the loop.
    pub async fn dispatch(&self, message: InboundMessage) -> Dispatched {
        let Some(event) = self.parser.parse(&message) else {
            return Dispatched::NotACommand;
        };
        tracing::debug!(
            command = %event.command,
            chat_id = event.chat_id,
            user_id = ?event.user_id,
            "Dispatching command"
        );

        let bot = Arc::clone(&self.bot);
        let responder = self.responder.clone();
        let task = tokio::spawn(async move { responder.respond(bot.as_ref(), &event).await });

        match task.await {
            Ok(outcome) => Dispatched::Handled(outcome),
            Err(e) => {
                let fault = DispatchError::HandlerAborted {
                    chat_id: message.chat_id,
                    reason: e.to_string(),
                };
                self.handle_fault(&fault, Some(message.chat_id)).await;
                Dispatched::Aborted
            }
        }
    }

    /// Global fault handler: log, then send one best-effort apology if the chat is known.
    pub async fn handle_fault(&self, fault: &DispatchError, chat_id: Option<i64>) {
        let Some(chat_id) = chat_id else {
            tracing::error!("Dispatch fault with no chat to notify: {}", fault);
            return;
        };

        tracing::error!(chat_id, "Dispatch fault: {}", fault);
        if let Err(e) = self
            .bot
            .send_reply(chat_id, &CommandResponder::apology_reply())
            .await
        {
            tracing::error!(chat_id, "Failed to send apology after fault: {}", e);
        }
    }
}
