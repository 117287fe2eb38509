//! Command responder - builds and sends the reply for each command

use crate::domain::entities::{BotCommand, Button, CommandEvent, Reply};
use crate::domain::traits::Bot;

use super::fallback::{self, Outcome, Tier};

const LINK_LABEL: &str = "🎯 Open Mines Calculator";
const WEB_APP_LABEL: &str = "📱 Open inside Telegram";

const START_TEXT: &str = "🎮 Welcome to Mines Calculator Bot!\n\n\
    Use /mines to open the calculator in any group or private chat.\n\
    If the in-chat calculator doesn't open for you, use /mines_simple for a plain link.\n\n\
    This bot helps you calculate multipliers and potential winnings for the Mines game.";

// Legacy markdown: underscores outside entities must be escaped.
const HELP_TEXT: &str = "🎮 *Mines Calculator Bot Help*\n\n\
    *Commands:*\n\
    /mines - Open the Mines multiplier calculator\n\
    /mines\\_simple - Get a plain link to the calculator\n\
    /start - Welcome message\n\
    /help - Show this help message\n\n\
    *How to use:*\n\
    1. Type /mines in any group or private chat\n\
    2. Click the 'Open Mines Calculator' button\n\
    3. Select your casino (Stake or Jacks)\n\
    4. Enter number of mines (1-24)\n\
    5. Enter tiles clicked (1-24)\n\
    6. Enter your bet amount\n\
    7. Click Calculate to see your multiplier and potential winnings!";

const RICH_TEXT: &str = "🎮 *Mines Multiplier Calculator*\n\n\
    Calculate your potential winnings for the Mines game!\n\
    • Supports Stake and Jacks casinos\n\
    • Enter mines count (1-24)\n\
    • Enter tiles clicked (1-24)\n\
    • Enter your bet amount\n\n\
    Click a button below to open the calculator:";

const SIMPLE_TEXT: &str = "🎮 *Mines Multiplier Calculator*\n\n\
    Click the button below to open the calculator:";

const APOLOGY_TEXT: &str = "Sorry, something went wrong. Please try again later.";

/// Builds replies around the configured calculator URL
#[derive(Debug, Clone)]
pub struct CommandResponder {
    webapp_url: String,
}

impl CommandResponder {
    /// `webapp_url` must already be validated; it is the only URL ever put in a button.
    pub fn new(webapp_url: impl Into<String>) -> Self {
        Self {
            webapp_url: webapp_url.into(),
        }
    }

    /// Route a command event to its handler
    pub async fn respond<B: Bot + ?Sized>(&self, bot: &B, event: &CommandEvent) -> Outcome {
        let outcome = match event.command {
            BotCommand::Start => self.handle_start(bot, event).await,
            BotCommand::Help => self.handle_help(bot, event).await,
            BotCommand::Mines => self.handle_mines_rich(bot, event).await,
            BotCommand::MinesSimple => self.handle_mines_simple(bot, event).await,
        };

        tracing::info!(
            command = %event.command,
            chat_id = event.chat_id,
            user_id = ?event.user_id,
            username = ?event.username,
            "Handled command: {:?}",
            outcome
        );
        outcome
    }

    pub async fn handle_start<B: Bot + ?Sized>(&self, bot: &B, event: &CommandEvent) -> Outcome {
        fallback::deliver(bot, self, event, Tier::Info).await
    }

    pub async fn handle_help<B: Bot + ?Sized>(&self, bot: &B, event: &CommandEvent) -> Outcome {
        fallback::deliver(bot, self, event, Tier::Info).await
    }

    pub async fn handle_mines_simple<B: Bot + ?Sized>(&self, bot: &B, event: &CommandEvent) -> Outcome {
        fallback::deliver(bot, self, event, Tier::Simple).await
    }

    pub async fn handle_mines_rich<B: Bot + ?Sized>(&self, bot: &B, event: &CommandEvent) -> Outcome {
        fallback::deliver(bot, self, event, Tier::Rich).await
    }

    /// Reply shown for `command` at presentation `tier`
    pub fn reply_for(&self, command: BotCommand, tier: Tier) -> Reply {
        match (tier, command) {
            (Tier::Info, BotCommand::Help) => Self::help_reply(),
            (Tier::Info, _) => Self::start_reply(),
            (Tier::Rich, _) => self.rich_reply(),
            (Tier::Simple, _) => self.simple_reply(),
            (Tier::TextOnly, _) => self.text_only_reply(),
        }
    }

    pub fn start_reply() -> Reply {
        Reply::text(START_TEXT)
    }

    pub fn help_reply() -> Reply {
        Reply::markdown(HELP_TEXT)
    }

    /// Link row first so clients that render only one row still get a working button
    pub fn rich_reply(&self) -> Reply {
        Reply::markdown(RICH_TEXT)
            .with_row(vec![Button::link(LINK_LABEL, &self.webapp_url)])
            .with_row(vec![Button::web_app(WEB_APP_LABEL, &self.webapp_url)])
    }

    pub fn simple_reply(&self) -> Reply {
        Reply::markdown(SIMPLE_TEXT).with_row(vec![Button::link(LINK_LABEL, &self.webapp_url)])
    }

    /// No markup: the URL may contain characters markdown would eat
    pub fn text_only_reply(&self) -> Reply {
        Reply::text(format!("Open the Mines calculator here:\n{}", self.webapp_url))
    }

    pub fn apology_reply() -> Reply {
        Reply::text(APOLOGY_TEXT)
    }
}
