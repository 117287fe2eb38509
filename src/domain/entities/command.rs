use std::fmt;

/// The closed set of commands this bot answers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BotCommand {
    Start,
    Help,
    /// Link button plus embedded web app button
    Mines,
    /// Link button only
    MinesSimple,
}

impl BotCommand {
    pub const ALL: [BotCommand; 4] = [
        BotCommand::Start,
        BotCommand::Help,
        BotCommand::Mines,
        BotCommand::MinesSimple,
    ];

    /// Command name without the leading slash
    pub fn name(&self) -> &'static str {
        match self {
            BotCommand::Start => "start",
            BotCommand::Help => "help",
            BotCommand::Mines => "mines",
            BotCommand::MinesSimple => "mines_simple",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            BotCommand::Start => "Welcome message",
            BotCommand::Help => "Show help message",
            BotCommand::Mines => "Open the Mines multiplier calculator",
            BotCommand::MinesSimple => "Get a plain link to the calculator",
        }
    }

    /// Exact, case-sensitive lookup by name (no slash, no @mention)
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|cmd| cmd.name() == name)
    }
}

impl fmt::Display for BotCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}", self.name())
    }
}

/// One inbound command, consumed once by the responder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandEvent {
    pub command: BotCommand,
    pub chat_id: i64,
    pub user_id: Option<i64>,
    pub username: Option<String>,
}

impl CommandEvent {
    pub fn new(command: BotCommand, chat_id: i64) -> Self {
        Self {
            command,
            chat_id,
            user_id: None,
            username: None,
        }
    }

    pub fn with_user(mut self, user_id: i64, username: Option<String>) -> Self {
        self.user_id = Some(user_id);
        self.username = username;
        self
    }
}

/// Text message as received from the transport, before command parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    pub chat_id: i64,
    pub user_id: Option<i64>,
    pub username: Option<String>,
    pub text: String,
}

impl InboundMessage {
    pub fn new(chat_id: i64, text: impl Into<String>) -> Self {
        Self {
            chat_id,
            user_id: None,
            username: None,
            text: text.into(),
        }
    }

    pub fn with_sender(mut self, user_id: i64, username: Option<String>) -> Self {
        self.user_id = Some(user_id);
        self.username = username;
        self
    }
}
