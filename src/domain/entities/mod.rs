//! Domain entities - Core business objects

pub mod command;
pub mod reply;

pub use command::{BotCommand, CommandEvent, InboundMessage};
pub use reply::{Button, Reply};
