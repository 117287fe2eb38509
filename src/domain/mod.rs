//! Domain layer - Core business logic
//!
//! This layer contains:
//! - Entities: Core business objects (BotCommand, CommandEvent, Reply)
//! - Traits: Abstractions for infrastructure (Bot)
//! - URL validation for the calculator web app

pub mod entities;
pub mod traits;
pub mod webapp_url;
