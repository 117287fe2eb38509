//! Infrastructure layer - External concerns
//!
//! This layer contains:
//! - Config: Configuration loading and validation
//! - Adapters: Platform integrations (Telegram, console)

pub mod config;
pub mod adapters;
