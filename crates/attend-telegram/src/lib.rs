//! Telegram Bot API channel: long-polling for incoming messages and
//! `sendMessage` for outgoing ones.

mod bot;
pub mod error;
pub mod types;

pub use bot::{TelegramBot, TelegramConfig};
pub use error::{Error, Result};
