//! Interactive support chat.
//!
//! This module provides the client that drives one conversation with the
//! support backend, plus the pieces the REPL binary needs around it:
//!
//! - [`client`]: the chat client, its in-flight guard and session reset
//! - [`config`]: CLI argument parsing and configuration
//! - [`commands`]: slash command parsing

mod client;
mod commands;
mod config;

pub use crate::render::{PlainTextRenderer, Renderer};
pub use client::{
    ChatClient, DEFAULT_REPLY_DELAY, HEALTH_WARNING_MESSAGE, SEND_ERROR_MESSAGE, SessionStats,
    SubmitOutcome,
};
pub use commands::{ChatCommand, help_text, parse_command};
pub use config::{ChatArgs, ChatConfig};
