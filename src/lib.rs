// Public modules
pub mod chat;
pub mod client;
pub mod error;
pub mod observability;
pub mod render;
pub mod transcript;
pub mod types;

// Re-exports
pub use client::{Backend, ChatBackend};
pub use error::{Error, Result};
pub use observability::register_biometrics;
pub use transcript::{Message, QuickReply, Sender, Transcript, WELCOME, Welcome};
pub use types::*;
