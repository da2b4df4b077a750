//! The visual transcript of a chat session.
//!
//! A [`Transcript`] is an ordered, append-only list of [`Message`]s plus the
//! welcome block a fresh session opens with.  Messages are never edited or
//! removed one at a time; a session reset clears everything and brings the
//! welcome block back.

use std::fmt;

/// Who a transcript entry belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sender {
    /// Typed by the person using the client.
    User,
    /// Produced by the backend, or by the client speaking on its behalf.
    Bot,
}

impl fmt::Display for Sender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sender::User => f.write_str("user"),
            Sender::Bot => f.write_str("bot"),
        }
    }
}

/// One display-only transcript entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    /// The text shown to the user.
    pub text: String,
    /// Which side of the conversation produced the entry.
    pub sender: Sender,
    /// Whether the entry should be highlighted as a crisis reply.
    pub is_crisis: bool,
}

impl Message {
    /// A message typed by the user.
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            sender: Sender::User,
            is_crisis: false,
        }
    }

    /// A bot-role message, optionally marked as a crisis reply.
    pub fn bot(text: impl Into<String>, is_crisis: bool) -> Self {
        Self {
            text: text.into(),
            sender: Sender::Bot,
            is_crisis,
        }
    }
}

/// A canned suggestion offered by the welcome block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuickReply {
    /// Short label shown to the user.
    pub label: &'static str,
    /// The text actually submitted when the suggestion is picked.
    pub query: &'static str,
}

/// Content shown before the first message of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Welcome {
    /// Heading line.
    pub title: &'static str,
    /// One-paragraph introduction.
    pub blurb: &'static str,
    /// Suggestions the user can pick instead of typing.
    pub quick_replies: &'static [QuickReply],
}

/// The welcome block every session starts with.
pub const WELCOME: Welcome = Welcome {
    title: "Welcome to CHHARO Support Chat",
    blurb: "I'm here to listen and support you. Feel free to share what's on your mind.",
    quick_replies: &[
        QuickReply {
            label: "Need to talk",
            query: "I need someone to talk to",
        },
        QuickReply {
            label: "Feeling anxious",
            query: "I feel anxious",
        },
        QuickReply {
            label: "Resources",
            query: "Tell me about mental health resources",
        },
    ],
};

/// Ordered, append-only list of messages.
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    messages: Vec<Message>,
    welcome_dismissed: bool,
}

impl Transcript {
    /// An empty transcript showing the welcome block.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message.
    ///
    /// Returns true when this append dismissed the welcome block, i.e. it was
    /// the first message of the session.
    pub fn push(&mut self, message: Message) -> bool {
        self.messages.push(message);
        let dismissed = !self.welcome_dismissed;
        self.welcome_dismissed = true;
        dismissed
    }

    /// Drop every message and bring the welcome block back.
    pub fn clear(&mut self) {
        self.messages.clear();
        self.welcome_dismissed = false;
    }

    /// All messages in the order they were appended.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Number of messages.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// True if no message has been appended since the last clear.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// True while the welcome block is still on screen.
    pub fn welcome_visible(&self) -> bool {
        !self.welcome_dismissed
    }
}
