//! Slash command parsing for the chat REPL.
//!
//! Input starting with `/` controls the client instead of being sent to the
//! backend.  A leading `//` escapes the slash.

use crate::transcript::WELCOME;

/// A parsed chat command.
///
/// These commands control the chat client and are not sent to the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatCommand {
    /// Start a new chat with a fresh session identifier.
    NewChat,

    /// Probe the backend's health endpoint.
    Health,

    /// Send one of the welcome block's suggestions (zero-based index).
    QuickReply(usize),

    /// Display session statistics.
    Stats,

    /// Display help information.
    Help,

    /// Exit the chat application.
    Quit,

    /// Send text that begins with `/` as a regular message.
    Say(String),

    /// Report a parsing error back to the caller.
    Invalid(String),
}

/// Parses user input for slash commands.
///
/// Returns `Some(ChatCommand)` if the input is a command, or `None` if it
/// should be sent as a regular message.
///
/// # Examples
///
/// ```
/// # use chharo::chat::{ChatCommand, parse_command};
/// assert_eq!(parse_command("/new"), Some(ChatCommand::NewChat));
/// assert_eq!(parse_command("/2"), Some(ChatCommand::QuickReply(1)));
/// assert!(parse_command("I feel anxious").is_none());
/// assert_eq!(parse_command("//sigh"), Some(ChatCommand::Say("/sigh".to_string())));
/// ```
pub fn parse_command(input: &str) -> Option<ChatCommand> {
    let input = input.trim();

    if !input.starts_with('/') {
        return None;
    }
    if let Some(text) = input.strip_prefix("//") {
        return Some(ChatCommand::Say(format!("/{text}")));
    }

    let mut parts = input[1..].splitn(2, ' ');
    let command = parts.next()?.to_lowercase();
    let argument = parts.next().map(|s| s.trim()).filter(|s| !s.is_empty());

    let result = match command.as_str() {
        "new" | "reset" | "clear" => ChatCommand::NewChat,
        "health" => ChatCommand::Health,
        "quick" => match argument {
            Some(arg) => parse_quick_reply(arg),
            None => ChatCommand::Invalid("/quick requires a suggestion number".to_string()),
        },
        "help" | "?" => ChatCommand::Help,
        "quit" | "exit" | "q" => ChatCommand::Quit,
        "stats" | "status" => ChatCommand::Stats,
        n if !n.is_empty() && n.chars().all(|c| c.is_ascii_digit()) => parse_quick_reply(n),
        _ => ChatCommand::Invalid(format!("Unknown command: /{}", command)),
    };

    Some(result)
}

fn parse_quick_reply(value: &str) -> ChatCommand {
    let count = WELCOME.quick_replies.len();
    match value.parse::<usize>() {
        Ok(n) if (1..=count).contains(&n) => ChatCommand::QuickReply(n - 1),
        _ => ChatCommand::Invalid(format!("quick replies are numbered 1-{count}")),
    }
}

/// Returns help text describing available commands.
pub fn help_text() -> &'static str {
    r#"Available commands:
  /1, /2, /3             Send one of the suggested messages
  /quick <n>             Same as /<n>
  /new                   Start a new chat (clears the conversation)
  /health                Check the connection to the backend
  /stats                 Show session statistics
  /help                  Show this help message
  /quit                  Exit the chat
  //text                 Send "/text" as a message"#
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_quit_commands() {
        assert_eq!(parse_command("/quit"), Some(ChatCommand::Quit));
        assert_eq!(parse_command("/exit"), Some(ChatCommand::Quit));
        assert_eq!(parse_command("/q"), Some(ChatCommand::Quit));
        assert_eq!(parse_command("  /quit  "), Some(ChatCommand::Quit));
    }

    #[test]
    fn parse_new_chat() {
        assert_eq!(parse_command("/new"), Some(ChatCommand::NewChat));
        assert_eq!(parse_command("/RESET"), Some(ChatCommand::NewChat));
        assert_eq!(parse_command("/clear"), Some(ChatCommand::NewChat));
    }

    #[test]
    fn parse_quick_replies() {
        assert_eq!(parse_command("/1"), Some(ChatCommand::QuickReply(0)));
        assert_eq!(parse_command("/3"), Some(ChatCommand::QuickReply(2)));
        assert_eq!(parse_command("/quick 2"), Some(ChatCommand::QuickReply(1)));
        assert!(matches!(
            parse_command("/4"),
            Some(ChatCommand::Invalid(msg)) if msg.contains("1-3")
        ));
        assert!(matches!(
            parse_command("/0"),
            Some(ChatCommand::Invalid(_))
        ));
        assert!(matches!(
            parse_command("/quick"),
            Some(ChatCommand::Invalid(msg)) if msg.contains("requires")
        ));
        assert!(matches!(
            parse_command("/quick two"),
            Some(ChatCommand::Invalid(_))
        ));
    }

    #[test]
    fn parse_health_and_stats() {
        assert_eq!(parse_command("/health"), Some(ChatCommand::Health));
        assert_eq!(parse_command("/stats"), Some(ChatCommand::Stats));
        assert_eq!(parse_command("/status"), Some(ChatCommand::Stats));
        assert_eq!(parse_command("/?"), Some(ChatCommand::Help));
    }

    #[test]
    fn unknown_commands() {
        assert_eq!(
            parse_command("/model x"),
            Some(ChatCommand::Invalid("Unknown command: /model".to_string()))
        );
        assert_eq!(
            parse_command("/"),
            Some(ChatCommand::Invalid("Unknown command: /".to_string()))
        );
    }

    #[test]
    fn double_slash_sends_text() {
        assert_eq!(
            parse_command("//sigh"),
            Some(ChatCommand::Say("/sigh".to_string()))
        );
        assert_eq!(
            parse_command("  //new chat please "),
            Some(ChatCommand::Say("/new chat please".to_string()))
        );
        assert_eq!(parse_command("//"), Some(ChatCommand::Say("/".to_string())));
    }

    #[test]
    fn non_commands() {
        assert_eq!(parse_command("I need someone to talk to"), None);
        assert_eq!(parse_command(""), None);
        assert_eq!(parse_command("  "), None);
    }

    #[test]
    fn help_text_not_empty() {
        let help = help_text();
        assert!(help.contains("/quit"));
        assert!(help.contains("/new"));
        assert!(help.contains("/health"));
        assert!(help.contains("//text"));
    }
}
