//! Configuration types for the chat application.
//!
//! This module provides CLI argument parsing via `arrrg` and the resolved
//! configuration used to build a backend and a chat client.

use std::time::Duration;

use arrrg_derive::CommandLine;

use crate::chat::client::DEFAULT_REPLY_DELAY;
use crate::client::DEFAULT_TIMEOUT;

/// Command-line arguments for the chharo-chat tool.
#[derive(CommandLine, Debug, Default, PartialEq, Eq)]
pub struct ChatArgs {
    /// Base URL of the support backend.
    #[arrrg(
        optional,
        "Backend base URL (default: $CHHARO_BACKEND_URL or the hosted backend)",
        "URL"
    )]
    pub backend_url: Option<String>,

    /// Request timeout in seconds.
    #[arrrg(optional, "Request timeout in seconds (default: 60)", "SECONDS")]
    pub timeout_secs: Option<u64>,

    /// Delay before showing a reply, in milliseconds.
    #[arrrg(optional, "Typing delay before replies in ms (default: 500)", "MILLIS")]
    pub reply_delay_ms: Option<u64>,

    /// Skip the connectivity probe at startup.
    #[arrrg(flag, "Skip the startup health check")]
    pub skip_health_check: bool,

    /// Disable ANSI colors and styles.
    #[arrrg(flag, "Disable ANSI colors/styles")]
    pub no_color: bool,

    /// Log debug diagnostics to stderr.
    #[arrrg(flag, "Log debug diagnostics to stderr")]
    pub verbose: bool,
}

/// Configuration for a chat client.
///
/// This struct holds the resolved configuration values after processing
/// command-line arguments with appropriate defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatConfig {
    /// Backend base URL; `None` defers to the environment and the built-in default.
    pub backend_url: Option<String>,

    /// Bound on each request to the backend.
    pub timeout: Duration,

    /// Pause before a reply is shown.
    pub reply_delay: Duration,

    /// Whether to probe the backend at startup.
    pub health_check: bool,

    /// Whether to use ANSI colors and styles in output.
    pub use_color: bool,

    /// Whether to log debug diagnostics.
    pub verbose: bool,
}

impl ChatConfig {
    /// Creates a new ChatConfig with default values.
    ///
    /// Defaults:
    /// - Backend: from the environment, else the hosted backend
    /// - Timeout: 60 seconds
    /// - Reply delay: 500 ms
    /// - Health check: enabled
    /// - Color: enabled
    pub fn new() -> Self {
        Self {
            backend_url: None,
            timeout: DEFAULT_TIMEOUT,
            reply_delay: DEFAULT_REPLY_DELAY,
            health_check: true,
            use_color: true,
            verbose: false,
        }
    }

    /// Sets the backend base URL.
    pub fn with_backend_url(mut self, url: impl Into<String>) -> Self {
        self.backend_url = Some(url.into());
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the reply delay.
    pub fn with_reply_delay(mut self, delay: Duration) -> Self {
        self.reply_delay = delay;
        self
    }

    /// Disables the startup health check.
    pub fn without_health_check(mut self) -> Self {
        self.health_check = false;
        self
    }

    /// Disables ANSI color output.
    pub fn without_color(mut self) -> Self {
        self.use_color = false;
        self
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl From<ChatArgs> for ChatConfig {
    fn from(args: ChatArgs) -> Self {
        let defaults = ChatConfig::new();
        ChatConfig {
            backend_url: args.backend_url,
            timeout: args
                .timeout_secs
                .map(Duration::from_secs)
                .unwrap_or(defaults.timeout),
            reply_delay: args
                .reply_delay_ms
                .map(Duration::from_millis)
                .unwrap_or(defaults.reply_delay),
            health_check: !args.skip_health_check,
            use_color: !args.no_color,
            verbose: args.verbose,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = ChatConfig::new();
        assert!(config.backend_url.is_none());
        assert_eq!(config.timeout, Duration::from_secs(60));
        assert_eq!(config.reply_delay, Duration::from_millis(500));
        assert!(config.health_check);
        assert!(config.use_color);
        assert!(!config.verbose);
    }

    #[test]
    fn config_from_args_defaults() {
        let config = ChatConfig::from(ChatArgs::default());
        assert_eq!(config, ChatConfig::default());
    }

    #[test]
    fn config_from_args_custom() {
        let args = ChatArgs {
            backend_url: Some("http://localhost:8000".to_string()),
            timeout_secs: Some(5),
            reply_delay_ms: Some(0),
            skip_health_check: true,
            no_color: true,
            verbose: true,
        };
        let config = ChatConfig::from(args);
        assert_eq!(config.backend_url.as_deref(), Some("http://localhost:8000"));
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert!(config.reply_delay.is_zero());
        assert!(!config.health_check);
        assert!(!config.use_color);
        assert!(config.verbose);
    }

    #[test]
    fn config_builder_pattern() {
        let config = ChatConfig::new()
            .with_backend_url("https://example.com")
            .with_timeout(Duration::from_secs(10))
            .with_reply_delay(Duration::ZERO)
            .without_health_check()
            .without_color();
        assert_eq!(config.backend_url.as_deref(), Some("https://example.com"));
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert!(config.reply_delay.is_zero());
        assert!(!config.health_check);
        assert!(!config.use_color);
    }
}
