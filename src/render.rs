//! Output rendering for the chat client.
//!
//! The [`Renderer`] trait is the display surface the chat client drives:
//! transcript entries, the welcome block, the crisis banner, the typing
//! indicator and the input affordances.  [`PlainTextRenderer`] draws all of
//! that on a terminal with optional ANSI styling.

use std::io::{self, Stdout, Write};

use crate::transcript::{Message, Sender, Welcome};

/// ANSI escape code for dim text (used for the typing indicator).
const ANSI_DIM: &str = "\x1b[2m";

/// ANSI escape code for bold text.
const ANSI_BOLD: &str = "\x1b[1m";

/// ANSI escape code to reset all styling.
const ANSI_RESET: &str = "\x1b[0m";

/// ANSI escape code for cyan text (used for the user's own turns).
const ANSI_CYAN: &str = "\x1b[36m";

/// ANSI escape code for green text (used for bot turns).
const ANSI_GREEN: &str = "\x1b[32m";

/// ANSI escape code for red text (used for crisis replies and the banner).
const ANSI_RED: &str = "\x1b[31m";

/// Return to column zero and erase the line.
const ANSI_CLEAR_LINE: &str = "\r\x1b[2K";

/// Text of the crisis banner.
pub const CRISIS_BANNER: &str = "If you are in immediate danger or thinking about harming yourself, \
please contact your local emergency number or a crisis helpline right now.";

/// Trait for rendering the chat surface.
///
/// Implementations decide how each element looks; the chat client only
/// decides when each one changes.
pub trait Renderer: Send {
    /// Append one transcript entry.
    fn append_message(&mut self, message: &Message);

    /// Show the welcome block and its quick-reply suggestions.
    fn show_welcome(&mut self, welcome: &Welcome);

    /// Remove the welcome block after the first message of a session.
    fn hide_welcome(&mut self);

    /// Remove every transcript entry from view.
    fn clear_transcript(&mut self);

    /// Show or hide the crisis banner.
    fn set_crisis_banner(&mut self, visible: bool);

    /// Show or hide the "typing" indicator.
    fn set_typing(&mut self, active: bool);

    /// Enable or disable the send affordance.
    fn set_input_enabled(&mut self, enabled: bool);

    /// Empty the input field.
    fn clear_input(&mut self);

    /// Move focus back to the input field.
    fn focus_input(&mut self);

    /// Print an informational message outside the transcript.
    fn print_info(&mut self, info: &str);

    /// Print an error message outside the transcript.
    fn print_error(&mut self, error: &str);
}

/// Plain text renderer with optional ANSI styling.
///
/// The terminal line editor owns the input field, so the input affordances
/// only track state here.
pub struct PlainTextRenderer {
    stdout: Stdout,
    use_color: bool,
    banner_visible: bool,
    typing: bool,
}

impl PlainTextRenderer {
    /// Creates a new PlainTextRenderer with ANSI colors enabled.
    pub fn new() -> Self {
        Self::with_color(true)
    }

    /// Creates a new PlainTextRenderer with specified color setting.
    pub fn with_color(use_color: bool) -> Self {
        Self {
            stdout: io::stdout(),
            use_color,
            banner_visible: false,
            typing: false,
        }
    }

    /// Flushes stdout to ensure immediate display.
    fn flush(&mut self) {
        let _ = self.stdout.flush();
    }

    fn erase_typing(&mut self) {
        if self.typing {
            if self.use_color {
                print!("{ANSI_CLEAR_LINE}");
            } else {
                println!();
            }
            self.typing = false;
        }
    }
}

impl Default for PlainTextRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer for PlainTextRenderer {
    fn append_message(&mut self, message: &Message) {
        self.erase_typing();
        let label = match message.sender {
            Sender::User => "You",
            Sender::Bot => "Bot",
        };
        if self.use_color {
            let color = match (message.sender, message.is_crisis) {
                (Sender::User, _) => ANSI_CYAN,
                (Sender::Bot, false) => ANSI_GREEN,
                (Sender::Bot, true) => ANSI_RED,
            };
            println!("{color}{ANSI_BOLD}{label}:{ANSI_RESET} {}", message.text);
        } else if message.is_crisis {
            println!("{label} [crisis]: {}", message.text);
        } else {
            println!("{label}: {}", message.text);
        }
        self.flush();
    }

    fn show_welcome(&mut self, welcome: &Welcome) {
        self.erase_typing();
        if self.use_color {
            println!("{ANSI_BOLD}{}{ANSI_RESET}", welcome.title);
        } else {
            println!("{}", welcome.title);
        }
        println!("{}", welcome.blurb);
        for (index, reply) in welcome.quick_replies.iter().enumerate() {
            println!("  /{}  {}", index + 1, reply.label);
        }
        println!();
        self.flush();
    }

    fn hide_welcome(&mut self) {}

    fn clear_transcript(&mut self) {
        self.erase_typing();
        if self.use_color {
            print!("\x1b[2J\x1b[H");
        } else {
            println!("\n----- new chat -----\n");
        }
        self.banner_visible = false;
        self.flush();
    }

    fn set_crisis_banner(&mut self, visible: bool) {
        if visible && !self.banner_visible {
            self.erase_typing();
            if self.use_color {
                println!("{ANSI_RED}{ANSI_BOLD}!! {CRISIS_BANNER}{ANSI_RESET}");
            } else {
                println!("!! {CRISIS_BANNER}");
            }
            self.flush();
        }
        self.banner_visible = visible;
    }

    fn set_typing(&mut self, active: bool) {
        if active && !self.typing {
            if self.use_color {
                print!("{ANSI_DIM}Bot is typing...{ANSI_RESET}");
            } else {
                print!("Bot is typing...");
            }
            self.typing = true;
            self.flush();
        } else if !active {
            self.erase_typing();
            self.flush();
        }
    }

    // The REPL only reads a line once the previous turn has finished.
    fn set_input_enabled(&mut self, _: bool) {}

    fn clear_input(&mut self) {}

    fn focus_input(&mut self) {}

    fn print_info(&mut self, info: &str) {
        self.erase_typing();
        println!("{info}");
        self.flush();
    }

    fn print_error(&mut self, error: &str) {
        self.erase_typing();
        eprintln!("Error: {error}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renderer_default_has_color() {
        let renderer = PlainTextRenderer::new();
        assert!(renderer.use_color);
        assert!(!renderer.banner_visible);
        assert!(!renderer.typing);
    }

    #[test]
    fn renderer_without_color() {
        let renderer = PlainTextRenderer::with_color(false);
        assert!(!renderer.use_color);
    }

    #[test]
    fn banner_tracks_visibility() {
        let mut renderer = PlainTextRenderer::with_color(false);
        renderer.set_crisis_banner(true);
        assert!(renderer.banner_visible);
        renderer.clear_transcript();
        assert!(!renderer.banner_visible);
    }

    #[test]
    fn typing_is_erased_by_next_message() {
        let mut renderer = PlainTextRenderer::with_color(false);
        renderer.set_typing(true);
        assert!(renderer.typing);
        renderer.append_message(&Message::bot("hello", false));
        assert!(!renderer.typing);
    }
}
