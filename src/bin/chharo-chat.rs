//! Interactive support chat in the terminal.
//!
//! This binary provides a REPL over the chharo support backend: each line
//! you type is one turn, replies are printed as they arrive, and crisis
//! replies raise a banner.
//!
//! # Usage
//!
//! ```bash
//! # Talk to the hosted backend
//! chharo-chat
//!
//! # Talk to a local backend without the typing delay
//! chharo-chat --backend-url http://localhost:8000 --reply-delay-ms 0
//!
//! # Disable colors (useful for piping output)
//! chharo-chat --no-color
//! ```
//!
//! # Commands
//!
//! While chatting, you can use slash commands:
//! - `/1`, `/2`, `/3` - Send one of the suggested messages
//! - `/new` - Start a new chat
//! - `/health` - Check the backend connection
//! - `/stats` - Show session statistics
//! - `/quit` - Exit the application
//!
//! Start a line with `//` to send text that begins with `/`.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use arrrg::CommandLine;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

use chharo::chat::{
    ChatArgs, ChatClient, ChatCommand, ChatConfig, PlainTextRenderer, Renderer, SessionStats,
    help_text, parse_command,
};
use chharo::{Backend, ChatBackend};

/// Main entry point for the chharo-chat application.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let (args, _) = ChatArgs::from_command_line_relaxed("chharo-chat [OPTIONS]");
    let config = ChatConfig::from(args);
    init_tracing(config.verbose);

    let backend = Backend::with_options(config.backend_url.clone(), Some(config.timeout))?;
    tracing::info!(backend = %backend.base_url(), "starting chat");
    let renderer = PlainTextRenderer::with_color(config.use_color);
    let client = Arc::new(ChatClient::new(backend, renderer).with_reply_delay(config.reply_delay));
    let mut rl = DefaultEditor::new()?;

    // Flag for abandoning a turn that is taking too long
    let interrupted = Arc::new(AtomicBool::new(false));

    let interrupted_clone = interrupted.clone();
    ctrlc::set_handler(move || {
        interrupted_clone.store(true, Ordering::Relaxed);
    })?;

    client.start();
    println!("Type /help for commands, /quit to exit\n");
    if config.health_check {
        // Runs alongside the prompt; a warning lands in the transcript if it fails.
        let client = Arc::clone(&client);
        tokio::spawn(async move {
            client.check_health().await;
        });
    }

    loop {
        interrupted.store(false, Ordering::Relaxed);

        let readline = rl.readline("> ");

        match readline {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }

                let _ = rl.add_history_entry(line);

                if let Some(cmd) = parse_command(line) {
                    match cmd {
                        ChatCommand::Quit => {
                            println!("Take care. Goodbye!");
                            break;
                        }
                        ChatCommand::NewChat => {
                            client.reset_session();
                        }
                        ChatCommand::Health => {
                            if client.check_health().await {
                                client.print_info("Backend is reachable.");
                            }
                        }
                        ChatCommand::QuickReply(index) => {
                            let turn = client.submit_quick_reply(index);
                            if let Some(Err(err)) =
                                run_turn(&*client, interrupted.clone(), turn).await
                            {
                                client.print_error(&err.to_string());
                            }
                        }
                        ChatCommand::Stats => {
                            print_stats(&client.stats());
                        }
                        ChatCommand::Help => {
                            for line in help_text().lines() {
                                println!("    {}", line);
                            }
                        }
                        ChatCommand::Say(text) => {
                            run_turn(&*client, interrupted.clone(), client.submit(&text)).await;
                        }
                        ChatCommand::Invalid(message) => {
                            client.print_error(&message);
                        }
                    }
                    continue;
                }

                run_turn(&*client, interrupted.clone(), client.submit(line)).await;
            }
            Err(ReadlineError::Interrupted) => {
                // Ctrl+C at prompt - soft interrupt
                println!();
                continue;
            }
            Err(ReadlineError::Eof) => {
                // Ctrl+D - exit
                println!("\nTake care. Goodbye!");
                break;
            }
            Err(err) => {
                client.print_error(&format!("Input error: {}", err));
                break;
            }
        }
    }

    Ok(())
}

/// Drive one turn, abandoning it if Ctrl+C is pressed while it is pending.
async fn run_turn<B, R, F, T>(
    client: &ChatClient<B, R>,
    interrupted: Arc<AtomicBool>,
    turn: F,
) -> Option<T>
where
    B: ChatBackend,
    R: Renderer,
    F: std::future::Future<Output = T>,
{
    tokio::select! {
        result = turn => Some(result),
        _ = wait_for_interrupt(interrupted) => {
            client.print_info("[interrupted]");
            None
        }
    }
}

async fn wait_for_interrupt(interrupted: Arc<AtomicBool>) {
    while !interrupted.load(Ordering::Relaxed) {
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
}

fn print_stats(stats: &SessionStats) {
    println!("    Session Statistics:");
    println!("      Session: {}", stats.session_id);
    println!("      Messages: {}", stats.message_count);
    println!(
        "      Crisis banner: {}",
        if stats.crisis_active {
            "shown"
        } else {
            "hidden"
        }
    );
    println!(
        "      Requests: {} ({} failed, {} dropped)",
        stats.total_requests, stats.total_failures, stats.total_dropped
    );
}

fn init_tracing(verbose: bool) {
    // Quiet unless asked; failures already show up in the transcript.
    let level = if verbose { "debug" } else { "off" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}
