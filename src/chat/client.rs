//! The chat client: one user turn at a time against the support backend.
//!
//! [`ChatClient`] owns the session identifier, the transcript, and the
//! in-flight flag.  All display goes through a [`Renderer`], and all network
//! traffic through a [`ChatBackend`], so the turn logic runs the same under
//! a terminal, a test harness, or any other surface.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use crate::client::ChatBackend;
use crate::error::{Error, Result};
use crate::observability::{
    CHAT_CRISIS_REPLIES, CHAT_FAILURES, CHAT_HEALTH_FAILURES, CHAT_SESSION_RESETS, CHAT_SUBMITS,
    CHAT_SUBMITS_DROPPED,
};
use crate::render::Renderer;
use crate::transcript::{Message, Transcript, WELCOME};
use crate::types::{ChatRequest, SessionId};

/// Bot-role message shown for every failed turn, whatever the cause.
pub const SEND_ERROR_MESSAGE: &str = "Sorry, I encountered an error. Please try again later.";

/// Bot-role message shown when the startup health probe fails.
pub const HEALTH_WARNING_MESSAGE: &str =
    "Cannot connect to backend. Please check if the backend URL is correct.";

/// Pause between receiving a reply and showing it, so the typing indicator is visible.
pub const DEFAULT_REPLY_DELAY: Duration = Duration::from_millis(500);

/// What became of one call to [`ChatClient::submit`].
#[derive(Debug, Clone)]
pub enum SubmitOutcome {
    /// The input was empty after trimming; nothing happened.
    Empty,
    /// Another turn was still in flight; the input was dropped, not queued.
    Busy,
    /// The backend answered and the reply was appended.
    Replied {
        /// Whether the reply was flagged as a crisis reply.
        crisis: bool,
    },
    /// The turn failed; the generic error message was appended.
    Failed(Error),
}

impl SubmitOutcome {
    /// True if the input was turned into a request.
    pub fn was_sent(&self) -> bool {
        matches!(self, SubmitOutcome::Replied { .. } | SubmitOutcome::Failed(_))
    }
}

/// Snapshot of a chat client's state.
#[derive(Debug, Clone)]
pub struct SessionStats {
    /// The current session identifier.
    pub session_id: SessionId,
    /// Number of transcript entries in the current session.
    pub message_count: usize,
    /// Whether the welcome block is still showing.
    pub welcome_visible: bool,
    /// Whether the crisis banner is showing.
    pub crisis_active: bool,
    /// Whether a turn is in flight.
    pub sending: bool,
    /// Turns sent since the client was created.
    pub total_requests: u64,
    /// Turns that ended in the generic error message.
    pub total_failures: u64,
    /// Submissions dropped because a turn was in flight.
    pub total_dropped: u64,
}

struct ClientState {
    session_id: SessionId,
    transcript: Transcript,
    crisis_active: bool,
    total_requests: u64,
    total_failures: u64,
    total_dropped: u64,
}

/// A single-session chat client.
///
/// Methods take `&self`; concurrent calls are serialized by the in-flight
/// flag, which admits exactly one outstanding turn.
pub struct ChatClient<B: ChatBackend, R: Renderer> {
    backend: B,
    renderer: Mutex<R>,
    state: Mutex<ClientState>,
    in_flight: AtomicBool,
    reply_delay: Duration,
}

impl<B: ChatBackend, R: Renderer> ChatClient<B, R> {
    /// Creates a client with a freshly generated session identifier.
    pub fn new(backend: B, renderer: R) -> Self {
        Self {
            backend,
            renderer: Mutex::new(renderer),
            state: Mutex::new(ClientState {
                session_id: SessionId::generate(),
                transcript: Transcript::new(),
                crisis_active: false,
                total_requests: 0,
                total_failures: 0,
                total_dropped: 0,
            }),
            in_flight: AtomicBool::new(false),
            reply_delay: DEFAULT_REPLY_DELAY,
        }
    }

    /// Sets the pause before a reply is shown.  Zero disables it.
    pub fn with_reply_delay(mut self, delay: Duration) -> Self {
        self.reply_delay = delay;
        self
    }

    /// Draws the initial surface: welcome block and a focused input.
    pub fn start(&self) {
        let mut renderer = self.renderer();
        renderer.show_welcome(&WELCOME);
        renderer.set_input_enabled(true);
        renderer.focus_input();
    }

    /// Submit one user turn.
    ///
    /// Empty input and input arriving while another turn is in flight are
    /// ignored.  Otherwise the user message is appended, the backend is asked
    /// for a reply, and the reply (or the generic error message) is appended.
    /// Either way the client is idle again when this returns, and the same
    /// holds if the returned future is dropped early.
    pub async fn submit(&self, text: &str) -> SubmitOutcome {
        let query = text.trim();
        if query.is_empty() {
            return SubmitOutcome::Empty;
        }
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            CHAT_SUBMITS_DROPPED.click();
            self.state().total_dropped += 1;
            tracing::debug!("turn already in flight; dropping submission");
            return SubmitOutcome::Busy;
        }
        let _guard = InFlightGuard { client: self };
        CHAT_SUBMITS.click();

        self.append(Message::user(query));
        {
            let mut renderer = self.renderer();
            renderer.clear_input();
            renderer.set_input_enabled(false);
            renderer.set_typing(true);
        }
        let request = {
            let mut state = self.state();
            state.total_requests += 1;
            ChatRequest::new(state.session_id.clone(), query)
        };

        match self.backend.chat(&request).await {
            Ok(reply) => {
                self.set_crisis(reply.crisis);
                if !self.reply_delay.is_zero() {
                    tokio::time::sleep(self.reply_delay).await;
                }
                self.renderer().set_typing(false);
                if reply.crisis {
                    CHAT_CRISIS_REPLIES.click();
                }
                self.append(Message::bot(reply.response, reply.crisis));
                SubmitOutcome::Replied {
                    crisis: reply.crisis,
                }
            }
            Err(err) => {
                CHAT_FAILURES.click();
                tracing::error!(
                    session_id = %request.session_id,
                    kind = err.kind(),
                    error = %err,
                    "chat request failed"
                );
                self.state().total_failures += 1;
                self.renderer().set_typing(false);
                self.append(Message::bot(SEND_ERROR_MESSAGE, false));
                SubmitOutcome::Failed(err)
            }
        }
    }

    /// Submit one of the welcome block's suggestions, by zero-based index.
    pub async fn submit_quick_reply(&self, index: usize) -> Result<SubmitOutcome> {
        let reply = WELCOME.quick_replies.get(index).ok_or_else(|| {
            Error::validation(
                format!(
                    "quick reply {} does not exist (choose 1-{})",
                    index + 1,
                    WELCOME.quick_replies.len()
                ),
                Some("quick_reply".to_string()),
            )
        })?;
        Ok(self.submit(reply.query).await)
    }

    /// Start over: welcome block, no banner, empty input, new session id.
    ///
    /// Does not talk to the backend.
    pub fn reset_session(&self) -> SessionId {
        CHAT_SESSION_RESETS.click();
        let session_id = {
            let mut state = self.state();
            state.transcript.clear();
            state.crisis_active = false;
            state.session_id = SessionId::generate();
            state.session_id.clone()
        };
        {
            let mut renderer = self.renderer();
            renderer.clear_transcript();
            renderer.show_welcome(&WELCOME);
            renderer.set_crisis_banner(false);
            renderer.clear_input();
        }
        tracing::info!(%session_id, "new chat started");
        session_id
    }

    /// Probe the backend once.
    ///
    /// Purely advisory: a failure appends a warning to the transcript and
    /// nothing else.  Returns whether the backend answered.
    pub async fn check_health(&self) -> bool {
        match self.backend.health().await {
            Ok(body) => {
                tracing::info!(%body, "backend connected");
                true
            }
            Err(err) => {
                CHAT_HEALTH_FAILURES.click();
                tracing::warn!(kind = err.kind(), error = %err, "backend connection failed");
                self.append(Message::bot(HEALTH_WARNING_MESSAGE, false));
                false
            }
        }
    }

    /// Print an informational line through the renderer.
    pub fn print_info(&self, info: &str) {
        self.renderer().print_info(info);
    }

    /// Print an error line through the renderer.
    pub fn print_error(&self, error: &str) {
        self.renderer().print_error(error);
    }

    /// The current session identifier.
    pub fn session_id(&self) -> SessionId {
        self.state().session_id.clone()
    }

    /// A copy of the current transcript entries.
    pub fn messages(&self) -> Vec<Message> {
        self.state().transcript.messages().to_vec()
    }

    /// Whether the crisis banner is showing.
    pub fn crisis_active(&self) -> bool {
        self.state().crisis_active
    }

    /// Whether a turn is in flight.
    pub fn is_sending(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Returns the current session statistics snapshot.
    pub fn stats(&self) -> SessionStats {
        let sending = self.is_sending();
        let state = self.state();
        SessionStats {
            session_id: state.session_id.clone(),
            message_count: state.transcript.len(),
            welcome_visible: state.transcript.welcome_visible(),
            crisis_active: state.crisis_active,
            sending,
            total_requests: state.total_requests,
            total_failures: state.total_failures,
            total_dropped: state.total_dropped,
        }
    }

    fn append(&self, message: Message) {
        let dismissed = self.state().transcript.push(message.clone());
        let mut renderer = self.renderer();
        if dismissed {
            renderer.hide_welcome();
        }
        renderer.append_message(&message);
    }

    fn set_crisis(&self, crisis: bool) {
        self.state().crisis_active = crisis;
        self.renderer().set_crisis_banner(crisis);
    }

    fn state(&self) -> MutexGuard<'_, ClientState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn renderer(&self) -> MutexGuard<'_, R> {
        self.renderer.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Returns the client to idle when a turn ends, however it ends.
struct InFlightGuard<'a, B: ChatBackend, R: Renderer> {
    client: &'a ChatClient<B, R>,
}

impl<B: ChatBackend, R: Renderer> Drop for InFlightGuard<'_, B, R> {
    fn drop(&mut self) {
        {
            let mut renderer = self.client.renderer();
            renderer.set_typing(false);
            renderer.set_input_enabled(true);
            renderer.focus_input();
        }
        self.client.in_flight.store(false, Ordering::Release);
    }
}
