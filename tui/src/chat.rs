//! Chat State
//!
//! Owns the conversation transcript and the turn lifecycle. A turn is
//! one question/answer exchange with the gateway: submitting a question
//! moves the chat from `Idle` to `Waiting`, and exactly one
//! [`TurnOutcome`] moves it back to `Idle`.
//!
//! All state transitions live here so they can be tested without a
//! terminal or a network.

use gateway_core::Citation;
use uuid::Uuid;

/// Fixed transcript text shown when a turn fails for any reason.
///
/// The real failure is logged; the transcript never surfaces transport
/// or status details to the reader.
pub const TURN_FAILED_TEXT: &str =
    "An error occurred while processing your question. Please try again.";

/// Maximum number of characters of citation content shown in the
/// expanded source view before truncation.
pub const PREVIEW_CHARS: usize = 150;

// ===== Identifiers =====

/// Unique identifier for a transcript message.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MessageId(String);

impl MessageId {
    /// Generates a fresh random identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// The identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for MessageId {
    fn default() -> Self {
        Self::new()
    }
}

// ===== Messages =====

/// Who authored a transcript message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// The person asking questions.
    User,
    /// The Counsel assistant answering them.
    Assistant,
}

impl Role {
    /// Transcript prefix for this role.
    #[must_use]
    pub fn prefix(&self) -> &'static str {
        match self {
            Role::User => "You: ",
            Role::Assistant => "Counsel: ",
        }
    }
}

/// One message in the transcript.
#[derive(Debug, Clone)]
pub struct ChatMessage {
    /// Stable identity, independent of position in the transcript.
    pub id: MessageId,
    /// Who wrote it.
    pub role: Role,
    /// The message text, exactly as submitted or received.
    pub content: String,
    /// Citations backing an assistant answer. Always empty for user
    /// messages and failed turns.
    pub sources: Vec<Citation>,
    /// Whether the source disclosure is open. Collapsed on arrival.
    pub sources_expanded: bool,
}

impl ChatMessage {
    /// A user question, stored verbatim.
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            id: MessageId::new(),
            role: Role::User,
            content: content.into(),
            sources: Vec::new(),
            sources_expanded: false,
        }
    }

    /// An assistant answer with its citations.
    #[must_use]
    pub fn assistant(content: impl Into<String>, sources: Vec<Citation>) -> Self {
        Self {
            id: MessageId::new(),
            role: Role::Assistant,
            content: content.into(),
            sources,
            sources_expanded: false,
        }
    }
}

// ===== Turn lifecycle =====

/// Whether a question is currently in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TurnState {
    /// Ready to accept a question.
    #[default]
    Idle,
    /// A question has been sent and no outcome has arrived yet.
    Waiting,
}

/// Terminal result of an in-flight turn.
///
/// Every spawned ask resolves to exactly one of these, whatever went
/// wrong on the way.
#[derive(Debug, Clone)]
pub enum TurnOutcome {
    /// The gateway answered.
    Answered {
        /// Answer text for the transcript.
        answer: String,
        /// Citations backing the answer, possibly empty.
        sources: Vec<Citation>,
    },
    /// The ask failed. The transcript gets [`TURN_FAILED_TEXT`].
    Failed,
}

// ===== Chat state =====

/// The full conversational state: transcript, input line, and turn.
#[derive(Debug, Default)]
pub struct ChatState {
    messages: Vec<ChatMessage>,
    input: String,
    turn: TurnState,
}

impl ChatState {
    /// An empty chat, ready for a first question.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The transcript, oldest first.
    #[must_use]
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// The current input line.
    #[must_use]
    pub fn input(&self) -> &str {
        &self.input
    }

    /// True while a question is in flight.
    #[must_use]
    pub fn is_waiting(&self) -> bool {
        self.turn == TurnState::Waiting
    }

    /// Appends a character to the input line. Ignored while waiting.
    pub fn push_input(&mut self, c: char) {
        if self.turn == TurnState::Idle {
            self.input.push(c);
        }
    }

    /// Removes the last character of the input line. Ignored while
    /// waiting.
    pub fn backspace_input(&mut self) {
        if self.turn == TurnState::Idle {
            self.input.pop();
        }
    }

    /// Submits the current input as a question.
    ///
    /// Returns the question text to send, or `None` when the submit is
    /// rejected. A submit is rejected while a turn is already in flight
    /// and when the input is empty after trimming. On success the raw,
    /// untrimmed input becomes a user message, the input line clears,
    /// and the chat enters `Waiting`.
    pub fn submit(&mut self) -> Option<String> {
        if self.turn == TurnState::Waiting {
            return None;
        }
        if self.input.trim().is_empty() {
            return None;
        }

        let question = std::mem::take(&mut self.input);
        self.messages.push(ChatMessage::user(question.clone()));
        self.turn = TurnState::Waiting;
        Some(question)
    }

    /// Folds a turn outcome into the transcript.
    ///
    /// Appends the assistant message for the outcome and returns the
    /// chat to `Idle`. This is the only transition out of `Waiting`.
    pub fn apply_outcome(&mut self, outcome: TurnOutcome) {
        let message = match outcome {
            TurnOutcome::Answered { answer, sources } => {
                ChatMessage::assistant(answer, sources)
            }
            TurnOutcome::Failed => ChatMessage::assistant(TURN_FAILED_TEXT, Vec::new()),
        };
        self.messages.push(message);
        self.turn = TurnState::Idle;
    }

    /// Toggles the source disclosure on the most recent message that
    /// has sources. Returns true if a message was toggled.
    pub fn toggle_latest_sources(&mut self) -> bool {
        if let Some(message) = self
            .messages
            .iter_mut()
            .rev()
            .find(|m| !m.sources.is_empty())
        {
            message.sources_expanded = !message.sources_expanded;
            true
        } else {
            false
        }
    }
}

/// Truncates citation content for the disclosure view.
///
/// Keeps the first [`PREVIEW_CHARS`] characters and appends `"..."`
/// when anything was cut. Counts characters, not bytes, so multi-byte
/// text is never split mid-character.
#[must_use]
pub fn preview(content: &str) -> String {
    let mut truncated: String = content.chars().take(PREVIEW_CHARS).collect();
    if content.chars().count() > PREVIEW_CHARS {
        truncated.push_str("...");
    }
    truncated
}

// ===== Tests =====
