//! Conversation history and the windowed prompt.
//!
//! [`ConversationHistory`] is an append-only, insertion-ordered log of
//! [`Message`]s for the current session. Providers never read it directly;
//! they receive the bounded [`windowed_prompt`](ConversationHistory::windowed_prompt)
//! — a fixed system instruction plus the most recent `k` entries — so the
//! outbound payload stays small no matter how long the conversation runs.
//!
//! The history itself is provider-agnostic free text: switching providers
//! mid-session keeps the transcript intact.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Role
// ---------------------------------------------------------------------------

/// Who authored a message. Serialised lowercase to match the chat wire
/// format (`"system"` / `"user"` / `"assistant"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    /// The wire-format string for this role.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

// ---------------------------------------------------------------------------
// Message
// ---------------------------------------------------------------------------

/// A single conversation entry. Immutable once appended to the history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// ConversationHistory
// ---------------------------------------------------------------------------

/// Ordered log of exchanged turns, append-only during a session.
///
/// # Example
/// ```rust
/// use language_tutor::chat::ConversationHistory;
///
/// let mut history = ConversationHistory::new();
/// history.push_user("How do I say 'dog' in Polish?");
/// history.push_assistant("'Dog' is 'pies'.");
///
/// let prompt = history.windowed_prompt("You are a language tutor.", 10);
/// assert_eq!(prompt.len(), 3); // system + both entries
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConversationHistory {
    messages: Vec<Message>,
}

impl ConversationHistory {
    pub fn new() -> Self {
        Self::default()
    }

    // -----------------------------------------------------------------------
    // Mutation
    // -----------------------------------------------------------------------

    /// Append a message to the tail of the log.
    pub fn append(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// Append a user message.
    pub fn push_user(&mut self, content: impl Into<String>) {
        self.append(Message::user(content));
    }

    /// Append an assistant message.
    pub fn push_assistant(&mut self, content: impl Into<String>) {
        self.append(Message::assistant(content));
    }

    /// Empty the log. Irreversible within the session.
    pub fn clear(&mut self) {
        self.messages.clear();
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// Build the bounded prompt: exactly one system message followed by the
    /// most recent `k` entries, in order.
    ///
    /// Pure — returns a freshly cloned sequence each call, never more than
    /// `k + 1` entries, and leaves the history untouched.
    pub fn windowed_prompt(&self, system_prompt: &str, k: usize) -> Vec<Message> {
        let tail_start = self.messages.len().saturating_sub(k);

        let mut prompt = Vec::with_capacity(self.messages.len() - tail_start + 1);
        prompt.push(Message::system(system_prompt));
        prompt.extend(self.messages[tail_start..].iter().cloned());
        prompt
    }

    /// Number of entries in the log.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Returns `true` when no messages have been exchanged.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Iterate over the entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Message> {
        self.messages.iter()
    }

    /// The most recent entry, if any.
    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
