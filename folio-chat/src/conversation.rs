//! Per-session conversation state.
//!
//! A conversation is either idle or holds exactly one question in flight.
//! `submit` moves idle → pending; the engine's `resolve` moves pending →
//! idle by appending the assistant turn. There is no queueing.

/// Who produced a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

/// One entry in the conversation log.
#[derive(Debug, Clone, PartialEq)]
pub struct Turn {
    pub role: Role,
    pub content: String,
}

/// Outcome of submitting a question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Submission {
    /// The question was appended and is now in flight.
    Accepted,
    /// The trimmed question was empty; nothing changed.
    RejectedEmpty,
    /// A question is already in flight; nothing changed.
    RejectedPending,
}

/// Ordered log of user and assistant turns plus the in-flight question.
#[derive(Debug, Default)]
pub struct Conversation {
    turns: Vec<Turn>,
    pending: Option<String>,
}

impl Conversation {
    /// Create an empty conversation with no question in flight.
    pub fn new() -> Self {
        Self::default()
    }

    /// Submit a question.
    ///
    /// The question is trimmed first. Blank submissions and submissions made
    /// while another question is in flight are rejected without touching the
    /// log.
    pub fn submit(&mut self, question: &str) -> Submission {
        let question = question.trim();
        if question.is_empty() {
            return Submission::RejectedEmpty;
        }
        if self.pending.is_some() {
            return Submission::RejectedPending;
        }
        self.turns.push(Turn { role: Role::User, content: question.to_string() });
        self.pending = Some(question.to_string());
        Submission::Accepted
    }

    /// Whether a question is waiting to be resolved.
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// The turns recorded so far, oldest first.
    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    /// Render the log as plain text, one `USER:`/`AI:` prefixed line per turn.
    pub fn transcript(&self) -> String {
        self.turns
            .iter()
            .map(|turn| match turn.role {
                Role::User => format!("USER: {}", turn.content),
                Role::Assistant => format!("AI: {}", turn.content),
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub(crate) fn take_pending(&mut self) -> Option<String> {
        self.pending.take()
    }

    pub(crate) fn push_assistant(&mut self, content: String) {
        self.turns.push(Turn { role: Role::Assistant, content });
    }
}
