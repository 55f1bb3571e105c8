//! Conversation state and retrieval-augmented answer generation for the
//! Folio portfolio assistant.
//!
//! A [`Conversation`] holds the ordered turn log and at most one question in
//! flight. [`ChatEngine::resolve`] answers the in-flight question by
//! retrieving context through a `folio-rag` pipeline, filling the fixed
//! instruction template, and calling a [`TextGenerator`]. External failures
//! degrade to an inline error sentence appended as the assistant turn; the
//! session always stays usable.

pub mod conversation;
pub mod engine;
pub mod error;
pub mod generator;
pub mod huggingface;
pub mod prompt;

pub use conversation::{Conversation, Role, Submission, Turn};
pub use engine::ChatEngine;
pub use error::{ChatError, Result};
pub use generator::TextGenerator;
pub use huggingface::{DEFAULT_CHAT_MODEL, DEFAULT_MAX_TOKENS, HfTextGenerator};
pub use prompt::{SYSTEM_PROMPT, clamp_headings, context_block, user_message};
