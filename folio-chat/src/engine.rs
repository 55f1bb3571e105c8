//! Retrieval-augmented chat engine.

use std::sync::Arc;

use tracing::warn;

use folio_rag::RagPipeline;

use crate::conversation::Conversation;
use crate::error::{ChatError, Result};
use crate::generator::TextGenerator;
use crate::prompt;

/// Drives pending questions through retrieve → generate.
pub struct ChatEngine {
    pipeline: RagPipeline,
    generator: Arc<dyn TextGenerator>,
}

impl ChatEngine {
    /// Create an engine from a retrieval pipeline and a text generator.
    pub fn new(pipeline: RagPipeline, generator: Arc<dyn TextGenerator>) -> Self {
        Self { pipeline, generator }
    }

    /// Resolve the in-flight question and return the assistant's text.
    ///
    /// Exactly one assistant turn is appended: the generated answer, or an
    /// inline error sentence when retrieval or generation fails. The pending
    /// slot is cleared either way. Calling this while idle is a contract
    /// error.
    pub async fn resolve(&self, conversation: &mut Conversation) -> Result<String> {
        let question = conversation.take_pending().ok_or(ChatError::NothingPending)?;
        let answer = match self.answer(&question).await {
            Ok(text) => text,
            Err(e) => {
                warn!(error = %e, "answering failed, degrading to inline message");
                format!(
                    "Sorry, there was an error processing your request: {e}. Please try again."
                )
            }
        };
        conversation.push_assistant(answer.clone());
        Ok(answer)
    }

    async fn answer(&self, question: &str) -> Result<String> {
        let results = self.pipeline.retrieve(question).await?;
        let context = prompt::context_block(&results);
        let user = prompt::user_message(&context, question);
        let raw = self.generator.generate(prompt::SYSTEM_PROMPT, &user).await?;
        Ok(prompt::clamp_headings(&raw))
    }
}
