//! Text generation abstraction.

use async_trait::async_trait;

use crate::error::Result;

/// A provider that completes a system/user message pair into answer text.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generate a completion for the given system and user messages.
    async fn generate(&self, system: &str, user: &str) -> Result<String>;
}
