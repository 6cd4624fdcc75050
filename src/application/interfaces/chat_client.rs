use async_trait::async_trait;

use crate::domain::{conversation, ChatMessage, DomainError};

pub const DEFAULT_TEMPERATURE: f32 = 0.7;
pub const DEFAULT_MAX_TOKENS: u32 = 2000;
const PING_QUESTION: &str = "Hello";
const PING_SYSTEM_PROMPT: &str = "You are a helpful assistant.";

/// An interface for sending a conversation to an LLM and receiving the
/// completion text.
///
/// Implementors encapsulate transport, serialization, and vendor-specific
/// API details. A failed call is terminal; nothing here retries.
#[async_trait]
pub trait ChatClient: Send + Sync {
    /// Send `messages` in order and return the first choice's content.
    async fn complete(
        &self,
        messages: &[ChatMessage],
        temperature: f32,
        max_tokens: u32,
    ) -> Result<String, DomainError>;

    /// Identifier of the model requests are sent to.
    fn model_name(&self) -> &str;

    /// Ask a single question, optionally preceded by a system prompt, with
    /// the default sampling parameters.
    async fn simple_chat(
        &self,
        question: &str,
        system_prompt: Option<&str>,
    ) -> Result<String, DomainError> {
        let messages = conversation(question, system_prompt);
        self.complete(&messages, DEFAULT_TEMPERATURE, DEFAULT_MAX_TOKENS)
            .await
    }

    /// Liveness probe.
    async fn test_connection(&self) -> bool {
        self.simple_chat(PING_QUESTION, Some(PING_SYSTEM_PROMPT))
            .await
            .is_ok()
    }
}
