use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::json;

use crate::application::ChatClient;
use crate::domain::{ChatMessage, DomainError, INTENDED_SEGMENT_COUNT};

enum MockReply {
    /// Canned replies shaped like what the thread and title prompts ask for.
    Canned,
    Text(String),
    Status(u16),
    Unreachable,
}

/// Offline [`ChatClient`] returning scripted replies and recording every
/// conversation it receives.
pub struct MockChatClient {
    reply: MockReply,
    requests: Mutex<Vec<Vec<ChatMessage>>>,
}

impl MockChatClient {
    pub fn new() -> Self {
        Self::from_reply(MockReply::Canned)
    }

    pub fn with_reply(text: impl Into<String>) -> Self {
        Self::from_reply(MockReply::Text(text.into()))
    }

    pub fn failing_with_status(status: u16) -> Self {
        Self::from_reply(MockReply::Status(status))
    }

    pub fn unreachable() -> Self {
        Self::from_reply(MockReply::Unreachable)
    }

    fn from_reply(reply: MockReply) -> Self {
        Self {
            reply,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Conversations received so far, oldest first.
    pub fn requests(&self) -> Vec<Vec<ChatMessage>> {
        self.requests
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    fn canned_reply(messages: &[ChatMessage]) -> String {
        let asks_for_title = messages
            .last()
            .is_some_and(|m| m.content().contains("\"main_title\""));

        if asks_for_title {
            json!({"main_title": "Mock cover title", "subtitle": "Generated offline"}).to_string()
        } else {
            let posts: Vec<String> = (1..=INTENDED_SEGMENT_COUNT)
                .map(|i| format!("{i}/\nOffline draft post {i}."))
                .collect();
            json!(posts).to_string()
        }
    }
}

impl Default for MockChatClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChatClient for MockChatClient {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        _temperature: f32,
        max_tokens: u32,
    ) -> Result<String, DomainError> {
        if messages.is_empty() {
            return Err(DomainError::invalid_input("messages must not be empty"));
        }
        if max_tokens == 0 {
            return Err(DomainError::invalid_input("max_tokens must be positive"));
        }

        self.requests
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(messages.to_vec());

        match &self.reply {
            MockReply::Canned => Ok(Self::canned_reply(messages)),
            MockReply::Text(text) => Ok(text.clone()),
            MockReply::Status(status) => Err(DomainError::api(*status, "mock failure")),
            MockReply::Unreachable => Err(DomainError::transport("mock server unreachable")),
        }
    }

    fn model_name(&self) -> &str {
        "mock-chat"
    }
}
