use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::application::ChatClient;
use crate::domain::{ChatMessage, ClientCredentials, DomainError};

pub const API_KEY_VAR: &str = "OPENAI_API_KEY";
pub const API_BASE_VAR: &str = "OPENAI_API_BASE";
pub const MODEL_VAR: &str = "OPENAI_MODEL";

pub const DEFAULT_API_BASE: &str = "https://api.tu-zi.com/v1";
pub const DEFAULT_MODEL: &str = "chatgpt-4o-latest";
/// Every completion request is bounded by this timeout.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// OpenAI chat completions request payload.
#[derive(Serialize)]
struct ApiRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
    max_tokens: u32,
}

/// Minimal subset of the chat completions response we care about.
#[derive(Deserialize)]
struct ApiResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

/// HTTP client for OpenAI-compatible chat completions endpoints.
///
/// Each [`ChatClient::complete`] call is a single POST bounded by
/// [`REQUEST_TIMEOUT`]. There are no retries; a transport failure, a status
/// other than 200 or a body without `choices[0].message.content` is returned
/// as the matching [`DomainError`] variant.
///
/// ```text
/// OPENAI_API_KEY=sk-...                     (required)
/// OPENAI_API_BASE=https://api.tu-zi.com/v1  (normalized to .../chat/completions)
/// OPENAI_MODEL=chatgpt-4o-latest
/// ```
pub struct OpenAiChatClient {
    client: reqwest::Client,
    credentials: ClientCredentials,
    /// Precomputed `Bearer <key>` value.
    authorization: String,
}

impl OpenAiChatClient {
    pub fn new(credentials: ClientCredentials) -> Result<Self, DomainError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| DomainError::configuration(format!("failed to build HTTP client: {e}")))?;

        info!(
            "Chat client configured: endpoint={}, model={}, key={}",
            credentials.api_base(),
            credentials.model(),
            credentials.masked_key()
        );

        Ok(Self {
            client,
            authorization: credentials.authorization_header(),
            credentials,
        })
    }

    /// Construct from `OPENAI_API_KEY`, `OPENAI_API_BASE` and `OPENAI_MODEL`.
    pub fn from_env() -> Result<Self, DomainError> {
        Self::new(credentials_from_lookup(|name| std::env::var(name).ok())?)
    }

    pub fn endpoint(&self) -> &str {
        self.credentials.api_base()
    }
}

/// Read credentials through `lookup`. A missing key is a configuration
/// error; a missing base or model falls back to the defaults.
pub fn credentials_from_lookup(
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<ClientCredentials, DomainError> {
    let api_key = lookup(API_KEY_VAR)
        .ok_or_else(|| DomainError::configuration(format!("{API_KEY_VAR} is not set")))?;
    let api_base = lookup(API_BASE_VAR).unwrap_or_else(|| DEFAULT_API_BASE.to_string());
    let model = lookup(MODEL_VAR).unwrap_or_else(|| DEFAULT_MODEL.to_string());
    ClientCredentials::new(api_key, api_base, model)
}

#[async_trait]
impl ChatClient for OpenAiChatClient {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        temperature: f32,
        max_tokens: u32,
    ) -> Result<String, DomainError> {
        if messages.is_empty() {
            return Err(DomainError::invalid_input("messages must not be empty"));
        }
        if max_tokens == 0 {
            return Err(DomainError::invalid_input("max_tokens must be positive"));
        }

        let request = ApiRequest {
            model: self.credentials.model(),
            messages,
            temperature,
            max_tokens,
        };

        debug!(
            "POST {} ({} messages, temperature={}, max_tokens={})",
            self.endpoint(),
            messages.len(),
            temperature,
            max_tokens
        );

        let response = self
            .client
            .post(self.endpoint())
            .header(AUTHORIZATION, &self.authorization)
            .header(CONTENT_TYPE, "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                let message = if e.is_timeout() {
                    format!("request timed out after {}s: {e}", REQUEST_TIMEOUT.as_secs())
                } else {
                    format!("request failed: {e}")
                };
                warn!("Chat completion call failed: {message}");
                DomainError::transport(message)
            })?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            warn!("Chat completion API returned {status}: {body}");
            return Err(DomainError::api(status.as_u16(), body));
        }

        let body = response.text().await.map_err(|e| {
            warn!("Failed to read chat completion body: {e}");
            DomainError::transport(format!("failed to read response body: {e}"))
        })?;

        let api_response: ApiResponse = serde_json::from_str(&body).map_err(|e| {
            warn!("Unexpected chat completion response: {e}. Body: {body}");
            DomainError::format(format!("unexpected response shape: {e}"), body.as_str())
        })?;

        api_response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| {
                warn!("Chat completion response has no message content. Body: {body}");
                DomainError::format("response has no choices[0].message.content", body.as_str())
            })
    }

    fn model_name(&self) -> &str {
        self.credentials.model()
    }
}
