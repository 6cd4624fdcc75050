use crate::domain::DomainError;

pub const COMPLETIONS_PATH: &str = "/chat/completions";
const DEFAULT_VERSION_SEGMENT: &str = "/v1";

/// Connection parameters for an OpenAI-compatible chat completions API.
///
/// `api_base` is stored normalized, see [`normalize_api_base`].
#[derive(Clone, PartialEq, Eq)]
pub struct ClientCredentials {
    api_key: String,
    api_base: String,
    model: String,
}

impl ClientCredentials {
    pub fn new(
        api_key: impl Into<String>,
        api_base: impl Into<String>,
        model: impl Into<String>,
    ) -> Result<Self, DomainError> {
        let api_key: String = api_key.into();
        let api_base: String = api_base.into();
        let model = model.into().trim().to_string();

        if api_key.is_empty() {
            return Err(DomainError::configuration("API key is not set"));
        }
        if api_base.trim().is_empty() {
            return Err(DomainError::configuration("API base URL is not set"));
        }
        if model.is_empty() {
            return Err(DomainError::configuration("model is not set"));
        }

        Ok(Self {
            api_key,
            api_base: normalize_api_base(&api_base),
            model,
        })
    }

    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn authorization_header(&self) -> String {
        format!("Bearer {}", self.api_key)
    }

    /// The key with everything but its first 10 and last 4 characters hidden.
    pub fn masked_key(&self) -> String {
        let chars: Vec<char> = self.api_key.chars().collect();
        if chars.len() <= 14 {
            return "*".repeat(chars.len());
        }
        let head: String = chars[..10].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{head}...{tail}")
    }
}

impl std::fmt::Debug for ClientCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientCredentials")
            .field("api_key", &self.masked_key())
            .field("api_base", &self.api_base)
            .field("model", &self.model)
            .finish()
    }
}

/// Resolve a base URL to the full chat completions endpoint.
///
/// - `.../chat/completions` is kept as is
/// - `.../v<N>` gets `/chat/completions` appended
/// - anything else gets `/v1/chat/completions` appended
///
/// Trailing slashes are dropped first, so the result never has a doubled
/// separator. Normalizing an already normalized URL is a no-op.
pub fn normalize_api_base(base: &str) -> String {
    let trimmed = base.trim().trim_end_matches('/');

    if trimmed.ends_with(COMPLETIONS_PATH) {
        return trimmed.to_string();
    }

    let last_segment = trimmed.rsplit('/').next().unwrap_or_default();
    if is_version_segment(last_segment) {
        format!("{trimmed}{COMPLETIONS_PATH}")
    } else {
        format!("{trimmed}{DEFAULT_VERSION_SEGMENT}{COMPLETIONS_PATH}")
    }
}

fn is_version_segment(segment: &str) -> bool {
    segment
        .strip_prefix('v')
        .is_some_and(|rest| !rest.is_empty() && rest.chars().all(|c| c.is_ascii_digit()))
}
