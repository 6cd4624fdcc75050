use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("API error: HTTP {status}: {body}")]
    Api { status: u16, body: String },

    /// The reply arrived but could not be used. `raw` keeps the offending
    /// text so callers can log it.
    #[error("Format error: {message}")]
    Format { message: String, raw: String },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl DomainError {
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    pub fn api(status: u16, body: impl Into<String>) -> Self {
        Self::Api {
            status,
            body: body.into(),
        }
    }

    pub fn format(message: impl Into<String>, raw: impl Into<String>) -> Self {
        Self::Format {
            message: message.into(),
            raw: raw.into(),
        }
    }

    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Short label identifying the failure category in console output.
    pub fn category(&self) -> &'static str {
        match self {
            Self::Configuration(_) => "configuration",
            Self::Transport(_) => "transport",
            Self::Api { .. } => "api",
            Self::Format { .. } => "format",
            Self::InvalidInput(_) => "invalid-input",
            Self::Io(_) => "io",
        }
    }

    /// Raw model text attached to a format failure, if any.
    pub fn raw_text(&self) -> Option<&str> {
        match self {
            Self::Format { raw, .. } => Some(raw),
            _ => None,
        }
    }

    pub fn is_configuration_error(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }

    pub fn is_transport_error(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    pub fn is_api_error(&self) -> bool {
        matches!(self, Self::Api { .. })
    }

    pub fn is_format_error(&self) -> bool {
        matches!(self, Self::Format { .. })
    }
}
