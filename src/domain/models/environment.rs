use serde::{Deserialize, Serialize};
use tracing::warn;

/// Deployment context selecting a configuration profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    pub const ALL: [Environment; 3] = [
        Environment::Development,
        Environment::Staging,
        Environment::Production,
    ];

    /// Case-insensitive match against the known names. Anything else falls
    /// back to [`Environment::Development`].
    pub fn parse(value: &str) -> Self {
        let wanted = value.trim().to_lowercase();
        match Self::ALL.iter().find(|env| env.as_str() == wanted) {
            Some(env) => *env,
            None => {
                if !wanted.is_empty() {
                    warn!(
                        "Unknown environment '{}', defaulting to development",
                        value
                    );
                }
                Environment::Development
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Staging => "staging",
            Environment::Production => "production",
        }
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
