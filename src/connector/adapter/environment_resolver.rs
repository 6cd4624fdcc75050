use tracing::debug;

use crate::domain::{ConfigMap, Environment};

pub const ENVIRONMENT_VAR: &str = "ENVIRONMENT";
pub const ENVIRONMENT_FALLBACK_VAR: &str = "ENV";

/// Detects the deployment environment from process configuration and
/// produces its merged [`ConfigMap`].
///
/// Never fails: unknown or missing values resolve to development.
pub struct EnvironmentResolver<F = fn(&str) -> Option<String>> {
    lookup: F,
}

impl EnvironmentResolver {
    /// Resolver backed by the process environment.
    pub fn from_process() -> Self {
        Self {
            lookup: |name| std::env::var(name).ok(),
        }
    }
}

impl<F> EnvironmentResolver<F>
where
    F: Fn(&str) -> Option<String>,
{
    pub fn with_lookup(lookup: F) -> Self {
        Self { lookup }
    }

    pub fn resolve(&self) -> Environment {
        let raw = (self.lookup)(ENVIRONMENT_VAR)
            .filter(|v| !v.trim().is_empty())
            .or_else(|| (self.lookup)(ENVIRONMENT_FALLBACK_VAR))
            .unwrap_or_default();
        let env = Environment::parse(&raw);
        debug!("Resolved environment '{}' from '{}'", env, raw);
        env
    }

    pub fn config_for(&self, env: Environment) -> ConfigMap {
        ConfigMap::for_environment(env)
    }

    /// Resolve the environment and build its configuration in one step.
    pub fn load(&self) -> (Environment, ConfigMap) {
        let env = self.resolve();
        (env, self.config_for(env))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{KEY_DEBUG, KEY_REQUEST_TIMEOUT};

    fn resolver_with(
        primary: Option<&'static str>,
        fallback: Option<&'static str>,
    ) -> EnvironmentResolver<impl Fn(&str) -> Option<String>> {
        EnvironmentResolver::with_lookup(move |name: &str| match name {
            ENVIRONMENT_VAR => primary.map(str::to_string),
            ENVIRONMENT_FALLBACK_VAR => fallback.map(str::to_string),
            _ => None,
        })
    }

    #[test]
    fn test_resolve_table() {
        let cases = [
            ("development", Environment::Development),
            ("DEVELOPMENT", Environment::Development),
            ("staging", Environment::Staging),
            ("prod-unknown", Environment::Development),
        ];
        for (input, expected) in cases {
            assert_eq!(resolver_with(Some(input), None).resolve(), expected, "{input}");
        }
    }

    #[test]
    fn test_falls_back_to_secondary_name_then_default() {
        assert_eq!(
            resolver_with(None, Some("production")).resolve(),
            Environment::Production
        );
        assert_eq!(
            resolver_with(Some("staging"), Some("production")).resolve(),
            Environment::Staging
        );
        assert_eq!(resolver_with(None, None).resolve(), Environment::Development);
    }

    #[test]
    fn test_load_returns_matching_config() {
        let (env, config) = resolver_with(Some("production"), None).load();
        assert_eq!(env, Environment::Production);
        assert_eq!(config.get_bool(KEY_DEBUG), Some(false));
        assert_eq!(
            config.get_int(KEY_REQUEST_TIMEOUT),
            ConfigMap::for_environment(Environment::Production).get_int(KEY_REQUEST_TIMEOUT)
        );
    }
}
