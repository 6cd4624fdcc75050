use std::collections::BTreeMap;

use serde::Serialize;

use super::Environment;

pub const KEY_DEBUG: &str = "debug";
pub const KEY_LOG_LEVEL: &str = "log_level";
pub const KEY_MAX_RETRIES: &str = "max_retries";
pub const KEY_REQUEST_TIMEOUT: &str = "request_timeout";
pub const KEY_RATE_LIMIT_ENABLED: &str = "rate_limit_enabled";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ConfigValue {
    Bool(bool),
    Int(i64),
    Str(String),
}

impl From<bool> for ConfigValue {
    fn from(value: bool) -> Self {
        ConfigValue::Bool(value)
    }
}

impl From<i64> for ConfigValue {
    fn from(value: i64) -> Self {
        ConfigValue::Int(value)
    }
}

impl From<&str> for ConfigValue {
    fn from(value: &str) -> Self {
        ConfigValue::Str(value.to_string())
    }
}

/// Read-only option map: base values overlaid with a per-environment table.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ConfigMap {
    values: BTreeMap<String, ConfigValue>,
}

impl ConfigMap {
    /// Override values win; keys absent from the override keep the base value.
    pub fn merged(base: ConfigMap, overrides: ConfigMap) -> Self {
        let mut values = base.values;
        values.extend(overrides.values);
        Self { values }
    }

    pub fn for_environment(env: Environment) -> Self {
        Self::merged(Self::base(), Self::overrides(env))
    }

    fn base() -> Self {
        Self::from_pairs([
            (KEY_DEBUG, false.into()),
            (KEY_LOG_LEVEL, "INFO".into()),
            (KEY_MAX_RETRIES, 3i64.into()),
            (KEY_REQUEST_TIMEOUT, 30i64.into()),
            (KEY_RATE_LIMIT_ENABLED, false.into()),
        ])
    }

    fn overrides(env: Environment) -> Self {
        match env {
            Environment::Development => Self::from_pairs([
                (KEY_DEBUG, true.into()),
                (KEY_LOG_LEVEL, "DEBUG".into()),
                (KEY_MAX_RETRIES, 1i64.into()),
                (KEY_REQUEST_TIMEOUT, 30i64.into()),
            ]),
            Environment::Staging => Self::from_pairs([
                (KEY_DEBUG, false.into()),
                (KEY_LOG_LEVEL, "INFO".into()),
                (KEY_MAX_RETRIES, 3i64.into()),
                (KEY_REQUEST_TIMEOUT, 60i64.into()),
                (KEY_RATE_LIMIT_ENABLED, true.into()),
            ]),
            Environment::Production => Self::from_pairs([
                (KEY_DEBUG, false.into()),
                (KEY_LOG_LEVEL, "WARNING".into()),
                (KEY_MAX_RETRIES, 5i64.into()),
                (KEY_REQUEST_TIMEOUT, 90i64.into()),
                (KEY_RATE_LIMIT_ENABLED, true.into()),
            ]),
        }
    }

    pub fn from_pairs<const N: usize>(pairs: [(&str, ConfigValue); N]) -> Self {
        Self {
            values: pairs
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&ConfigValue> {
        self.values.get(key)
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        match self.values.get(key) {
            Some(ConfigValue::Bool(b)) => Some(*b),
            _ => None,
        }
    }

    pub fn get_int(&self, key: &str) -> Option<i64> {
        match self.values.get(key) {
            Some(ConfigValue::Int(i)) => Some(*i),
            _ => None,
        }
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        match self.values.get(key) {
            Some(ConfigValue::Str(s)) => Some(s.as_str()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_override_wins_and_base_survives() {
        let base = ConfigMap::from_pairs([("a", 1i64.into()), ("b", "keep".into())]);
        let overrides = ConfigMap::from_pairs([("a", 2i64.into())]);
        let merged = ConfigMap::merged(base, overrides);
        assert_eq!(merged.get_int("a"), Some(2));
        assert_eq!(merged.get_str("b"), Some("keep"));
    }

    #[test]
    fn test_every_environment_has_all_base_keys() {
        for env in Environment::ALL {
            let config = ConfigMap::for_environment(env);
            for key in [
                KEY_DEBUG,
                KEY_LOG_LEVEL,
                KEY_MAX_RETRIES,
                KEY_REQUEST_TIMEOUT,
                KEY_RATE_LIMIT_ENABLED,
            ] {
                assert!(config.get(key).is_some(), "{env} is missing {key}");
            }
        }
    }

    #[test]
    fn test_strictness_ordering() {
        let dev = ConfigMap::for_environment(Environment::Development);
        let staging = ConfigMap::for_environment(Environment::Staging);
        let prod = ConfigMap::for_environment(Environment::Production);

        assert_eq!(dev.get_bool(KEY_DEBUG), Some(true));
        assert_eq!(prod.get_bool(KEY_DEBUG), Some(false));
        assert_eq!(prod.get_bool(KEY_RATE_LIMIT_ENABLED), Some(true));
        assert_eq!(dev.get_bool(KEY_RATE_LIMIT_ENABLED), Some(false));

        let timeout = |c: &ConfigMap| c.get_int(KEY_REQUEST_TIMEOUT).unwrap();
        assert!(timeout(&prod) >= timeout(&staging));
        assert!(timeout(&staging) >= timeout(&dev));
    }

    #[test]
    fn test_serializes_as_flat_object() {
        let config = ConfigMap::for_environment(Environment::Staging);
        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(json["log_level"], "INFO");
        assert_eq!(json["request_timeout"], 60);
        assert_eq!(json["rate_limit_enabled"], true);
    }
}
