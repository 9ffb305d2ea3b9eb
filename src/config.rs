// Validator configuration

use crate::ConfigError;
use serde::Deserialize;
use std::path::Path;
use std::str::FromStr;

/// Where reported field names come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NameSource {
    /// Serde names (`rename`, `rename_all`, `skip`)
    #[default]
    #[serde(alias = "json")]
    Serde,
    /// Declared field identifiers
    #[serde(alias = "field")]
    Identifier,
}

impl FromStr for NameSource {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "serde" | "json" => Ok(NameSource::Serde),
            "identifier" | "field" => Ok(NameSource::Identifier),
            _ => Err(ConfigError::InvalidValue {
                key: "name_source".to_string(),
                value: s.to_string(),
            }),
        }
    }
}

/// Settings applied when a [`Checker`](crate::Checker) is built
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub name_source: NameSource,

    /// Fail the build when a custom rule cannot be registered, instead of
    /// logging and skipping it
    pub strict_rules: bool,
}

impl Config {
    /// Prefix of the environment variables read by [`Config::from_env`]
    pub const ENV_PREFIX: &'static str = "TAGCHECK";

    pub fn with_name_source(mut self, name_source: NameSource) -> Self {
        self.name_source = name_source;
        self
    }

    pub fn with_strict_rules(mut self, strict_rules: bool) -> Self {
        self.strict_rules = strict_rules;
        self
    }

    /// Load from `TAGCHECK_NAME_SOURCE` and `TAGCHECK_STRICT_RULES`
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load using `lookup` to read variables by their full name
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(value) = lookup(&Self::env_key("NAME_SOURCE")) {
            config.name_source = value.parse()?;
        }

        let key = Self::env_key("STRICT_RULES");
        if let Some(value) = lookup(&key) {
            let normalized = value.trim().to_lowercase();
            config.strict_rules = match normalized.as_str() {
                "1" | "true" | "yes" | "on" => true,
                "0" | "false" | "no" | "off" | "" => false,
                _ => return Err(ConfigError::InvalidValue { key, value }),
            };
        }

        Ok(config)
    }

    /// Parse TOML with top-level `name_source` and `strict_rules` keys
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    fn env_key(key: &str) -> String {
        format!("{}_{}", Self::ENV_PREFIX, key)
    }
}
