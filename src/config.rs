use anyhow::{Context, Result};
use std::env;

use crate::relay::ResponseSchema;

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_MODEL: &str = "gpt-4o-2024-08-06";
const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 5000;

#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub host: String,
    pub port: u16,
    pub response_schema: ResponseSchema,
    pub thread_focus: bool,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let api_key = lookup("OPENAI_API_KEY")
            .filter(|key| !key.trim().is_empty())
            .context("OPENAI_API_KEY must be set")?;

        let port = match lookup("PORT") {
            Some(port) => port
                .trim()
                .parse::<u16>()
                .with_context(|| format!("Invalid PORT value '{}'", port))?,
            None => DEFAULT_PORT,
        };

        let response_schema = match lookup("RESPONSE_SCHEMA") {
            Some(schema) => schema
                .parse::<ResponseSchema>()
                .context("Invalid RESPONSE_SCHEMA value")?,
            None => ResponseSchema::WithChatText,
        };

        let thread_focus = match lookup("THREAD_FOCUS") {
            Some(flag) => flag
                .trim()
                .parse::<bool>()
                .with_context(|| format!("Invalid THREAD_FOCUS value '{}'", flag))?,
            None => true,
        };

        Ok(Self {
            api_key,
            base_url: lookup("OPENAI_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            model: lookup("OPENAI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            host: lookup("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
            response_schema,
            thread_focus,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[("OPENAI_API_KEY", "sk-test")]).unwrap();
        assert_eq!(config.api_key, "sk-test");
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 5000);
        assert_eq!(config.response_schema, ResponseSchema::WithChatText);
        assert!(config.thread_focus);
    }

    #[test]
    fn test_missing_api_key() {
        assert!(load(&[]).is_err());
        assert!(load(&[("OPENAI_API_KEY", "  ")]).is_err());
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("OPENAI_API_KEY", "sk-test"),
            ("OPENAI_BASE_URL", "http://localhost:8081/v1/"),
            ("PORT", "8080"),
            ("RESPONSE_SCHEMA", "comments"),
            ("THREAD_FOCUS", "false"),
        ])
        .unwrap();
        assert_eq!(config.base_url, "http://localhost:8081/v1");
        assert_eq!(config.port, 8080);
        assert_eq!(config.response_schema, ResponseSchema::CommentsOnly);
        assert!(!config.thread_focus);
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        assert!(load(&[("OPENAI_API_KEY", "sk-test"), ("PORT", "http")]).is_err());
        assert!(load(&[("OPENAI_API_KEY", "sk-test"), ("RESPONSE_SCHEMA", "xml")]).is_err());
        assert!(load(&[("OPENAI_API_KEY", "sk-test"), ("THREAD_FOCUS", "maybe")]).is_err());
    }
}
