//! Matcher configuration, read from the environment or set by the caller.

use std::fmt;
use std::time::Duration;

pub const API_KEY_VAR: &str = "GEMINI_API_KEY";
pub const MODEL_VAR: &str = "TAXROUTE_MODEL";
pub const BASE_URL_VAR: &str = "TAXROUTE_GEMINI_URL";

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Clone)]
pub struct MatcherConfig {
    pub api_key: Option<String>,
    pub model: String,
    /// Base URL without trailing slash, e.g. `https://generativelanguage.googleapis.com`.
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl MatcherConfig {
    /// Defaults overridden by `GEMINI_API_KEY`, `TAXROUTE_MODEL` and
    /// `TAXROUTE_GEMINI_URL` when set and non-empty.
    pub fn from_env() -> Self {
        let var = |name: &str| std::env::var(name).ok().filter(|v| !v.trim().is_empty());
        let defaults = Self::default();
        Self {
            api_key: var(API_KEY_VAR),
            model: var(MODEL_VAR).unwrap_or(defaults.model),
            base_url: var(BASE_URL_VAR).unwrap_or(defaults.base_url),
            timeout: defaults.timeout,
        }
    }
}

impl fmt::Debug for MatcherConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MatcherConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_redacts_api_key() {
        let config = MatcherConfig {
            api_key: Some("secret-key".into()),
            ..MatcherConfig::default()
        };
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("secret-key"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn from_env_overrides_and_ignores_blank_values() {
        // Only this test touches these variables.
        unsafe {
            std::env::set_var(API_KEY_VAR, "env-key");
            std::env::set_var(MODEL_VAR, "gemini-test");
            std::env::set_var(BASE_URL_VAR, "   ");
        }
        let config = MatcherConfig::from_env();
        assert_eq!(config.api_key.as_deref(), Some("env-key"));
        assert_eq!(config.model, "gemini-test");
        assert_eq!(config.base_url, DEFAULT_BASE_URL);

        unsafe {
            std::env::set_var(API_KEY_VAR, "");
            std::env::remove_var(MODEL_VAR);
            std::env::remove_var(BASE_URL_VAR);
        }
        let config = MatcherConfig::from_env();
        assert!(config.api_key.is_none());
        assert_eq!(config.model, DEFAULT_MODEL);

        unsafe {
            std::env::remove_var(API_KEY_VAR);
        }
    }

    #[test]
    fn defaults() {
        let config = MatcherConfig::default();
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert!(config.api_key.is_none());
    }
}
