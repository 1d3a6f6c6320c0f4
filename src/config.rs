//! Configuration and fixed page contract names.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

pub const PASSWORD_ID: &str = "password";
pub const PASSWORD_STRENGTH_ID: &str = "password-strength";
pub const SEARCH_ID: &str = "search";
pub const SEARCH_RESULTS_ID: &str = "search-results";
pub const PAYMENT_FORM_ID: &str = "payment-form";
pub const PREVIEW_PREFIX: &str = "preview-";

pub const CSRF_FIELD_NAME: &str = "csrfmiddlewaretoken";
pub const CSRF_HEADER: &str = "X-CSRFToken";
pub const PUBLISHABLE_KEY_META: &str = "stripe-publishable-key";

pub const CARD_NUMBER_ID: &str = "card-number";
pub const CARD_EXP_MONTH_ID: &str = "card-exp-month";
pub const CARD_EXP_YEAR_ID: &str = "card-exp-year";
pub const CARD_CVC_ID: &str = "card-cvc";
pub const CARD_NAME_ID: &str = "card-name";

const ENV_CONFIG_PATH: &str = "ALUMNI_CONNECT_CONFIG";
const ENV_BASE_URL: &str = "ALUMNI_CONNECT_BASE_URL";
const ENV_INTENT_ENDPOINT: &str = "ALUMNI_CONNECT_INTENT_ENDPOINT";
const ENV_SUCCESS_URL: &str = "ALUMNI_CONNECT_SUCCESS_URL";
const ENV_PROVIDER_API: &str = "ALUMNI_CONNECT_PROVIDER_API";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Page behaviour settings.
///
/// Every field has a default, so a config file only lists what it changes.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Origin that relative request paths resolve against.
    pub base_url: Option<String>,
    pub intent_endpoint: String,
    pub success_url: String,
    pub currency: String,
    pub provider_api_base: String,
    pub search_debounce_ms: u64,
    pub search_min_chars: usize,
    pub search_placeholder_delay_ms: u64,
    pub alert_dismiss_ms: u64,
    pub notification_ms: u64,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            intent_endpoint: "/payment/create-intent/".to_string(),
            success_url: "/payment/success/".to_string(),
            currency: "inr".to_string(),
            provider_api_base: "https://api.stripe.com".to_string(),
            search_debounce_ms: 300,
            search_min_chars: 2,
            search_placeholder_delay_ms: 500,
            alert_dismiss_ms: 5000,
            notification_ms: 5000,
        }
    }
}

impl UiConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_json(&content)
    }

    /// Defaults with environment overrides applied.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env();
        config
    }

    /// Loads the file named by `ALUMNI_CONNECT_CONFIG` if set, then applies
    /// environment overrides.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match std::env::var(ENV_CONFIG_PATH) {
            Ok(path) => Self::from_path(PathBuf::from(path))?,
            Err(_) => Self::default(),
        };
        config.apply_env();

        #[cfg(feature = "tracing")]
        tracing::info!(
            base_url = ?config.base_url,
            intent_endpoint = %config.intent_endpoint,
            "UI config loaded"
        );

        Ok(config)
    }

    fn apply_env(&mut self) {
        if let Ok(value) = std::env::var(ENV_BASE_URL) {
            self.base_url = Some(value);
        }
        if let Ok(value) = std::env::var(ENV_INTENT_ENDPOINT) {
            self.intent_endpoint = value;
        }
        if let Ok(value) = std::env::var(ENV_SUCCESS_URL) {
            self.success_url = value;
        }
        if let Ok(value) = std::env::var(ENV_PROVIDER_API) {
            self.provider_api_base = value;
        }
    }

    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }

    pub fn search_placeholder_delay(&self) -> Duration {
        Duration::from_millis(self.search_placeholder_delay_ms)
    }

    pub fn alert_dismiss_after(&self) -> Duration {
        Duration::from_millis(self.alert_dismiss_ms)
    }

    pub fn notification_duration(&self) -> Duration {
        Duration::from_millis(self.notification_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::io::Write;
    use tempfile::NamedTempFile;

    /// Helper to safely set env var in tests
    fn set_env(key: &str, value: &str) {
        // SAFETY: This is only for testing purposes in single-threaded test context
        unsafe { std::env::set_var(key, value); }
    }

    /// Helper to safely remove env var in tests
    fn remove_env(key: &str) {
        // SAFETY: This is only for testing purposes in single-threaded test context
        unsafe { std::env::remove_var(key); }
    }

    fn clear_env() {
        for key in [
            ENV_CONFIG_PATH,
            ENV_BASE_URL,
            ENV_INTENT_ENDPOINT,
            ENV_SUCCESS_URL,
            ENV_PROVIDER_API,
        ] {
            remove_env(key);
        }
    }

    #[test]
    fn test_defaults() {
        let config = UiConfig::default();
        assert_eq!(config.search_debounce(), Duration::from_millis(300));
        assert_eq!(config.search_placeholder_delay(), Duration::from_millis(500));
        assert_eq!(config.notification_duration(), Duration::from_millis(5000));
        assert_eq!(config.currency, "inr");
        assert_eq!(config.success_url, "/payment/success/");
    }

    #[test]
    fn test_from_json_partial() {
        let config =
            UiConfig::from_json(r#"{"base_url": "https://alumni.example", "search_min_chars": 3}"#)
                .unwrap();
        assert_eq!(config.base_url.as_deref(), Some("https://alumni.example"));
        assert_eq!(config.search_min_chars, 3);
        assert_eq!(config.intent_endpoint, "/payment/create-intent/");
    }

    #[test]
    fn test_from_json_invalid() {
        let result = UiConfig::from_json(r#"{"search_min_chars": "two"}"#);
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_from_path_missing() {
        let result = UiConfig::from_path("/nonexistent/alumni-ui.json");
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    #[serial]
    fn test_from_env_overrides() {
        clear_env();
        set_env(ENV_BASE_URL, "http://localhost:8000");
        set_env(ENV_SUCCESS_URL, "/thanks/");

        let config = UiConfig::from_env();
        assert_eq!(config.base_url.as_deref(), Some("http://localhost:8000"));
        assert_eq!(config.success_url, "/thanks/");
        assert_eq!(config.intent_endpoint, "/payment/create-intent/");

        clear_env();
    }

    #[test]
    #[serial]
    fn test_load_file_then_env() {
        clear_env();
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        write!(file, r#"{{"intent_endpoint": "/pay/intent/", "alert_dismiss_ms": 1000}}"#)
            .expect("Failed to write");
        set_env(ENV_CONFIG_PATH, file.path().to_str().unwrap());
        set_env(ENV_INTENT_ENDPOINT, "/override/");

        let config = UiConfig::load().unwrap();
        assert_eq!(config.intent_endpoint, "/override/");
        assert_eq!(config.alert_dismiss_after(), Duration::from_millis(1000));

        clear_env();
    }
}
