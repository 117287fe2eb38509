//! Configuration management

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use crate::application::errors::ConfigError;
use crate::domain::webapp_url::{is_insecure_webapp_url, is_valid_webapp_url};

pub const TOKEN_ENV: &str = "BOT_TOKEN";
pub const WEBAPP_URL_ENV: &str = "WEBAPP_URL";
pub const POLL_TIMEOUT_ENV: &str = "BOT_POLL_TIMEOUT";

/// Bot configuration as read from file and environment
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct Config {
    pub bot: BotConfig,
    pub telegram: TelegramConfig,
    pub calculator: CalculatorConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct BotConfig {
    pub name: String,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            name: "mines-calculator-bot".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct TelegramConfig {
    pub token: Option<String>,
    /// Long-poll timeout passed to getUpdates, in seconds
    pub poll_timeout: u64,
    /// Register the command list with setMyCommands on startup
    pub register_commands: bool,
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            token: None,
            poll_timeout: 30,
            register_commands: true,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct CalculatorConfig {
    pub webapp_url: Option<String>,
}

/// Validated, immutable runtime settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub token: String,
    pub webapp_url: String,
    pub poll_timeout: u64,
    pub register_commands: bool,
}

impl Config {
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let content = std::fs::read_to_string(&path)
            .map_err(|e| ConfigError::Parse(format!("Failed to read config: {}", e)))?;

        serde_yaml::from_str(&content)
            .map_err(|e| ConfigError::Parse(format!("Failed to parse config: {}", e)))
    }

    /// Load from `path` when it exists, defaults otherwise, then apply the environment.
    pub fn load_or_default(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let config = if path.exists() {
            Self::load(&path)?
        } else {
            tracing::debug!("No config file at {}, using defaults", path.display());
            Self::default()
        };
        config.with_env(|key| std::env::var(key).ok())
    }

    /// Override fields from environment variables looked up through `var`.
    pub fn with_env(mut self, var: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        if let Some(token) = var(TOKEN_ENV) {
            self.telegram.token = Some(token);
        }

        if let Some(url) = var(WEBAPP_URL_ENV) {
            self.calculator.webapp_url = Some(url);
        }

        if let Some(timeout) = var(POLL_TIMEOUT_ENV) {
            self.telegram.poll_timeout = timeout.trim().parse().map_err(|_| {
                ConfigError::InvalidValue(format!("{} must be a number of seconds, got {:?}", POLL_TIMEOUT_ENV, timeout))
            })?;
        }

        Ok(self)
    }

    /// Validate the web app URL only (console mode needs no token)
    pub fn webapp_url(&self) -> Result<String, ConfigError> {
        let url = non_empty(self.calculator.webapp_url.as_deref())
            .ok_or_else(|| ConfigError::MissingField(WEBAPP_URL_ENV.to_string()))?;

        if !is_valid_webapp_url(url) {
            return Err(ConfigError::InvalidValue(format!(
                "{} must be an absolute http(s) URL, got {:?}",
                WEBAPP_URL_ENV, url
            )));
        }

        if is_insecure_webapp_url(url) {
            tracing::warn!("{} is not https; Telegram requires https for web apps in production", WEBAPP_URL_ENV);
        }

        Ok(url.to_string())
    }

    /// Check required fields and build the runtime settings
    pub fn resolve(&self) -> Result<Settings, ConfigError> {
        let token = non_empty(self.telegram.token.as_deref())
            .ok_or_else(|| ConfigError::MissingField(TOKEN_ENV.to_string()))?;
        let webapp_url = self.webapp_url()?;

        Ok(Settings {
            token: token.to_string(),
            webapp_url,
            poll_timeout: self.telegram.poll_timeout,
            register_commands: self.telegram.register_commands,
        })
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn resolves_from_environment() {
        let config = Config::default()
            .with_env(env(&[(TOKEN_ENV, "123:abc"), (WEBAPP_URL_ENV, "https://calc.example.com")]))
            .unwrap();

        let settings = config.resolve().unwrap();

        assert_eq!(settings.token, "123:abc");
        assert_eq!(settings.webapp_url, "https://calc.example.com");
        assert_eq!(settings.poll_timeout, 30);
    }

    #[test]
    fn missing_token_is_fatal() {
        let config = Config::default()
            .with_env(env(&[(WEBAPP_URL_ENV, "https://calc.example.com")]))
            .unwrap();

        assert!(matches!(config.resolve(), Err(ConfigError::MissingField(f)) if f == TOKEN_ENV));
    }

    #[test]
    fn blank_url_counts_as_missing() {
        let config = Config::default()
            .with_env(env(&[(TOKEN_ENV, "123:abc"), (WEBAPP_URL_ENV, "  ")]))
            .unwrap();

        assert!(matches!(config.resolve(), Err(ConfigError::MissingField(f)) if f == WEBAPP_URL_ENV));
    }

    #[test]
    fn invalid_url_is_fatal() {
        let config = Config::default()
            .with_env(env(&[(TOKEN_ENV, "123:abc"), (WEBAPP_URL_ENV, "ftp://x")]))
            .unwrap();

        assert!(matches!(config.resolve(), Err(ConfigError::InvalidValue(_))));
    }

    #[test]
    fn http_url_is_accepted() {
        let config = Config::default()
            .with_env(env(&[(TOKEN_ENV, "123:abc"), (WEBAPP_URL_ENV, "http://localhost:8080")]))
            .unwrap();

        assert_eq!(config.resolve().unwrap().webapp_url, "http://localhost:8080");
    }

    #[test]
    fn bad_poll_timeout_is_rejected() {
        let result = Config::default().with_env(env(&[(POLL_TIMEOUT_ENV, "soon")]));
        assert!(matches!(result, Err(ConfigError::InvalidValue(_))));
    }

    #[test]
    fn parses_yaml_and_env_overrides_it() {
        let yaml = "bot:\n  name: calc\ntelegram:\n  token: from-file\n  poll-timeout: 10\n  register-commands: false\ncalculator:\n  webapp-url: https://file.example.com\n";
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        let config = config.with_env(env(&[(WEBAPP_URL_ENV, "https://env.example.com")])).unwrap();

        let settings = config.resolve().unwrap();

        assert_eq!(settings.token, "from-file");
        assert_eq!(settings.webapp_url, "https://env.example.com");
        assert_eq!(settings.poll_timeout, 10);
        assert!(!settings.register_commands);
    }

    #[test]
    fn missing_sections_fall_back_to_defaults() {
        let config: Config = serde_yaml::from_str("calculator:\n  webapp-url: https://calc.example.com\n").unwrap();
        assert_eq!(config.telegram.poll_timeout, 30);
        assert_eq!(config.calculator.webapp_url.as_deref(), Some("https://calc.example.com"));
    }

    #[test]
    fn partial_sections_keep_field_defaults() {
        let yaml = "telegram:\n  token: abc\ncalculator:\n  webapp-url: https://calc.example.com\n";
        let config: Config = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(config.bot.name, "mines-calculator-bot");
        assert_eq!(config.telegram.token.as_deref(), Some("abc"));
        assert_eq!(config.telegram.poll_timeout, 30);
        assert!(config.telegram.register_commands);

        let settings = config.resolve().unwrap();
        assert_eq!(settings.poll_timeout, 30);
        assert!(settings.register_commands);
    }

    #[test]
    fn default_config_round_trips_through_yaml() {
        let yaml = serde_yaml::to_string(&Config::default()).unwrap();
        assert!(yaml.contains("poll-timeout: 30"));
        let parsed: Config = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed.bot.name, "mines-calculator-bot");
    }
}
