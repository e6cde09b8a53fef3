use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::application::usecases::{DEFAULT_COOLDOWN, DEFAULT_COOLDOWN_POLL, DEFAULT_DEBOUNCE};
use crate::application::{AppError, AppResult};
use crate::domain::MessageDefaults;

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    pub listen: String,
    pub debounce_seconds: u64,
    pub cooldown_seconds: u64,
    pub cooldown_poll_seconds: u64,
    pub provider: ProviderCfg,
    pub defaults: MessageDefaults,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ProviderCfg {
    pub base_url: String,
    pub timeout_seconds: u64,
    pub max_body_chars: Option<usize>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen: "127.0.0.1:5000".to_string(),
            debounce_seconds: DEFAULT_DEBOUNCE.as_secs(),
            cooldown_seconds: DEFAULT_COOLDOWN.as_secs(),
            cooldown_poll_seconds: DEFAULT_COOLDOWN_POLL.as_secs(),
            provider: ProviderCfg::default(),
            defaults: MessageDefaults::default(),
        }
    }
}

impl Default for ProviderCfg {
    fn default() -> Self {
        Self {
            base_url: "https://api.day.app".to_string(),
            timeout_seconds: 10,
            max_body_chars: None,
        }
    }
}

impl Config {
    /// A missing file is not an error: the service runs on defaults.
    pub fn load_from_file(path: &str) -> anyhow::Result<Self> {
        if !Path::new(path).exists() {
            tracing::warn!("config {} not found, using defaults", path);
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path)?;
        let raw = expand_env(&raw);
        let cfg: Config = serde_yaml::from_str(&raw)?;
        Ok(cfg)
    }

    pub fn validate(&self) -> AppResult<()> {
        if self.debounce_seconds == 0 {
            return Err(AppError::Config("debounce_seconds must be > 0".into()));
        }
        if self.cooldown_seconds == 0 || self.cooldown_poll_seconds == 0 {
            return Err(AppError::Config(
                "cooldown_seconds and cooldown_poll_seconds must be > 0".into(),
            ));
        }
        if self.cooldown_poll_seconds > self.cooldown_seconds {
            return Err(AppError::Config(
                "cooldown_poll_seconds must not exceed cooldown_seconds".into(),
            ));
        }
        if self.provider.timeout_seconds == 0 {
            return Err(AppError::Config("provider.timeout_seconds must be > 0".into()));
        }
        if self.provider.max_body_chars == Some(0) {
            return Err(AppError::Config("provider.max_body_chars must be > 0".into()));
        }
        Ok(())
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_secs(self.debounce_seconds)
    }

    pub fn cooldown(&self) -> Duration {
        Duration::from_secs(self.cooldown_seconds)
    }

    pub fn cooldown_poll(&self) -> Duration {
        Duration::from_secs(self.cooldown_poll_seconds)
    }

    pub fn provider_timeout(&self) -> Duration {
        Duration::from_secs(self.provider.timeout_seconds)
    }
}

/// very small ${VAR} expansion to keep config simple
fn expand_env(s: &str) -> String {
    let mut out = s.to_string();
    for (k, v) in std::env::vars() {
        out = out.replace(&format!("${{{}}}", k), &v);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_gives_defaults() {
        let cfg: Config = serde_yaml::from_str("{}").unwrap();
        assert_eq!(cfg.debounce(), Duration::from_secs(20));
        assert_eq!(cfg.cooldown(), Duration::from_secs(300));
        assert_eq!(cfg.cooldown_poll(), Duration::from_secs(1));
        assert_eq!(cfg.provider.base_url, "https://api.day.app");
        assert_eq!(cfg.defaults, MessageDefaults::default());
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let cfg: Config = serde_yaml::from_str(
            r#"
listen: "0.0.0.0:8080"
provider:
  base_url: "https://bark.example.com"
  max_body_chars: 512
defaults:
  group: "team"
"#,
        )
        .unwrap();

        assert_eq!(cfg.listen, "0.0.0.0:8080");
        assert_eq!(cfg.provider.timeout_seconds, 10);
        assert_eq!(cfg.provider.max_body_chars, Some(512));
        assert_eq!(cfg.defaults.group, "team");
        assert_eq!(cfg.defaults.sender, "fchat");
    }

    #[test]
    fn rejects_poll_longer_than_cooldown() {
        let cfg = Config {
            cooldown_seconds: 5,
            cooldown_poll_seconds: 10,
            ..Config::default()
        };
        assert!(matches!(cfg.validate(), Err(AppError::Config(_))));
    }

    #[test]
    fn rejects_zero_debounce() {
        let cfg = Config {
            debounce_seconds: 0,
            ..Config::default()
        };
        assert!(matches!(cfg.validate(), Err(AppError::Config(_))));
    }

    #[test]
    fn rejects_zero_timeout() {
        let cfg: Config = serde_yaml::from_str("provider:\n  timeout_seconds: 0\n").unwrap();
        assert!(matches!(cfg.validate(), Err(AppError::Config(_))));
    }

    #[test]
    fn defaults_accept_from_as_sender_key() {
        let cfg: Config = serde_yaml::from_str("defaults:\n  from: \"mybot\"\n").unwrap();
        assert_eq!(cfg.defaults.sender, "mybot");
        assert_eq!(cfg.defaults.group, "fchat");

        let cfg: Config = serde_yaml::from_str("defaults:\n  sender: \"other\"\n").unwrap();
        assert_eq!(cfg.defaults.sender, "other");
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let cfg = Config::load_from_file("/definitely/not/here/pushgate.yaml").unwrap();
        assert_eq!(cfg.listen, "127.0.0.1:5000");
    }

    #[test]
    fn expands_env_placeholders() {
        let Ok(path) = std::env::var("PATH") else {
            return;
        };
        assert_eq!(expand_env("path: ${PATH}"), format!("path: {path}"));
        assert_eq!(expand_env("x: ${PUSHGATE_SURELY_UNSET}"), "x: ${PUSHGATE_SURELY_UNSET}");
    }
}
