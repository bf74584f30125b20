use std::env;
use std::path::PathBuf;

use crate::error::{BotError, Result};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_IMAGE_MODEL: &str = "gpt-image-1";
pub const DEFAULT_IMAGES_DIR: &str = "generated_images";

#[derive(Debug, Clone)]
pub struct OpenAIConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
}

#[derive(Debug, Clone)]
pub struct DiscordConfig {
    pub token: String,
}

#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub images_dir: PathBuf,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub openai: OpenAIConfig,
    pub discord: DiscordConfig,
    pub storage: StorageConfig,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl OpenAIConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        OpenAIConfig {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_IMAGE_MODEL.to_string(),
        }
    }

    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let api_key = non_empty(lookup("OPENAI_API_KEY")).ok_or_else(|| {
            BotError::Config("OPENAI_API_KEY environment variable is not set.".into())
        })?;
        let base_url =
            non_empty(lookup("OPENAI_BASE_URL")).unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let model = non_empty(lookup("OPENAI_IMAGE_MODEL"))
            .unwrap_or_else(|| DEFAULT_IMAGE_MODEL.to_string());

        Ok(OpenAIConfig {
            api_key,
            base_url,
            model,
        })
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

impl DiscordConfig {
    pub fn new(token: impl Into<String>) -> Self {
        DiscordConfig {
            token: token.into(),
        }
    }

    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let token = non_empty(lookup("DISCORD_TOKEN"))
            .or_else(|| non_empty(lookup("DISCORD_BOT_TOKEN")))
            .ok_or_else(|| {
                BotError::Config("DISCORD_TOKEN environment variable is not set.".into())
            })?;

        Ok(DiscordConfig { token })
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        StorageConfig {
            images_dir: PathBuf::from(DEFAULT_IMAGES_DIR),
        }
    }
}

impl StorageConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        non_empty(lookup("IMAGES_DIR"))
            .map(|dir| StorageConfig {
                images_dir: PathBuf::from(dir),
            })
            .unwrap_or_default()
    }

    pub fn with_images_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.images_dir = dir.into();
        self
    }
}

impl Config {
    pub fn new(openai: OpenAIConfig, discord: DiscordConfig) -> Self {
        Config {
            openai,
            discord,
            storage: StorageConfig::default(),
        }
    }

    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the full configuration from any key lookup. The OpenAI credential is checked first.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let openai = OpenAIConfig::from_lookup(&lookup)?;
        let discord = DiscordConfig::from_lookup(&lookup)?;
        let storage = StorageConfig::from_lookup(&lookup);

        Ok(Config {
            openai,
            discord,
            storage,
        })
    }

    pub fn with_images_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.storage.images_dir = dir.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_missing_api_key_is_fatal() {
        let err = OpenAIConfig::from_lookup(lookup(&[])).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Configuration error: OPENAI_API_KEY environment variable is not set."
        );

        let err = OpenAIConfig::from_lookup(lookup(&[("OPENAI_API_KEY", "  ")])).unwrap_err();
        assert!(matches!(err, BotError::Config(_)));
    }

    #[test]
    fn test_openai_defaults() {
        let config = OpenAIConfig::from_lookup(lookup(&[("OPENAI_API_KEY", "sk-test")])).unwrap();
        assert_eq!(config.api_key, "sk-test");
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.model, DEFAULT_IMAGE_MODEL);
    }

    #[test]
    fn test_full_config_from_lookup() {
        let config = Config::from_lookup(lookup(&[
            ("OPENAI_API_KEY", "sk-test"),
            ("OPENAI_IMAGE_MODEL", "dall-e-3"),
            ("DISCORD_BOT_TOKEN", "discord-token"),
            ("IMAGES_DIR", "/var/lib/bot/images"),
        ]))
        .unwrap();

        assert_eq!(config.openai.model, "dall-e-3");
        assert_eq!(config.discord.token, "discord-token");
        assert_eq!(config.storage.images_dir, PathBuf::from("/var/lib/bot/images"));
    }

    #[test]
    fn test_discord_token_prefers_primary_name() {
        let config = DiscordConfig::from_lookup(lookup(&[
            ("DISCORD_TOKEN", "primary"),
            ("DISCORD_BOT_TOKEN", "fallback"),
        ]))
        .unwrap();
        assert_eq!(config.token, "primary");

        assert!(DiscordConfig::from_lookup(lookup(&[])).is_err());
    }

    #[test]
    fn test_builders() {
        let config = Config::new(
            OpenAIConfig::new("sk-test")
                .with_model("dall-e-2")
                .with_base_url("http://localhost:8080/v1"),
            DiscordConfig::new("token"),
        )
        .with_images_dir("out");

        assert_eq!(config.openai.model, "dall-e-2");
        assert_eq!(config.openai.base_url, "http://localhost:8080/v1");
        assert_eq!(config.storage.images_dir, PathBuf::from("out"));
        assert_eq!(
            StorageConfig::new().images_dir,
            PathBuf::from(DEFAULT_IMAGES_DIR)
        );
    }
}
