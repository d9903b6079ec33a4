//! Load configuration via `config` crate with env-override support.

use std::{ops::Deref, sync::Arc};

use serde::Deserialize;

use crate::base::prompts;

use super::types::Res;

/// Default OpenAI completion model to use
fn default_openai_completion_model() -> String {
    "gpt-4o-mini".to_string()
}

/// Default OpenAI image model to use
fn default_openai_image_model() -> String {
    "dall-e-2".to_string()
}

/// Default size of generated images
fn default_openai_image_size() -> String {
    "512x512".to_string()
}

/// Default sampling temperature for OpenAI completions
fn default_openai_temperature() -> f32 {
    0.7
}

/// Default max output tokens for OpenAI completions
fn default_openai_max_tokens() -> u32 {
    2048
}

/// Default system directive for completions.
fn default_system_directive() -> String {
    prompts::COMPLETION_SYSTEM_DIRECTIVE.to_string()
}

fn default_socket_mode() -> bool {
    true
}

fn default_port() -> u16 {
    3000
}

fn default_image_command() -> String {
    "/gen_image".to_string()
}

/// Configuration for the gen-bot application.
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub inner: Arc<ConfigInner>,
}

impl Deref for Config {
    type Target = ConfigInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct ConfigInner {
    /// OpenAI API key (`OPENAI_API_KEY`).
    pub openai_api_key: String,
    /// Optional OpenAI organization (`OPENAI_ORG_ID`).
    #[serde(default)]
    pub openai_org_id: Option<String>,
    /// OpenAI model used for mention replies (`OPENAI_COMPLETION_MODEL`).
    #[serde(default = "default_openai_completion_model")]
    pub openai_completion_model: String,
    /// OpenAI model used for image generation (`OPENAI_IMAGE_MODEL`).
    #[serde(default = "default_openai_image_model")]
    pub openai_image_model: String,
    /// Size of generated images (`OPENAI_IMAGE_SIZE`).
    /// One of `256x256`, `512x512`, `1024x1024`, `1792x1024` or `1024x1792`.
    #[serde(default = "default_openai_image_size")]
    pub openai_image_size: String,
    /// Sampling temperature for completions (`OPENAI_TEMPERATURE`).
    /// Value between 0 and 2. Higher values like 0.8 make output more random,
    /// while lower values like 0.2 make it more focused and deterministic.
    #[serde(default = "default_openai_temperature")]
    pub openai_temperature: f32,
    /// Max output tokens for completions (`OPENAI_MAX_TOKENS`).
    #[serde(default = "default_openai_max_tokens")]
    pub openai_max_tokens: u32,
    /// Optional custom system directive to override the default (`SYSTEM_DIRECTIVE`).
    #[serde(default = "default_system_directive")]
    pub system_directive: String,
    /// Slack app-level token used for socket mode (`SLACK_APP_TOKEN`).
    pub slack_app_token: String,
    /// Slack bot token (`SLACK_BOT_TOKEN`).
    pub slack_bot_token: String,
    /// Slack signing secret (`SLACK_SIGNING_SECRET`).
    pub slack_signing_secret: String,
    /// Optional Slack user token (`SLACK_USER_TOKEN`).
    /// Slack only accepts user tokens for `files.sharedPublicURL`; the bot token is used when absent.
    #[serde(default)]
    pub slack_user_token: Option<String>,
    /// Whether to connect through socket mode (`SOCKET_MODE`).
    #[serde(default = "default_socket_mode")]
    pub socket_mode: bool,
    /// Port reserved for OAuth compatibility (`PORT`).
    #[serde(default = "default_port")]
    pub port: u16,
    /// Slash command that triggers image generation (`IMAGE_COMMAND`).
    #[serde(default = "default_image_command")]
    pub image_command: String,
}

impl Config {
    /// Load from the config file, overridden by the process environment.
    pub fn load(explicit_path: Option<&std::path::Path>) -> Res<Self> {
        Self::load_with_env(explicit_path, None)
    }

    /// Load from the config file, overridden by `env` (or the process environment when `None`).
    pub fn load_with_env(explicit_path: Option<&std::path::Path>, env: Option<config::Map<String, String>>) -> Res<Self> {
        let mut cfg = config::Config::builder();

        if let Some(p) = explicit_path {
            cfg = cfg.add_source(config::File::from(p.to_path_buf()));
        } else if std::path::Path::new(".hidden/config.toml").exists() {
            cfg = cfg.add_source(config::File::with_name(".hidden/config.toml"));
        }

        // The environment wins over any file.
        cfg = cfg.add_source(config::Environment::default().source(env));

        let result = Config {
            inner: Arc::new(cfg.build()?.try_deserialize()?),
        };

        result.validate()?;

        Ok(result)
    }

    /// Check value ranges that serde cannot express.
    pub fn validate(&self) -> Res<()> {
        if self.openai_temperature < 0.0 || self.openai_temperature > 2.0 {
            return Err(anyhow::anyhow!("OpenAI temperature must be between 0 and 2."));
        }

        if self.openai_max_tokens < 1 || self.openai_max_tokens > 128000 {
            return Err(anyhow::anyhow!("OpenAI max tokens must be between 1 and 128000."));
        }

        if !self.socket_mode {
            return Err(anyhow::anyhow!("Only socket mode is supported; set `SOCKET_MODE=true`."));
        }

        if !self.image_command.starts_with('/') {
            return Err(anyhow::anyhow!("Image command must start with `/`."));
        }

        Ok(())
    }
}

// Tests.

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn valid_inner() -> ConfigInner {
        ConfigInner {
            openai_api_key: "sk-test".to_string(),
            openai_temperature: default_openai_temperature(),
            openai_max_tokens: default_openai_max_tokens(),
            socket_mode: true,
            port: default_port(),
            image_command: default_image_command(),
            ..Default::default()
        }
    }

    #[test]
    fn test_validate_accepts_defaults() {
        let config = Config { inner: Arc::new(valid_inner()) };

        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_temperature() {
        let config = Config {
            inner: Arc::new(ConfigInner {
                openai_temperature: 2.5,
                ..valid_inner()
            }),
        };

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_max_tokens() {
        let config = Config {
            inner: Arc::new(ConfigInner {
                openai_max_tokens: 0,
                ..valid_inner()
            }),
        };

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_http_mode() {
        let config = Config {
            inner: Arc::new(ConfigInner {
                socket_mode: false,
                ..valid_inner()
            }),
        };

        assert!(config.validate().is_err());
    }

    fn write_config_file(name: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!("gen-bot-{name}-{}.toml", std::process::id()));
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            r#"
openai_api_key = "sk-file"
slack_app_token = "xapp-file"
slack_bot_token = "xoxb-file"
slack_signing_secret = "secret"
"#
        )
        .unwrap();

        path
    }

    #[test]
    fn test_load_from_file_applies_defaults() {
        let path = write_config_file("defaults");

        let config = Config::load_with_env(Some(path.as_path()), Some(config::Map::new())).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(config.slack_bot_token, "xoxb-file");
        assert_eq!(config.openai_image_size, "512x512");
        assert_eq!(config.image_command, "/gen_image");
        assert_eq!(config.port, 3000);
        assert!(config.socket_mode);
        assert_eq!(config.slack_user_token, None);
    }

    #[test]
    fn test_env_overrides_file() {
        let path = write_config_file("env-override");

        let env = config::Map::from([
            ("SLACK_BOT_TOKEN".to_string(), "xoxb-env".to_string()),
            ("OPENAI_IMAGE_SIZE".to_string(), "256x256".to_string()),
        ]);

        let config = Config::load_with_env(Some(path.as_path()), Some(env)).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(config.slack_bot_token, "xoxb-env");
        assert_eq!(config.openai_image_size, "256x256");
        assert_eq!(config.slack_app_token, "xapp-file");
    }

    #[test]
    fn test_load_rejects_invalid_env_value() {
        let path = write_config_file("invalid-env");

        let env = config::Map::from([("OPENAI_TEMPERATURE".to_string(), "3.5".to_string())]);

        let result = Config::load_with_env(Some(path.as_path()), Some(env));
        std::fs::remove_file(&path).unwrap();

        assert!(result.is_err());
    }
}
