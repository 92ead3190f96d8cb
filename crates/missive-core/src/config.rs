//! Configuration loaded from `config.toml`

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::api::{EnvToken, StaticToken, TokenProvider};
use crate::error::{MissiveError, Result};
use crate::store::TEMPLATES_FILENAME;

pub const DEFAULT_API_BASE: &str = "https://slack.com/api";
pub const DEFAULT_TOKEN_ENV: &str = "SLACK_TOKEN";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct MissiveConfig {
    pub slack: SlackConfig,
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SlackConfig {
    pub api_base: String,
    /// Literal token; takes precedence over `token_env`
    pub token: Option<String>,
    pub token_env: String,
    pub timeout_secs: u64,
}

impl Default for SlackConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            token: None,
            token_env: DEFAULT_TOKEN_ENV.to_string(),
            timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StorageConfig {
    pub templates_path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        let base = dirs::data_dir().unwrap_or_else(|| PathBuf::from("."));
        Self {
            templates_path: base.join("missive").join(TEMPLATES_FILENAME),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

impl MissiveConfig {
    /// `<config_dir>/missive/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("missive").join("config.toml"))
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| MissiveError::Config(format!("{}: {}", path.as_ref().display(), e)))?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let mut config: Self = toml::from_str(content)?;
        config.storage.templates_path = expand_home(&config.storage.templates_path);
        Ok(config)
    }

    /// Load `path` if given, else the default location; a missing default file means defaults
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::from_file(path);
        }

        match Self::default_path() {
            Some(path) if path.exists() => {
                debug!("Loading config from {:?}", path);
                Self::from_file(&path)
            }
            _ => {
                debug!("No config file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    pub fn token_provider(&self) -> Box<dyn TokenProvider> {
        match &self.slack.token {
            Some(token) if !token.trim().is_empty() => Box::new(StaticToken::new(token.clone())),
            _ => Box::new(EnvToken::new(self.slack.token_env.clone())),
        }
    }
}

fn expand_home(path: &Path) -> PathBuf {
    match (path.strip_prefix("~"), dirs::home_dir()) {
        (Ok(rest), Some(home)) => home.join(rest),
        _ => path.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = MissiveConfig::default();
        assert_eq!(config.slack.api_base, DEFAULT_API_BASE);
        assert_eq!(config.slack.token_env, "SLACK_TOKEN");
        assert_eq!(config.slack.timeout_secs, 30);
        assert_eq!(config.logging.level, "warn");
        assert!(config.storage.templates_path.ends_with("missive/slack-templates.json"));
    }

    #[test]
    fn test_partial_file() -> Result<()> {
        let config = MissiveConfig::from_toml(
            r#"
[slack]
token = "xoxp-abc"

[storage]
templates_path = "/tmp/missive/templates.json"
"#,
        )?;

        assert_eq!(config.slack.token.as_deref(), Some("xoxp-abc"));
        assert_eq!(config.slack.api_base, DEFAULT_API_BASE);
        assert_eq!(
            config.storage.templates_path,
            PathBuf::from("/tmp/missive/templates.json")
        );
        assert_eq!(config.token_provider().access_token()?, "xoxp-abc");
        Ok(())
    }

    #[test]
    fn test_home_expansion() -> Result<()> {
        let config = MissiveConfig::from_toml(
            r#"
[storage]
templates_path = "~/missive/templates.json"
"#,
        )?;
        if let Some(home) = dirs::home_dir() {
            assert_eq!(
                config.storage.templates_path,
                home.join("missive/templates.json")
            );
        }
        Ok(())
    }

    #[test]
    fn test_malformed_file() {
        let err = MissiveConfig::from_toml("[slack\napi_base = ").unwrap_err();
        assert!(matches!(err, MissiveError::Config(_)));
    }

    #[test]
    fn test_missing_explicit_file() {
        let err = MissiveConfig::load(Some(Path::new("/definitely/not/here.toml"))).unwrap_err();
        assert!(matches!(err, MissiveError::Config(_)));
    }
}
