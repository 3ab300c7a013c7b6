//! Configuration management for flashcards.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default config directory name.
const CONFIG_DIR_NAME: &str = "flashcards";

/// Public Notion API endpoint.
pub const DEFAULT_API_BASE_URL: &str = "https://api.notion.com";

/// Notion API version sent with every request.
pub const DEFAULT_API_VERSION: &str = "2022-06-28";

/// Environment variables read without the `FLASHCARDS_` prefix.
const RAW_ENV_KEYS: [&str; 2] = ["NOTION_TOKEN", "NOTION_DATABASE_ID"];

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. `NOTION_TOKEN` and `NOTION_DATABASE_ID`
/// 2. Environment variables prefixed with `FLASHCARDS_` (sections split on `__`)
/// 3. TOML config file at `~/.config/flashcards/config.toml`
/// 4. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Remote table configuration.
    pub notion: NotionConfig,
    /// Web server configuration.
    pub server: ServerConfig,
}

/// Remote table configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotionConfig {
    /// Integration token. Required at request time, not at load time.
    pub token: Option<String>,
    /// Identifier of the database holding the flashcards.
    pub database_id: Option<String>,
    /// Base URL of the API, without the `/v1` suffix.
    pub api_base_url: String,
    /// Value of the `Notion-Version` header.
    pub api_version: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

/// Web server configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address the server listens on.
    pub bind_addr: String,
}

impl Default for NotionConfig {
    fn default() -> Self {
        Self {
            token: None,
            database_id: None,
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
            timeout_secs: 30,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:3000".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration with an optional custom config path.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);
        let config: Config = Self::figment(config_file).extract()?;
        config.validate()?;
        Ok(config)
    }

    fn figment(config_file: PathBuf) -> Figment {
        Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(config_file))
            .merge(Env::prefixed("FLASHCARDS_").split("__"))
            .merge(
                Env::raw()
                    .only(&RAW_ENV_KEYS)
                    .map(|key| {
                        key.as_str()
                            .to_ascii_lowercase()
                            .replacen("notion_", "notion.", 1)
                            .into()
                    }),
            )
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(CONFIG_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        if reqwest::Url::parse(&self.notion.api_base_url).is_err() {
            return Err(Error::ConfigValidation {
                message: format!("invalid api_base_url: {}", self.notion.api_base_url),
            });
        }

        if self.notion.timeout_secs == 0 {
            return Err(Error::ConfigValidation {
                message: "timeout_secs must be greater than 0".to_string(),
            });
        }

        self.bind_addr()?;
        Ok(())
    }

    /// The configured database id, if present and not blank.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingDatabaseId`] when no id is configured.
    pub fn database_id(&self) -> Result<&str> {
        non_blank(self.notion.database_id.as_deref()).ok_or(Error::MissingDatabaseId)
    }

    /// The configured API token, if present and not blank.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingToken`] when no token is configured.
    pub fn token(&self) -> Result<&str> {
        non_blank(self.notion.token.as_deref()).ok_or(Error::MissingToken)
    }

    /// Parse the server bind address.
    ///
    /// # Errors
    ///
    /// Returns an error if the address is not a valid socket address.
    pub fn bind_addr(&self) -> Result<SocketAddr> {
        self.server
            .bind_addr
            .parse()
            .map_err(|_| Error::ConfigValidation {
                message: format!("invalid bind_addr: {}", self.server.bind_addr),
            })
    }

    /// Get the request timeout as a Duration.
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.notion.timeout_secs)
    }

    /// A copy of this configuration that is safe to print.
    #[must_use]
    pub fn redacted(&self) -> Self {
        let mut config = self.clone();
        if config.notion.token.is_some() {
            config.notion.token = Some("********".to_string());
        }
        config
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
