//! Configuration management for the CLI.

use crate::error::{CliError, Result};
use async_trait::async_trait;
use notetype_domain::{Settings, SettingsStore};
use notetype_llm::yandex::DEFAULT_TIMEOUT_SECS;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info};

/// CLI configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Credentials for the completion service
    #[serde(default)]
    pub settings: Settings,

    /// HTTP client settings
    #[serde(default)]
    pub client: ClientSettings,

    /// Output settings
    #[serde(default)]
    pub output: OutputSettings,
}

/// HTTP client settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientSettings {
    /// Request timeout in seconds, 0 to wait indefinitely
    #[serde(default = "default_timeout_secs")]
    pub request_timeout_secs: u64,
}

/// Output settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputSettings {
    /// Enable colored output
    #[serde(default = "default_true")]
    pub color: bool,

    /// Default output format
    #[serde(default = "default_format")]
    pub format: OutputFormat,
}

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable messages and tables
    Table,
    /// JSON format
    Json,
    /// Quiet (minimal) format
    Quiet,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            "quiet" => Ok(OutputFormat::Quiet),
            _ => Err(format!("Invalid output format: {}", s)),
        }
    }
}

/// A configuration key that `settings set` can change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ConfigKey {
    /// settings.bearer_token
    BearerToken,
    /// settings.folder_id
    FolderId,
    /// client.request_timeout_secs
    RequestTimeoutSecs,
    /// output.color
    Color,
    /// output.format
    Format,
}

impl ConfigKey {
    /// Whether the key is one of the saved credentials.
    pub fn is_credential(&self) -> bool {
        matches!(self, ConfigKey::BearerToken | ConfigKey::FolderId)
    }
}

/// Credentials given with `--token`/`--folder-id` or their environment variables.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CredentialOverrides {
    /// Replacement bearer token
    pub bearer_token: Option<String>,
    /// Replacement folder id
    pub folder_id: Option<String>,
}

impl CredentialOverrides {
    /// Whether no credential was given.
    pub fn is_empty(&self) -> bool {
        self.bearer_token.is_none() && self.folder_id.is_none()
    }

    /// Replace the given credentials in `settings`.
    pub fn apply(&self, settings: &mut Settings) -> Result<()> {
        if let Some(token) = &self.bearer_token {
            set_credential(settings, ConfigKey::BearerToken, token)?;
        }
        if let Some(folder_id) = &self.folder_id {
            set_credential(settings, ConfigKey::FolderId, folder_id)?;
        }
        Ok(())
    }
}

/// Set a credential key on `settings`.
pub fn set_credential(settings: &mut Settings, key: ConfigKey, value: &str) -> Result<()> {
    match key {
        ConfigKey::BearerToken => settings.bearer_token = non_empty(value, "bearer-token")?,
        ConfigKey::FolderId => settings.folder_id = non_empty(value, "folder-id")?,
        other => {
            return Err(CliError::InvalidInput(format!(
                "{:?} is not a credential",
                other
            )))
        }
    }
    Ok(())
}

impl Config {
    /// Get the default configuration file path.
    pub fn default_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| CliError::Config("Could not find home directory".into()))?;
        Ok(home.join(".notetype").join("config.toml"))
    }

    /// Parse configuration from TOML text.
    pub fn from_toml(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Serialize configuration to TOML text.
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Request timeout, `None` when disabled.
    pub fn request_timeout(&self) -> Option<Duration> {
        match self.client.request_timeout_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }

    /// Set one key from its string value.
    pub fn set(&mut self, key: ConfigKey, value: &str) -> Result<()> {
        match key {
            ConfigKey::BearerToken | ConfigKey::FolderId => {
                set_credential(&mut self.settings, key, value)?
            }
            ConfigKey::RequestTimeoutSecs => {
                self.client.request_timeout_secs = value.trim().parse().map_err(|_| {
                    CliError::InvalidInput(format!("'{}' is not a number of seconds", value))
                })?
            }
            ConfigKey::Color => {
                self.output.color = value.trim().parse().map_err(|_| {
                    CliError::InvalidInput(format!("'{}' is not true or false", value))
                })?
            }
            ConfigKey::Format => {
                self.output.format = value.parse().map_err(CliError::InvalidInput)?
            }
        }
        Ok(())
    }
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            color: true,
            format: OutputFormat::Table,
        }
    }
}

/// Config file storage.
///
/// Also serves as the [`SettingsStore`] for the credentials section.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    /// Create a store for the file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Create a store for `path`, or for the default location.
    pub fn open(path: Option<PathBuf>) -> Result<Self> {
        match path {
            Some(path) => Ok(Self::new(path)),
            None => Ok(Self::new(Config::default_path()?)),
        }
    }

    /// Get the configuration file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load configuration, writing defaults if the file does not exist.
    pub async fn load_or_init(&self) -> Result<Config> {
        if tokio::fs::try_exists(&self.path).await? {
            let contents = tokio::fs::read_to_string(&self.path).await?;
            debug!(path = %self.path.display(), "Loaded configuration");
            Config::from_toml(&contents)
        } else {
            let config = Config::default();
            self.save_config(&config).await?;
            info!(path = %self.path.display(), "Created default configuration");
            Ok(config)
        }
    }

    /// Save configuration to file.
    pub async fn save_config(&self, config: &Config) -> Result<()> {
        // Create parent directory if it doesn't exist
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        tokio::fs::write(&self.path, config.to_toml()?).await?;
        Ok(())
    }
}

#[async_trait]
impl SettingsStore for ConfigStore {
    type Error = CliError;

    async fn load(&self) -> Result<Settings> {
        Ok(self.load_or_init().await?.settings)
    }

    async fn save(&self, settings: &Settings) -> Result<()> {
        let mut config = self.load_or_init().await?;
        config.settings = settings.clone();
        self.save_config(&config).await
    }
}

fn non_empty(value: &str, name: &str) -> Result<String> {
    if value.trim().is_empty() {
        return Err(CliError::InvalidInput(format!("{} must not be empty", name)));
    }
    Ok(value.to_string())
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_true() -> bool {
    true
}

fn default_format() -> OutputFormat {
    OutputFormat::Table
}
