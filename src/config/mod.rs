pub mod delay;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::error::ConfigError;

pub use delay::{DelaySettings, DelaySettingsSource, FileDelaySettings};

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,

    /// Port to listen on (0 picks a free port)
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 80,
        }
    }
}

/// Where canned documents and delay settings live
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentConfig {
    /// Directory holding `<identifier>.xml` documents
    pub content_dir: PathBuf,

    /// Delay settings file, re-read on every request
    pub settings_file: PathBuf,

    /// Content type of every response
    pub content_type: String,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            content_dir: PathBuf::from("SiteContent"),
            settings_file: PathBuf::from("ListenerSettings.xml"),
            content_type: "text/xml".to_string(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level
    pub level: String,

    /// Whether to log in JSON format
    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
        }
    }
}

/// Main listener configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Server configuration
    pub server: ServerConfig,

    /// Content configuration
    pub content: ContentConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

impl ListenerConfig {
    /// Check the values that cannot be defaulted away
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.host.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "server.host must not be empty".to_string(),
            ));
        }

        if self.content.content_type.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "content.content_type must not be empty".to_string(),
            ));
        }

        Ok(())
    }
}

/// Configuration manager trait
#[async_trait]
pub trait ConfigManager: Send + Sync {
    /// Get the current configuration
    async fn get_config(&self) -> ListenerConfig;

    /// Load configuration from a JSON file
    async fn load_from_file<P: AsRef<Path> + Send>(&self, path: P) -> Result<(), ConfigError>;

    /// Save configuration to a JSON file
    async fn save_to_file<P: AsRef<Path> + Send>(&self, path: P) -> Result<(), ConfigError>;

    /// Update configuration
    async fn update_config(&self, config: ListenerConfig) -> Result<(), ConfigError>;
}

/// Basic implementation of the ConfigManager
pub struct BasicConfigManager {
    config: Arc<RwLock<ListenerConfig>>,
}

impl BasicConfigManager {
    /// Create a new BasicConfigManager with default configuration
    pub fn new() -> Self {
        Self {
            config: Arc::new(RwLock::new(ListenerConfig::default())),
        }
    }
}

impl Default for BasicConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ConfigManager for BasicConfigManager {
    async fn get_config(&self) -> ListenerConfig {
        self.config.read().await.clone()
    }

    async fn load_from_file<P: AsRef<Path> + Send>(&self, path: P) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let text = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| ConfigError::LoadError(format!("{}: {}", path.display(), e)))?;

        let config: ListenerConfig = serde_json::from_str(&text)
            .map_err(|e| ConfigError::LoadError(format!("{}: {}", path.display(), e)))?;

        self.update_config(config).await?;
        tracing::info!("Loaded configuration from {}", path.display());
        Ok(())
    }

    async fn save_to_file<P: AsRef<Path> + Send>(&self, path: P) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let config = self.get_config().await;
        let text = serde_json::to_string_pretty(&config)
            .map_err(|e| ConfigError::SaveError(e.to_string()))?;

        tokio::fs::write(path, text)
            .await
            .map_err(|e| ConfigError::SaveError(format!("{}: {}", path.display(), e)))
    }

    async fn update_config(&self, config: ListenerConfig) -> Result<(), ConfigError> {
        config.validate()?;

        let mut current_config = self.config.write().await;
        *current_config = config;
        Ok(())
    }
}
