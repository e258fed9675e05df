//! Application configuration
//!
//! Handles loading the optional config.json. Every field has a default, so
//! running without the file gives the stock iTunes endpoint and timings.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::sync::OnceLock;
use std::time::Duration;
use thiserror::Error;

use crate::api::MediaType;

/// Global application config
static APP_CONFIG: OnceLock<AppConfig> = OnceLock::new();

/// Get the global application config
pub fn get_config() -> &'static AppConfig {
    APP_CONFIG.get_or_init(AppConfig::load)
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Root application configuration
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub itunes: ItunesConfig,
    #[serde(default)]
    pub gallery: GalleryConfig,
}

/// Search endpoint settings
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ItunesConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_endpoint() -> String {
    "https://itunes.apple.com/search".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for ItunesConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Gallery and slideshow settings
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct GalleryConfig {
    #[serde(default = "default_slideshow_interval_ms")]
    pub slideshow_interval_ms: u64,
    /// Number of threads downloading artwork per search
    #[serde(default = "default_image_loaders")]
    pub image_loaders: usize,
    /// Media type preselected in the dropdown
    #[serde(default = "default_media")]
    pub default_media: String,
}

fn default_slideshow_interval_ms() -> u64 {
    2000
}

fn default_image_loaders() -> usize {
    8
}

fn default_media() -> String {
    MediaType::default().as_str().to_string()
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            slideshow_interval_ms: default_slideshow_interval_ms(),
            image_loaders: default_image_loaders(),
            default_media: default_media(),
        }
    }
}

impl GalleryConfig {
    pub fn slideshow_interval(&self) -> Duration {
        Duration::from_millis(self.slideshow_interval_ms.max(1))
    }

    pub fn image_loaders(&self) -> usize {
        self.image_loaders.max(1)
    }

    /// Configured default media type, falling back to music
    pub fn default_media(&self) -> MediaType {
        MediaType::parse(&self.default_media).unwrap_or_else(|| {
            log::warn!(
                "Unknown default_media '{}' in config, using {}",
                self.default_media,
                MediaType::default()
            );
            MediaType::default()
        })
    }
}

impl AppConfig {
    /// Load configuration from config.json
    pub fn load() -> Self {
        // Try to load from current directory first
        match Self::load_from_path("config.json") {
            Ok(config) => {
                log::info!("Loaded config from ./config.json");
                return config;
            }
            Err(ConfigError::Parse(e)) => {
                log::warn!("Ignoring malformed ./config.json: {}", e);
            }
            Err(ConfigError::Io(_)) => {}
        }

        // Try to load from executable directory
        if let Ok(exe_path) = std::env::current_exe() {
            if let Some(exe_dir) = exe_path.parent() {
                let config_path = exe_dir.join("config.json");
                if let Ok(config) = Self::load_from_path(&config_path) {
                    log::info!("Loaded config from {}", config_path.display());
                    return config;
                }
            }
        }

        log::info!("No config.json found, using defaults");
        Self::default()
    }

    pub fn load_from_path(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let content = fs::read_to_string(&path)?;
        let config: AppConfig = serde_json::from_str(&content)?;
        Ok(config)
    }
}
