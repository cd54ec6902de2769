use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{PlacefindError, Result};

/// Root application configuration, loaded from `~/.config/placefind/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub search: SearchConfig,
    pub ui: UiConfig,
    pub log: LogConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Endpoint of the address autocomplete service. The query is sent as `?search=`.
    pub base_url: String,
    pub debounce_ms: u64,
    pub timeout_secs: u64,
    pub user_agent: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    pub placeholder: String,
    pub max_visible_options: u16,
    pub reveal_ms: u64,
    pub tick_rate_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub level: String,
    pub file: String,
}

// ─── Defaults ──────────────────────────────────────────────

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api-stage.foodibd.com/maps/autocomplete".to_string(),
            debounce_ms: 750,
            timeout_secs: 10,
            user_agent: "placefind/0.1".to_string(),
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            placeholder: "Type anything".to_string(),
            max_visible_options: 8,
            reveal_ms: 200,
            tick_rate_ms: 50,
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        let file = dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("/tmp"))
            .join("placefind")
            .join("placefind.log");

        Self {
            level: "info".to_string(),
            file: file.to_string_lossy().to_string(),
        }
    }
}

impl SearchConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

// ─── Load / Save ───────────────────────────────────────────

impl AppConfig {
    /// Standard config file path: `~/.config/placefind/config.toml`
    pub fn config_path() -> PathBuf {
        if let Ok(path) = std::env::var("PLACEFIND_CONFIG") {
            return PathBuf::from(path);
        }

        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("~/.config"))
            .join("placefind")
            .join("config.toml")
    }

    /// Load config from disk, falling back to defaults if file doesn't exist.
    /// `PLACEFIND_BASE_URL` overrides the configured endpoint.
    pub fn load() -> Result<Self> {
        let path = Self::config_path();
        let mut config = Self::load_from(&path)?;
        if let Ok(url) = std::env::var("PLACEFIND_BASE_URL") {
            config.search.base_url = url;
        }
        config.validate()?;
        Ok(config)
    }

    /// Load config from a specific path.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Save config to a specific path.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let toml_str = toml::to_string_pretty(self)?;
        std::fs::write(path, toml_str)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.search.base_url.trim().is_empty() {
            return Err(PlacefindError::ConfigError(
                "search.base_url must not be empty".to_string(),
            ));
        }
        if self.ui.tick_rate_ms == 0 {
            return Err(PlacefindError::ConfigError(
                "ui.tick_rate_ms must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    // ─── Derived values ────────────────────────────────────

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.search.debounce_ms)
    }

    pub fn tick_rate(&self) -> Duration {
        Duration::from_millis(self.ui.tick_rate_ms)
    }

    pub fn reveal(&self) -> Duration {
        Duration::from_millis(self.ui.reveal_ms)
    }

    pub fn log_path(&self) -> PathBuf {
        PathBuf::from(&self.log.file)
    }
}
