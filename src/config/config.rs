use crate::content::Region;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variable that overrides `provider.api_key`
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub provider: ProviderConfig,
    pub display: DisplayConfig,
    pub behavior: BehaviorConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// API key; the environment variable takes precedence when set
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Model used for all three content categories
    pub model: String,

    /// Base URL of the generative language API
    pub base_url: String,

    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Use Unicode glyphs for insight icons and status markers
    pub use_glyphs: bool,

    /// Seconds between loading message changes
    pub loading_message_interval_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BehaviorConfig {
    /// Region preselected on the entry screen, by label
    pub default_region: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            provider: ProviderConfig::default(),
            display: DisplayConfig::default(),
            behavior: BehaviorConfig::default(),
        }
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: "gemini-3-flash-preview".to_string(),
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            request_timeout_secs: 60,
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            use_glyphs: true,
            loading_message_interval_secs: 5,
        }
    }
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        Self {
            default_region: Region::World.label().to_string(),
        }
    }
}

impl ProviderConfig {
    /// The key to use: environment first, then the config file
    pub fn resolved_api_key(&self) -> Option<String> {
        std::env::var(API_KEY_ENV)
            .ok()
            .or_else(|| self.api_key.clone())
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
    }
}

impl BehaviorConfig {
    /// Falls back to `World` for an unknown label
    pub fn default_region(&self) -> Region {
        Region::from_label(&self.default_region).unwrap_or_else(|e| {
            warn!(target: "config", "{}; using {}", e, Region::World);
            Region::World
        })
    }
}

impl Config {
    /// Load config from the default location
    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;

        if !config_path.exists() {
            // Create default config if it doesn't exist
            let default_config = Self::default();
            default_config.save()?;
            info!(target: "config", "Created default config at {}", config_path.display());
            return Ok(default_config);
        }

        Self::load_from(&config_path)
    }

    /// Load config from an explicit path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        info!(target: "config", "Loaded config from {}", path.display());
        Ok(config)
    }

    /// Save config to the default location
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::get_config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents)?;

        Ok(())
    }

    /// Get the default config file path
    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

        Ok(config_dir.join("industry-lens").join("config.toml"))
    }

    /// Create a default config file with comments
    pub fn create_default_with_comments() -> String {
        r#"# Industry Lens Configuration File
# Location: ~/.config/industry-lens/config.toml (Linux)
#           ~/Library/Application Support/industry-lens/config.toml (macOS)
#           %APPDATA%\industry-lens\config.toml (Windows)

[provider]
# API key for the Gemini API. The GEMINI_API_KEY environment variable wins when set.
# api_key = "your-key"

# Model used for insights, news and quiz generation
model = "gemini-3-flash-preview"

# Base URL of the generative language API
base_url = "https://generativelanguage.googleapis.com/v1beta"

# Give up on a single request after this many seconds
request_timeout_secs = 60

[display]
# Use Unicode glyphs for icons. Set to false for ASCII-only terminals.
use_glyphs = true

# Seconds between loading message changes while insights are fetched
loading_message_interval_secs = 5

[behavior]
# Region selected when the app starts. One of:
# World, United States, United Kingdom, Canada, Australia, India, Germany,
# France, Japan, China, Brazil, Singapore, UAE
default_region = "World"
"#
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.display.use_glyphs);
        assert_eq!(config.behavior.default_region(), Region::World);
        assert!(config.provider.api_key.is_none());
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let toml_str = toml::to_string(&config).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(config.provider.model, parsed.provider.model);
        assert_eq!(
            config.display.loading_message_interval_secs,
            parsed.display.loading_message_interval_secs
        );
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let parsed: Config = toml::from_str("[behavior]\ndefault_region = \"india\"\n").unwrap();
        assert_eq!(parsed.behavior.default_region(), Region::India);
        assert_eq!(parsed.provider.request_timeout_secs, 60);
    }

    #[test]
    fn test_unknown_region_falls_back() {
        let behavior = BehaviorConfig {
            default_region: "Mars".to_string(),
        };
        assert_eq!(behavior.default_region(), Region::World);
    }

    #[test]
    fn test_commented_template_parses() {
        let parsed: Config = toml::from_str(&Config::create_default_with_comments()).unwrap();
        assert_eq!(parsed.provider.model, ProviderConfig::default().model);
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let mut config = Config::default();
        config.display.use_glyphs = false;
        config.provider.api_key = Some("abc".to_string());
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert!(!loaded.display.use_glyphs);
        assert_eq!(loaded.provider.api_key.as_deref(), Some("abc"));
    }
}
