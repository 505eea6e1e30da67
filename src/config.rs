//! Configuration for stores, providers and repair

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::resolver::DEFAULT_BATCH_SIZE;

fn default_timeout_secs() -> u64 {
    30
}

fn default_max_upload_bytes() -> u64 {
    10 * 1024 * 1024
}

fn default_folder_prefix() -> String {
    "gallery".to_string()
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_batch_size() -> usize {
    DEFAULT_BATCH_SIZE
}

/// Remote provider settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Service endpoint
    pub base_url: String,
    /// Per-call deadline in seconds; a timed-out call is a full failure
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Payloads above this size are refused before any upload starts
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            timeout_secs: default_timeout_secs(),
            max_upload_bytes: default_max_upload_bytes(),
        }
    }
}

impl ProviderConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Root configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GalleryConfig {
    #[serde(default)]
    pub provider: ProviderConfig,
    /// Provider folder prefix; uploads land in `{prefix}/{category}`
    #[serde(default = "default_folder_prefix")]
    pub folder_prefix: String,
    /// Directory holding the flat JSON collections
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Projects loaded per reference-repair batch
    #[serde(default = "default_batch_size")]
    pub repair_batch_size: usize,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            provider: ProviderConfig::default(),
            folder_prefix: default_folder_prefix(),
            data_dir: default_data_dir(),
            repair_batch_size: default_batch_size(),
        }
    }
}

impl GalleryConfig {
    /// Load configuration from a TOML file
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: GalleryConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sensible() {
        let config = GalleryConfig::default();
        assert_eq!(config.folder_prefix, "gallery");
        assert_eq!(config.repair_batch_size, DEFAULT_BATCH_SIZE);
        assert_eq!(config.provider.timeout(), Duration::from_secs(30));
    }

    #[test]
    fn partial_toml_fills_in_defaults() {
        let config: GalleryConfig = toml::from_str(
            r#"
            folder_prefix = "remodel"

            [provider]
            base_url = "https://media.example.com"
            timeout_secs = 5
            "#,
        )
        .unwrap();
        assert_eq!(config.folder_prefix, "remodel");
        assert_eq!(config.provider.base_url, "https://media.example.com");
        assert_eq!(config.provider.timeout(), Duration::from_secs(5));
        assert_eq!(config.provider.max_upload_bytes, 10 * 1024 * 1024);
        assert_eq!(config.data_dir, PathBuf::from("data"));
    }

    #[test]
    fn round_trips_through_file() {
        let dir = std::env::temp_dir().join(format!("gallery_config_test_{}", uuid::Uuid::new_v4()));
        let path = dir.join("gallery.toml");

        let mut config = GalleryConfig::default();
        config.provider.base_url = "https://media.example.com".to_string();
        config.save_to(&path).unwrap();

        let loaded = GalleryConfig::load_from(&path).unwrap();
        assert_eq!(loaded.provider.base_url, config.provider.base_url);

        std::fs::remove_dir_all(&dir).ok();
    }
}
