use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::enrich::{DEFAULT_OEMBED_ENDPOINT, OEmbedClient};
use crate::youtube::{DEFAULT_MAX_RESULTS, DEFAULT_SEARCH_ENDPOINT, VideoSearchClient};

pub const API_KEY_ENV: &str = "BRAINPOCKET_YOUTUBE_API_KEY";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BrainpocketConfig {
    pub database: PathBuf,
    pub seed_demo: bool,
    pub youtube: YoutubeConfig,
}

impl Default for BrainpocketConfig {
    fn default() -> Self {
        Self {
            database: default_database_path(),
            seed_demo: true,
            youtube: YoutubeConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct YoutubeConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    pub oembed_endpoint: String,
    pub search_endpoint: String,
    pub timeout_secs: u64,
    pub max_results: u32,
}

impl Default for YoutubeConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            oembed_endpoint: DEFAULT_OEMBED_ENDPOINT.to_string(),
            search_endpoint: DEFAULT_SEARCH_ENDPOINT.to_string(),
            timeout_secs: 10,
            max_results: DEFAULT_MAX_RESULTS,
        }
    }
}

impl YoutubeConfig {
    /// API key from the file, falling back to the environment
    pub fn resolved_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .filter(|k| !k.is_empty())
            .or_else(|| std::env::var(API_KEY_ENV).ok().filter(|k| !k.is_empty()))
    }

    pub fn oembed_client(&self) -> OEmbedClient {
        OEmbedClient::new(&self.oembed_endpoint, Duration::from_secs(self.timeout_secs))
    }

    pub fn search_client(&self) -> VideoSearchClient {
        VideoSearchClient::new(self.resolved_api_key())
            .with_endpoint(&self.search_endpoint)
            .with_max_results(self.max_results)
            .with_timeout(Duration::from_secs(self.timeout_secs))
    }
}

pub fn default_config_path() -> PathBuf {
    PathBuf::from("brainpocket.toml")
}

pub fn default_database_path() -> PathBuf {
    PathBuf::from("brainpocket.db")
}

/// Load the config file. A missing file yields defaults.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<BrainpocketConfig> {
    let path = path.map(Path::to_path_buf).unwrap_or_else(default_config_path);
    if !path.exists() {
        return Ok(BrainpocketConfig::default());
    }

    let contents = std::fs::read_to_string(&path)?;
    let config: BrainpocketConfig = toml::from_str(&contents)?;
    Ok(config)
}

pub fn write_config(path: &Path, config: &BrainpocketConfig, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        anyhow::bail!("config already exists at {} (use --force to overwrite)", path.display());
    }

    let contents = toml::to_string_pretty(config)?;
    std::fs::write(path, contents)?;
    Ok(())
}
