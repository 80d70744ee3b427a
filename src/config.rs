use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};
use tracing::debug;

/// One tracked ticker. `provider` is the preferred feed by name; anything
/// unrecognized falls back to the default feed at resolve time.
/// `provider_symbol` overrides the symbol in the preferred feed's namespace.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct InvestmentTarget {
    pub ticker: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub provider: Option<String>,
    #[serde(default)]
    pub provider_symbol: Option<String>,
    #[serde(default)]
    pub order: Option<i64>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct StooqProviderConfig {
    pub base_url: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AlphaVantageProviderConfig {
    pub base_url: String,
    #[serde(default = "default_api_key")]
    pub api_key: String,
}

fn default_api_key() -> String {
    "demo".to_string()
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ProvidersConfig {
    pub stooq: Option<StooqProviderConfig>,
    pub alphavantage: Option<AlphaVantageProviderConfig>,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        ProvidersConfig {
            stooq: Some(StooqProviderConfig {
                base_url: "https://stooq.com".to_string(),
            }),
            alphavantage: Some(AlphaVantageProviderConfig {
                base_url: "https://www.alphavantage.co".to_string(),
                api_key: default_api_key(),
            }),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    pub investments: Vec<InvestmentTarget>,
    #[serde(default)]
    pub providers: ProvidersConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("io", "sixmo", "sixmo")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn default_data_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("io", "sixmo", "sixmo")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.data_dir().to_path_buf())
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }

    pub fn stooq_base_url(&self) -> &str {
        self.providers
            .stooq
            .as_ref()
            .map_or("https://stooq.com", |p| p.base_url.as_str())
    }

    pub fn alphavantage_base_url(&self) -> &str {
        self.providers
            .alphavantage
            .as_ref()
            .map_or("https://www.alphavantage.co", |p| p.base_url.as_str())
    }

    pub fn alphavantage_api_key(&self) -> &str {
        self.providers
            .alphavantage
            .as_ref()
            .map_or("demo", |p| p.api_key.as_str())
    }
}
