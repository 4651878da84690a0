use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

use crate::search::CrossSourceDedup;

/// Main application configuration
#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    /// Page fetcher settings
    #[serde(default)]
    pub fetch: FetchConfig,
    /// History store settings
    #[serde(default)]
    pub history: HistoryConfig,
    /// Search orchestration settings
    #[serde(default)]
    pub search: SearchConfig,
    /// Recipe source settings
    #[serde(default)]
    pub sources: SourcesConfig,
}

/// Configuration for the page fetcher
#[derive(Debug, Deserialize, Clone)]
pub struct FetchConfig {
    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Delay before every request in milliseconds
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,
    /// User-Agent header sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            delay_ms: default_delay_ms(),
            user_agent: default_user_agent(),
        }
    }
}

impl FetchConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

/// Configuration for the cooking history
#[derive(Debug, Deserialize, Clone)]
pub struct HistoryConfig {
    /// Location of the history document
    #[serde(default = "default_history_path")]
    pub path: PathBuf,
    /// Maximum number of entries kept
    #[serde(default = "default_max_entries")]
    pub max_entries: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            path: default_history_path(),
            max_entries: default_max_entries(),
        }
    }
}

/// Configuration for the search orchestrator
#[derive(Debug, Deserialize, Clone)]
pub struct SearchConfig {
    /// Result cap used when the caller does not pass one
    #[serde(default = "default_max_results")]
    pub max_results: usize,
    /// How results from different sources are deduplicated
    #[serde(default)]
    pub cross_source_dedup: CrossSourceDedup,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_results: default_max_results(),
            cross_source_dedup: CrossSourceDedup::default(),
        }
    }
}

/// Base URLs of the supported recipe sites
#[derive(Debug, Deserialize, Clone)]
pub struct SourcesConfig {
    #[serde(default = "default_allrecipes_base_url")]
    pub allrecipes_base_url: String,
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            allrecipes_base_url: default_allrecipes_base_url(),
        }
    }
}

// Default value functions
fn default_timeout_secs() -> u64 {
    10
}

fn default_delay_ms() -> u64 {
    500
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36".to_string()
}

fn default_history_path() -> PathBuf {
    PathBuf::from("recipe_history.json")
}

fn default_max_entries() -> usize {
    50
}

fn default_max_results() -> usize {
    10
}

fn default_allrecipes_base_url() -> String {
    "https://www.allrecipes.com".to_string()
}

impl AppConfig {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded with the following priority (highest to lowest):
    /// 1. Environment variables with DISH__ prefix
    /// 2. dish-it-out.toml file in current directory
    /// 3. Default values
    ///
    /// Environment variable format: DISH__HISTORY__PATH
    pub fn load() -> Result<Self, ConfigError> {
        load_config()
    }
}

/// Load configuration from file and environment variables
///
/// See [`AppConfig::load`] for the source priority.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    let settings = Config::builder()
        // Optional config file (can be missing)
        .add_source(File::with_name("dish-it-out").required(false))
        // Use double underscore for nested: DISH__FETCH__DELAY_MS
        .add_source(
            Environment::with_prefix("DISH")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    settings.try_deserialize()
}
