//! Configuration management.
//!
//! Settings come from an optional TOML file plus `CITATION_FETCHER_*`
//! environment variables (`__` separates sections), falling back to
//! defaults for anything unset.
//!
//! ```toml
//! [http]
//! base_url = "https://citation.crosscite.org"
//! timeout_secs = 30
//! connect_timeout_secs = 10
//!
//! [citation]
//! style = "apa"
//! lang = "en-US"
//! duplicate_keys = "last-wins"
//!
//! [output]
//! path = "citations.csv"
//! ```
//!
//! ```bash
//! export CITATION_FETCHER_CITATION__STYLE=vancouver
//! export CITATION_FETCHER_HTTP__TIMEOUT_SECS=60
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::models::CitationStyle;
use crate::pipeline::DuplicateKeyPolicy;
use crate::sources::{CROSSCITE_API_BASE, DEFAULT_LANG};

/// Prefix of environment overrides
pub const ENV_PREFIX: &str = "CITATION_FETCHER";

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// HTTP settings
    #[serde(default)]
    pub http: HttpConfig,

    /// Citation settings
    #[serde(default)]
    pub citation: CitationConfig,

    /// Output settings
    #[serde(default)]
    pub output: OutputConfig,
}

/// HTTP configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Base URL of the citation formatting service
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Connect timeout in seconds
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    /// User agent override
    #[serde(default)]
    pub user_agent: Option<String>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
            user_agent: None,
        }
    }
}

impl HttpConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

fn default_base_url() -> String {
    CROSSCITE_API_BASE.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_connect_timeout_secs() -> u64 {
    10
}

/// Citation configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CitationConfig {
    /// Style applied to every DOI
    #[serde(default)]
    pub style: CitationStyle,

    /// Locale sent to the service
    #[serde(default = "default_lang")]
    pub lang: String,

    /// How repeated keys of the repair table are applied
    #[serde(default)]
    pub duplicate_keys: DuplicateKeyPolicy,
}

impl Default for CitationConfig {
    fn default() -> Self {
        Self {
            style: CitationStyle::default(),
            lang: default_lang(),
            duplicate_keys: DuplicateKeyPolicy::default(),
        }
    }
}

fn default_lang() -> String {
    DEFAULT_LANG.to_string()
}

/// Output configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Where the CSV export is written
    #[serde(default = "default_output_path")]
    pub path: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: default_output_path(),
        }
    }
}

fn default_output_path() -> PathBuf {
    PathBuf::from(crate::io::DEFAULT_FILENAME)
}

impl Config {
    /// Serialize to TOML
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Save configuration to a TOML file
    pub fn save(&self, path: &Path) -> Result<(), ConfigFileError> {
        let content = self
            .to_toml()
            .map_err(|e| ConfigFileError::Serialize(e.to_string()))?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| ConfigFileError::Io(e.to_string()))?;
        }
        std::fs::write(path, content).map_err(|e| ConfigFileError::Io(e.to_string()))
    }
}

/// Configuration file errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigFileError {
    #[error("IO error: {0}")]
    Io(String),

    #[error("Serialize error: {0}")]
    Serialize(String),
}

fn environment() -> config::Environment {
    config::Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}

/// Load configuration from a file, with environment overrides
pub fn load_config(path: &Path) -> Result<Config, config::ConfigError> {
    let settings = config::Config::builder()
        .add_source(config::File::from(path))
        .add_source(environment())
        .build()?;

    settings.try_deserialize()
}

/// Get the configuration from environment variables and defaults
pub fn get_config() -> Result<Config, config::ConfigError> {
    config::Config::builder()
        .add_source(environment())
        .build()?
        .try_deserialize()
}

/// Locate a configuration file in the usual places
///
/// Looks for `./citation-fetcher.toml`, then
/// `<config dir>/citation-fetcher/config.toml`.
pub fn find_config_file() -> Option<PathBuf> {
    let local = PathBuf::from("citation-fetcher.toml");
    if local.is_file() {
        return Some(local);
    }

    dirs::config_dir()
        .map(|dir| dir.join("citation-fetcher").join("config.toml"))
        .filter(|path| path.is_file())
}
