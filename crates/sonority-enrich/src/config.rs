use anyhow::{Context, Result};
use confyg::{env, Confygery};
use reqwest::Client;
use serde::{de, Deserialize, Deserializer, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::error::EnrichResult;

pub const MUSICBRAINZ_API_BASE: &str = "https://musicbrainz.org/ws/2";
pub const DEEZER_API_BASE: &str = "https://api.deezer.com";

const DEFAULT_USER_AGENT: &str = "sonority/0.1.0 (https://github.com/oxur/sonority)";

/// Configuration for sonority.
///
/// Configuration is loaded from multiple sources with the following priority:
/// 1. CLI arguments (highest priority)
/// 2. Environment variables (SONO_* prefix)
/// 3. Config file (~/.config/sonority/config.toml)
/// 4. Built-in defaults (lowest priority)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Path to the catalog artifact (JSON array of `{title, artist}` rows).
    ///
    /// Can be set via:
    /// - CLI: --catalog /path/to/catalog.json
    /// - ENV: SONO_CATALOG_PATH
    /// - Default: ~/.local/share/sonority/catalog.json
    pub catalog_path: PathBuf,

    /// Path to the similarity matrix artifact (JSON N×N array).
    ///
    /// Can be set via:
    /// - CLI: --similarity /path/to/similarity.json
    /// - ENV: SONO_SIMILARITY_PATH
    /// - Default: ~/.local/share/sonority/similarity.json
    pub similarity_path: PathBuf,

    /// How many recommendations to return per selection.
    #[serde(deserialize_with = "from_str_or_native")]
    pub recommendation_count: usize,

    /// Whether to look up metadata and cover art for recommendations.
    #[serde(deserialize_with = "from_str_or_native")]
    pub enrich: bool,

    /// Base URL of the MusicBrainz web service.
    pub musicbrainz_url: String,

    /// Base URL of the Deezer API.
    pub deezer_url: String,

    /// User-Agent sent with every request. MusicBrainz rejects anonymous
    /// clients.
    pub user_agent: String,

    /// Per-request timeout in seconds.
    #[serde(deserialize_with = "from_str_or_native")]
    pub timeout_secs: u64,

    /// Extra attempts for transient lookup failures. Zero means a single
    /// attempt.
    #[serde(deserialize_with = "from_str_or_native")]
    pub retries: usize,

    pub logging: LoggingConfig,
}

/// Logger settings applied at startup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// One of `trace`, `debug`, `info`, `warn`, `error`.
    pub level: String,
    #[serde(deserialize_with = "from_str_or_native")]
    pub coloured: bool,
    #[serde(deserialize_with = "from_str_or_native")]
    pub report_caller: bool,
}

/// Accept either a native TOML value or its string form.
///
/// Environment overrides reach the deserializer as strings, so
/// `SONO_RETRIES=2` arrives as `"2"` while the config file gives `2`.
fn from_str_or_native<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + FromStr,
    T::Err: fmt::Display,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StrOrNative<V> {
        Native(V),
        Str(String),
    }

    match StrOrNative::<T>::deserialize(deserializer)? {
        StrOrNative::Native(value) => Ok(value),
        StrOrNative::Str(text) => text
            .trim()
            .to_ascii_lowercase()
            .parse()
            .map_err(|e| de::Error::custom(format!("invalid value {text:?}: {e}"))),
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            coloured: true,
            report_caller: false,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            catalog_path: default_data_path("catalog.json"),
            similarity_path: default_data_path("similarity.json"),
            recommendation_count: sonority_core::DEFAULT_RECOMMENDATION_COUNT,
            enrich: true,
            musicbrainz_url: MUSICBRAINZ_API_BASE.to_string(),
            deezer_url: DEEZER_API_BASE.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_secs: 30,
            retries: 0,
            logging: LoggingConfig::default(),
        }
    }
}

/// Connection settings shared by the HTTP clients.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSettings {
    pub base_url: String,
    pub user_agent: String,
    pub timeout: Duration,
    pub retries: usize,
    pub requests_per_second: u32,
}

impl ClientSettings {
    /// Build a `reqwest` client with this user agent and timeout.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be created.
    pub fn http_client(&self) -> EnrichResult<Client> {
        Ok(Client::builder()
            .timeout(self.timeout)
            .user_agent(self.user_agent.as_str())
            .build()?)
    }

    /// Base URL without a trailing slash.
    pub(crate) fn base(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }
}

impl Config {
    /// Load configuration from file and environment variables.
    ///
    /// Searches for config file at: ~/.config/sonority/config.toml
    /// Reads environment variables with SONO_ prefix.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed.
    pub fn load() -> Result<Self> {
        let config_path = config_file_path();

        let mut builder = Confygery::new().context("Failed to create config builder")?;

        if config_path.exists() {
            let path_str = config_path
                .to_str()
                .ok_or_else(|| anyhow::anyhow!("Config path contains invalid UTF-8"))?;
            builder
                .add_file(path_str)
                .context("Failed to load config file")?;
        }

        let mut env_opts = env::Options::with_top_level("sono");
        env_opts.add_section("logging");
        builder
            .add_env(env_opts)
            .context("Failed to load environment variables")?;

        let config: Self = builder.build().context("Failed to build configuration")?;

        Ok(config)
    }

    /// Override artifact paths given on the command line.
    #[must_use]
    pub fn with_artifact_paths(
        mut self,
        catalog_path: Option<PathBuf>,
        similarity_path: Option<PathBuf>,
    ) -> Self {
        if let Some(path) = catalog_path {
            self.catalog_path = path;
        }
        if let Some(path) = similarity_path {
            self.similarity_path = path;
        }
        self
    }

    /// MusicBrainz allows one request per second per client.
    #[must_use]
    pub fn musicbrainz_settings(&self) -> ClientSettings {
        self.client_settings(&self.musicbrainz_url, 1)
    }

    /// Deezer allows 50 requests per 5 seconds; stay well under it.
    #[must_use]
    pub fn deezer_settings(&self) -> ClientSettings {
        self.client_settings(&self.deezer_url, 5)
    }

    fn client_settings(&self, base_url: &str, requests_per_second: u32) -> ClientSettings {
        ClientSettings {
            base_url: base_url.to_string(),
            user_agent: self.user_agent.clone(),
            timeout: Duration::from_secs(self.timeout_secs),
            retries: self.retries,
            requests_per_second,
        }
    }
}

fn default_data_path(file_name: &str) -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("sonority")
        .join(file_name)
}

/// Get the config file path.
///
/// Returns:
/// - Linux: ~/.config/sonority/config.toml
/// - macOS: ~/Library/Application Support/sonority/config.toml
/// - Windows: %APPDATA%\sonority\config.toml
pub fn config_file_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("sonority")
        .join("config.toml")
}

/// Get the example config file content.
pub fn example_config() -> &'static str {
    r#"# Sonority Configuration File
#
# Configuration is loaded from multiple sources with the following priority:
# 1. CLI arguments (highest priority)
# 2. Environment variables (SONO_* prefix)
# 3. This config file
# 4. Built-in defaults (lowest priority)

# Precomputed artifacts. The catalog is a JSON array of objects with
# "title" and "artist" fields; the similarity matrix is a JSON array of
# N arrays of N numbers, row i aligned with catalog row i. Either may be
# gzipped (path ending in .gz).
#
# Can also be set via:
# - CLI: sonority --catalog /path/catalog.json --similarity /path/similarity.json
# - Environment: SONO_CATALOG_PATH, SONO_SIMILARITY_PATH
#catalog_path = "/path/to/catalog.json"
#similarity_path = "/path/to/similarity.json"

# Number of recommendations per selection
recommendation_count = 4

# Look up release date, genre and cover art for each recommendation
enrich = true

# External services
#musicbrainz_url = "https://musicbrainz.org/ws/2"
#deezer_url = "https://api.deezer.com"
#user_agent = "sonority/0.1.0 (you@example.com)"
timeout_secs = 30

# Extra attempts for transient lookup failures (0 = single attempt)
retries = 0

[logging]
level = "warn"
coloured = true
report_caller = false
"#
}

/// Create default config file if it doesn't exist.
///
/// Returns true if a new file was created, false if it already existed.
pub fn ensure_config_file() -> Result<bool> {
    let config_path = config_file_path();

    if config_path.exists() {
        return Ok(false);
    }

    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent).context("Failed to create config directory")?;
    }

    std::fs::write(&config_path, example_config()).context("Failed to write config file")?;

    Ok(true)
}
