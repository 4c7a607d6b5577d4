//! Configuration: API location, credentials and the ordered source list.
//!
//! Values are layered, later layers winning:
//!
//! 1. built-in defaults ([`Config::default`]),
//! 2. a TOML file (see [`resolve_config_path`]),
//! 3. command-line flags and their environment variables, applied through
//!    [`Overrides`] (clap reads `NEWSBY_API_URL` / `NEWSBY_API_KEY`).
//!
//! The file may set any subset of keys:
//!
//! ```toml
//! api_url = "https://newsapi.org/v1"
//! api_key = "..."
//! sources = ["associated-press", "bbc-news"]
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::ConfigError;

pub const DEFAULT_API_URL: &str = "https://newsapi.org/v1";

pub const DEFAULT_SOURCES: [&str; 5] = [
    "associated-press",
    "bbc-news",
    "bloomberg",
    "business-insider",
    "buzzfeed",
];

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub api_url: String,
    pub api_key: String,
    /// Order matters: source `i` fills page `i + 1`.
    pub sources: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            api_key: String::new(),
            sources: DEFAULT_SOURCES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Values given on the command line (or their environment variables).
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub api_url: Option<String>,
    pub api_key: Option<String>,
    /// Replaces the whole list when non-empty.
    pub sources: Vec<String>,
}

impl Config {
    /// Defaults, then the config file if one is found.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        match resolve_config_path(explicit) {
            Some(path) => Self::load_from_path(&path),
            None => Ok(Self::default()),
        }
    }

    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn with_overrides(mut self, overrides: Overrides) -> Self {
        if let Some(url) = overrides.api_url {
            self.api_url = url;
        }
        if let Some(key) = overrides.api_key {
            self.api_key = key;
        }
        if !overrides.sources.is_empty() {
            self.sources = overrides.sources;
        }
        self
    }

    /// Check that the configuration can drive a load.
    ///
    /// An empty API key is accepted: the API reports it as an error per
    /// source, which the view shows as failed pages.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |reason: &str| ConfigError::InvalidApiUrl {
            url: self.api_url.clone(),
            reason: reason.to_string(),
        };
        let url = reqwest::Url::parse(&self.api_url).map_err(|e| invalid(&e.to_string()))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(invalid("scheme must be http or https"));
        }

        if self.sources.is_empty() {
            return Err(ConfigError::NoSources);
        }
        for (index, slug) in self.sources.iter().enumerate() {
            if slug.trim().is_empty() {
                return Err(ConfigError::EmptySource(index));
            }
            if !is_valid_slug(slug) {
                return Err(ConfigError::InvalidSource {
                    index,
                    slug: slug.clone(),
                });
            }
        }
        Ok(())
    }
}

/// Slugs go into the query string verbatim, so only the characters the API
/// uses in source ids are allowed.
fn is_valid_slug(slug: &str) -> bool {
    slug.bytes()
        .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-' || b == b'_')
}

/// Which config file to read, if any.
///
/// An explicit path always wins (and must exist).  Otherwise
/// `<config_dir>/newsby/config.toml` is used when it exists.
pub fn resolve_config_path(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    dirs::config_dir()
        .map(|dir| dir.join("newsby").join("config.toml"))
        .filter(|path| path.is_file())
}
