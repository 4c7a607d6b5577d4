//! Error types shared by the fetch pipeline and the configuration loader.
//!
//! Every failure a single fetch can hit is a [`FetchError`]; the dispatch
//! middleware turns each one into a FAILURE action instead of propagating it.

use std::path::PathBuf;

use thiserror::Error;

/// Why one source could not be loaded.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The caller asked for an empty endpoint; no request was sent.
    #[error("endpoint must not be empty")]
    EmptyEndpoint,

    /// DNS, connect, TLS or read failure while talking to the API.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The response body was not well-formed JSON of the expected shape.
    #[error("malformed response body (HTTP {status}): {source}")]
    Parse {
        status: u16,
        #[source]
        source: serde_json::Error,
    },

    /// The body parsed fine but the API reported an error in it.
    #[error("api error{}: {message}", code_suffix(.code))]
    Api {
        code: Option<String>,
        message: String,
    },
}

fn code_suffix(code: &Option<String>) -> String {
    code.as_deref().map(|c| format!(" [{c}]")).unwrap_or_default()
}

/// Configuration could not be loaded or is unusable.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid api url {url:?}: {reason}")]
    InvalidApiUrl { url: String, reason: String },

    #[error("at least one source must be configured")]
    NoSources,

    #[error("source #{0} has an empty slug")]
    EmptySource(usize),

    #[error("source #{index} ({slug:?}) may only contain a-z, 0-9, '-' and '_'")]
    InvalidSource { index: usize, slug: String },
}
