//! Client for the newsapi.org v1 REST API.
//!
//! [`NewsApiClient`] is the production [`Transport`]: it sends the GET and
//! reads the body, nothing more.  Interpreting the body is the job of
//! [`parse_articles`], a pure function so that the envelope rules can be
//! tested without a network.

use futures::FutureExt;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use super::{Article, FetchFuture, RawResponse, Transport};
use crate::error::FetchError;

const API_KEY_HEADER: &str = "X-Api-Key";

/// HTTP client bound to one base URL and API key.
///
/// Cloning is cheap; the underlying connection pool is shared.
#[derive(Clone)]
pub struct NewsApiClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl NewsApiClient {
    /// Create a client.
    ///
    /// # Arguments
    ///
    /// * `base_url`: API root without a trailing slash requirement (e.g.
    ///   `https://newsapi.org/v1`).
    /// * `api_key`: sent verbatim in the `X-Api-Key` header.
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    /// Full URL for a relative endpoint.
    pub fn url_for(&self, endpoint: &str) -> String {
        format!("{}/{}", self.base_url, endpoint.trim_start_matches('/'))
    }

    fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        // A key with bytes that cannot go in a header is left off; the API
        // then answers with an application error.
        if let Ok(key) = HeaderValue::from_str(&self.api_key) {
            headers.insert(API_KEY_HEADER, key);
        }
        headers
    }
}

impl Transport for NewsApiClient {
    fn get(&self, endpoint: &str) -> FetchFuture {
        if endpoint.is_empty() {
            return futures::future::ready(Err(FetchError::EmptyEndpoint)).boxed();
        }

        let url = self.url_for(endpoint);
        let request = self.http.get(&url).headers(self.headers());

        async move {
            debug!(%url, "GET");
            let response = request.send().await?;
            let status = response.status().as_u16();
            let body = response.bytes().await?;
            debug!(%url, status, bytes = body.len(), "response received");
            Ok::<_, FetchError>(RawResponse::new(status, body.to_vec()))
        }
        .boxed()
    }
}

/// The response envelope.  Only the fields the pipeline looks at.
#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    error: Option<Value>,
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    articles: Option<Vec<Value>>,
}

/// Interpret a raw response body.
///
/// * Not JSON, or not an object of the expected shape → [`FetchError::Parse`].
/// * A set `error` field (anything but `null`, `false`, `0` or `""`), or
///   `"status": "error"` → [`FetchError::Api`] carrying whatever code and
///   message the body provided.
/// * Otherwise the `articles` array, or an empty list if it is absent.
///   Entries that are not objects are skipped with a warning; fields of the
///   wrong type are dropped by [`Article`]'s own deserializer.
pub fn parse_articles(raw: &RawResponse) -> Result<Vec<Article>, FetchError> {
    let envelope: Envelope =
        serde_json::from_slice(&raw.body).map_err(|source| FetchError::Parse {
            status: raw.status,
            source,
        })?;

    let flagged = envelope.error.as_ref().is_some_and(is_set);
    if flagged || envelope.status.as_deref() == Some("error") {
        let message = envelope
            .message
            .or_else(|| envelope.error.as_ref().filter(|e| is_set(e)).map(describe_error))
            .unwrap_or_else(|| format!("request failed with HTTP {}", raw.status));
        return Err(FetchError::Api {
            code: envelope.code,
            message,
        });
    }

    let articles: Vec<Article> = envelope
        .articles
        .unwrap_or_default()
        .into_iter()
        .enumerate()
        .filter_map(|(position, entry)| match serde_json::from_value(entry) {
            Ok(article) => Some(article),
            Err(e) => {
                warn!(position, error = %e, "skipping malformed article");
                None
            }
        })
        .collect();
    Ok(articles)
}

/// Whether an `error` value actually flags a failure.
fn is_set(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn describe_error(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
