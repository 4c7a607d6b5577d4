//! The article payload returned by the news API.
//!
//! `Article` is deserialised straight from the upstream JSON (camelCase field
//! names) and is otherwise opaque to the store: the reducer moves whole lists
//! of articles into page slots without looking inside them.
//!
//! ## For contributors
//!
//! Only [`Article::is_displayable`] encodes a rule about article contents, and
//! that rule belongs to the view.  Do not filter in the fetch pipeline.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// A single article as delivered by the API.
///
/// Every field is optional upstream.  A missing title becomes an empty string
/// so that callers never have to unwrap it.  A field holding anything other
/// than a string is treated as missing rather than failing the article.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    /// Headline.
    #[serde(default, deserialize_with = "text_or_empty")]
    pub title: String,

    /// Canonical link to the full article.
    #[serde(default, deserialize_with = "text")]
    pub url: Option<String>,

    /// Lead image shown on the article card.
    #[serde(default, deserialize_with = "text")]
    pub url_to_image: Option<String>,

    #[serde(default, deserialize_with = "text")]
    pub author: Option<String>,

    #[serde(default, deserialize_with = "text")]
    pub description: Option<String>,

    /// Publication time exactly as the API sent it (usually RFC 3339).
    ///
    /// Kept as a string so that one odd date cannot fail the whole response;
    /// use [`Article::published`] for a parsed value.
    #[serde(default, deserialize_with = "text")]
    pub published_at: Option<String>,
}

impl Article {
    /// Whether the article can be shown as a card: it needs both a link to
    /// open and an image to display.
    pub fn is_displayable(&self) -> bool {
        self.url.is_some() && self.url_to_image.is_some()
    }

    /// Parse `published_at`, degrading to `None` on anything unparseable.
    pub fn published(&self) -> Option<DateTime<Utc>> {
        self.published_at
            .as_deref()
            .and_then(|d| DateTime::parse_from_rfc3339(d).ok())
            .map(|dt| dt.with_timezone(&Utc))
    }
}

#[cfg(test)]
impl Article {
    /// Shorthand for the three fields the carousel actually needs.
    pub fn new(
        title: impl Into<String>,
        url: Option<&str>,
        url_to_image: Option<&str>,
    ) -> Self {
        Self {
            title: title.into(),
            url: url.map(String::from),
            url_to_image: url_to_image.map(String::from),
            ..Self::default()
        }
    }
}

fn text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(Some(s)),
        _ => Ok(None),
    }
}

fn text_or_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(text(deserializer)?.unwrap_or_default())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn deserializes_camel_case_fields() {
        let json = r#"{
            "author": "Jane Doe",
            "title": "Headline",
            "description": "Summary",
            "url": "https://example.com/a",
            "urlToImage": "https://example.com/a.jpg",
            "publishedAt": "2017-03-01T12:30:00Z"
        }"#;

        let article: Article = serde_json::from_str(json).unwrap();

        assert_eq!(article.title, "Headline");
        assert_eq!(article.author.as_deref(), Some("Jane Doe"));
        assert_eq!(article.url.as_deref(), Some("https://example.com/a"));
        assert_eq!(
            article.url_to_image.as_deref(),
            Some("https://example.com/a.jpg")
        );
        assert_eq!(
            article.published(),
            Some(Utc.with_ymd_and_hms(2017, 3, 1, 12, 30, 0).unwrap())
        );
    }

    #[test]
    fn missing_and_null_fields_default() {
        let article: Article = serde_json::from_str(r#"{"title": null}"#).unwrap();
        assert_eq!(article, Article::default());
    }

    #[test]
    fn wrongly_typed_fields_are_dropped() {
        let article: Article = serde_json::from_str(
            r#"{"title": 42, "url": "u", "urlToImage": false, "author": ["a", "b"]}"#,
        )
        .unwrap();
        assert_eq!(article, Article::new("", Some("u"), None));
    }

    #[test]
    fn bad_date_is_none_not_an_error() {
        let article: Article =
            serde_json::from_str(r#"{"title": "t", "publishedAt": "yesterday"}"#).unwrap();
        assert_eq!(article.published_at.as_deref(), Some("yesterday"));
        assert!(article.published().is_none());
    }

    #[test]
    fn displayable_requires_url_and_image() {
        assert!(Article::new("a", Some("u"), Some("i")).is_displayable());
        assert!(!Article::new("b", Some("u"), None).is_displayable());
        assert!(!Article::new("c", None, Some("i")).is_displayable());
        assert!(!Article::new("d", None, None).is_displayable());
    }
}
