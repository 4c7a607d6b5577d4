//! Upstream access layer.
//!
//! This module defines the [`Transport`] trait, the raw response it yields,
//! and the [`Article`] payload.  The only concrete transport is
//! [`NewsApiClient`]; tests plug in an in-memory one instead.
//!
//! ## For contributors: pointing at a different API
//!
//! 1. Create a new file in this directory (e.g. `gnews.rs`).
//! 2. Implement [`Transport`] for your client.  `get()` must not do any work
//!    before it returns; all I/O belongs inside the returned future.
//! 3. If the response envelope differs, add a parser next to
//!    [`parse_articles`] and call it from the dispatch middleware.
//! 4. Construct your client in `main.rs` instead of `NewsApiClient`.

mod article;
mod news_api;

#[cfg(test)]
pub mod mock;

pub use article::Article;
pub use news_api::{parse_articles, NewsApiClient};

use futures::future::BoxFuture;

use crate::error::FetchError;

/// A pending network call.  Resolves once the whole body has been read.
pub type FetchFuture = BoxFuture<'static, Result<RawResponse, FetchError>>;

/// An HTTP response whose body has not been interpreted yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// Something that can issue GET requests against the news API.
///
/// Each call is independent: repeated calls issue repeated requests, nothing
/// is cached or de-duplicated.
///
/// ## Implementing a new transport
///
/// ```ignore
/// pub struct MyClient { /* base url, credentials */ }
///
/// impl Transport for MyClient {
///     fn get(&self, endpoint: &str) -> FetchFuture {
///         let url = format!("{}/{endpoint}", self.base);
///         async move { /* send, read body */ todo!() }.boxed()
///     }
/// }
/// ```
pub trait Transport: Send + Sync {
    /// Start a GET for `endpoint`, relative to the configured base URL.
    fn get(&self, endpoint: &str) -> FetchFuture;
}
