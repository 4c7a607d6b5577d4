//! The application state record.
//!
//! `AppState` has a fixed schema: the ordered source list and one page per
//! source.  It is never mutated in place; [`AppState::with_page`] builds the
//! next value and shares every untouched page with the previous one.

use std::sync::Arc;

use crate::source::Article;

/// Upstream provider slug, e.g. `"bbc-news"`.
pub type Source = String;

/// Position of a source in the configured list, and of its page.
pub type Slot = usize;

/// One page of articles.  Shared between successive states.
pub type Page = Arc<[Article]>;

/// Name of the page key for a slot: slot 0 is `page1`.
pub fn page_key(index: Slot) -> String {
    format!("page{}", index + 1)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    sources: Arc<[Source]>,
    pages: Arc<[Page]>,
}

impl AppState {
    /// Fresh state: every page empty.
    pub fn new<I, S>(sources: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Source>,
    {
        let sources: Arc<[Source]> = sources.into_iter().map(Into::into).collect();
        let empty: Page = Arc::from(Vec::new());
        let pages = (0..sources.len()).map(|_| empty.clone()).collect();
        Self { sources, pages }
    }

    pub fn sources(&self) -> &[Source] {
        &self.sources
    }

    /// Number of slots; always equal to the number of sources.
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    /// Articles in a slot (0-based).
    pub fn slot(&self, index: Slot) -> Option<&[Article]> {
        self.pages.get(index).map(|p| &p[..])
    }

    /// Articles on a page (1-based, as in `page1`..`pageN`).
    pub fn page(&self, number: usize) -> Option<&[Article]> {
        number.checked_sub(1).and_then(|i| self.slot(i))
    }

    /// Shared handle to a slot's page, for structural-sharing checks.
    #[cfg(test)]
    pub fn page_handle(&self, index: Slot) -> Option<&Page> {
        self.pages.get(index)
    }

    /// A new state with `articles` in `index`; `None` if the slot does not
    /// exist.
    pub fn with_page(&self, index: Slot, articles: Vec<Article>) -> Option<Self> {
        if index >= self.pages.len() {
            return None;
        }
        let page: Page = Arc::from(articles);
        let pages = self
            .pages
            .iter()
            .enumerate()
            .map(|(i, p)| if i == index { page.clone() } else { p.clone() })
            .collect();
        Some(Self {
            sources: self.sources.clone(),
            pages,
        })
    }
}
