//! Loads every source at once and reports when all of them have settled.
//!
//! [`NewsFeed`] is what the view talks to: a `load()` command plus read
//! access to the pages and the ready flag.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use futures::future::join_all;
use tracing::info;

use super::action::grab_news;
use super::middleware::{dispatch, Outcome};
use super::state::{AppState, Source};
use super::Store;
use crate::source::{Article, Transport};

/// Aggregator over one [`Store`] and one [`Transport`].
#[derive(Clone)]
pub struct NewsFeed {
    store: Store,
    transport: Arc<dyn Transport>,
    ready: Arc<AtomicBool>,
}

impl NewsFeed {
    pub fn new(store: Store, transport: Arc<dyn Transport>) -> Self {
        Self {
            store,
            transport,
            ready: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Load every source listed in the current state.
    pub async fn load(&self) {
        let sources = self.store.snapshot().sources().to_vec();
        self.load_all(&sources).await;
    }

    /// Fetch every source in `sources` concurrently, source `i` into slot
    /// `i`, and wait until all of them have settled.
    ///
    /// A failing source does not stop the others; its page keeps whatever it
    /// held before.  The ready flag is set once everything has settled and
    /// stays set across later loads.
    pub async fn load_all(&self, sources: &[Source]) {
        info!(sources = sources.len(), "loading all sources");

        let in_flight: Vec<_> = sources
            .iter()
            .enumerate()
            .map(|(index, source)| {
                dispatch(&self.store, grab_news(self.transport.as_ref(), source, index))
            })
            .collect();

        let outcomes = join_all(in_flight.into_iter().map(|d| d.settled())).await;

        let failed = outcomes.iter().filter(|o| **o == Outcome::Failed).count();
        info!(
            loaded = outcomes.len() - failed,
            failed, "all sources settled"
        );

        self.ready.store(true, Ordering::Release);
    }

    /// Whether a load has completed at least once.
    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }

    /// Articles on page `number` (1-based), copied out of the current state.
    pub fn page(&self, number: usize) -> Option<Vec<Article>> {
        self.store.snapshot().page(number).map(<[Article]>::to_vec)
    }

    pub fn snapshot(&self) -> Arc<AppState> {
        self.store.snapshot()
    }
}
