//! State container and the dispatch pipeline.
//!
//! ```text
//! grab_news() ──► middleware::dispatch() ──► Store::apply() ──► reduce()
//!  (action)        REQUEST now,               swap snapshot,     (pure)
//!                  SUCCESS / FAILURE later    notify listeners
//! ```
//!
//! * **`action`**: action types and the `grab_news` action creator.
//! * **`middleware`**: resolves pending calls into lifecycle actions.
//! * **`reducer`**: the pure transition function.
//! * **`state`**: the immutable `AppState` record.
//! * **`feed`**: fans out one fetch per source and tracks readiness.

pub mod action;
pub mod feed;
pub mod middleware;
pub mod reducer;
pub mod state;

pub use action::{Action, ActionType};
pub use feed::NewsFeed;
pub use middleware::dispatch;
pub use state::{page_key, AppState, Slot};

use std::sync::Arc;

use parking_lot::RwLock;
use tracing::debug;

/// Callback invoked with every action after it has been reduced.
pub type Listener = Arc<dyn Fn(&Action) + Send + Sync>;

/// Owner of the current [`AppState`].
///
/// Cloning a `Store` yields another handle to the same state.  Readers take
/// cheap [`Arc`] snapshots; [`Store::apply`] is the only writer and replaces
/// the snapshot wholesale.
#[derive(Clone)]
pub struct Store {
    inner: Arc<Inner>,
}

struct Inner {
    state: RwLock<Arc<AppState>>,
    listeners: RwLock<Vec<Listener>>,
}

impl Store {
    pub fn new(initial: AppState) -> Self {
        Self {
            inner: Arc::new(Inner {
                state: RwLock::new(Arc::new(initial)),
                listeners: RwLock::new(Vec::new()),
            }),
        }
    }

    /// The current state.  Later transitions do not affect a snapshot.
    pub fn snapshot(&self) -> Arc<AppState> {
        self.inner.state.read().clone()
    }

    /// Register a listener.  Listeners run on the dispatching task, after the
    /// state has been replaced, in registration order.
    ///
    /// A listener may itself subscribe or apply.  One registered while an
    /// action is being delivered first sees the next action.
    pub fn subscribe(&self, listener: impl Fn(&Action) + Send + Sync + 'static) {
        self.inner.listeners.write().push(Arc::new(listener));
    }

    /// Reduce `action` into the state, then notify listeners.
    pub fn apply(&self, action: Action) {
        debug!(
            kind = %action.kind(),
            phase = ?action.phase(),
            index = action.index(),
            "apply"
        );
        {
            let mut state = self.inner.state.write();
            let next = reducer::reduce(&state, &action);
            *state = Arc::new(next);
        }
        // No lock is held while listeners run.
        let listeners: Vec<Listener> = self.inner.listeners.read().clone();
        for listener in &listeners {
            listener(&action);
        }
    }
}
