//! Actions and the action creator.
//!
//! An [`Action`] is what the reducer and listeners see.  An [`AsyncAction`]
//! is a unit of work that still has a pending call attached; the dispatch
//! middleware turns it into a REQUEST action now and a SUCCESS or FAILURE
//! action later.

use std::fmt;

use crate::error::FetchError;
use crate::source::{Article, FetchFuture, Transport};

use super::state::Slot;

/// What an action is about, independent of its lifecycle phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionType {
    /// Fetch one source's articles into its page.
    GrabNews,
    /// The view moved to another page.  Informational; no state change.
    ShowPage,
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionType::GrabNews => write!(f, "GRAB_NEWS"),
            ActionType::ShowPage => write!(f, "SHOW_PAGE"),
        }
    }
}

/// Lifecycle phase of an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Request,
    Success,
    Failure,
    /// Dispatched directly, without a pending call.
    Plain,
}

#[derive(Debug)]
pub enum Action {
    Request {
        kind: ActionType,
        index: Slot,
    },
    Success {
        kind: ActionType,
        index: Slot,
        articles: Vec<Article>,
    },
    Failure {
        kind: ActionType,
        index: Slot,
        error: FetchError,
    },
    Plain {
        kind: ActionType,
        index: Slot,
    },
}

impl Action {
    pub fn kind(&self) -> ActionType {
        match self {
            Action::Request { kind, .. }
            | Action::Success { kind, .. }
            | Action::Failure { kind, .. }
            | Action::Plain { kind, .. } => *kind,
        }
    }

    pub fn index(&self) -> Slot {
        match self {
            Action::Request { index, .. }
            | Action::Success { index, .. }
            | Action::Failure { index, .. }
            | Action::Plain { index, .. } => *index,
        }
    }

    pub fn phase(&self) -> Phase {
        match self {
            Action::Request { .. } => Phase::Request,
            Action::Success { .. } => Phase::Success,
            Action::Failure { .. } => Phase::Failure,
            Action::Plain { .. } => Phase::Plain,
        }
    }

    /// SUCCESS or FAILURE.
    pub fn is_terminal(&self) -> bool {
        matches!(self.phase(), Phase::Success | Phase::Failure)
    }
}

/// A unit of work carrying a call that has not settled yet.
pub struct AsyncAction {
    pub kind: ActionType,
    pub index: Slot,
    pub call: FetchFuture,
}

impl fmt::Debug for AsyncAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AsyncAction")
            .field("kind", &self.kind)
            .field("index", &self.index)
            .finish_non_exhaustive()
    }
}

/// Anything the middleware accepts.
#[derive(Debug)]
pub enum Dispatchable {
    Plain(Action),
    Async(AsyncAction),
}

impl From<Action> for Dispatchable {
    fn from(action: Action) -> Self {
        Dispatchable::Plain(action)
    }
}

impl From<AsyncAction> for Dispatchable {
    fn from(unit: AsyncAction) -> Self {
        Dispatchable::Async(unit)
    }
}

/// Endpoint that lists a source's articles.
pub fn articles_endpoint(source: &str) -> String {
    format!("articles?source={source}")
}

/// Build the unit of work that fetches `source` into slot `index`.
///
/// Starts nothing by itself: the call is only driven once the unit is
/// dispatched.
pub fn grab_news(transport: &dyn Transport, source: &str, index: Slot) -> AsyncAction {
    AsyncAction {
        kind: ActionType::GrabNews,
        index,
        call: transport.get(&articles_endpoint(source)),
    }
}
