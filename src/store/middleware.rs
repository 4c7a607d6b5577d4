//! Resolves pending calls into lifecycle actions.
//!
//! A plain action goes straight to the store.  A unit carrying a call emits
//! REQUEST immediately, then a spawned task settles the call and emits
//! exactly one SUCCESS or FAILURE.  The middleware never fails: transport,
//! parse and API errors all become FAILURE actions carrying their cause.

use tokio::task::JoinHandle;
use tracing::{debug, error, warn};

use super::action::{Action, AsyncAction, Dispatchable};
use super::Store;
use crate::source::parse_articles;

/// How a dispatched unit ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// A plain action, forwarded as-is.
    Passed,
    Succeeded,
    Failed,
}

/// Handle returned by [`dispatch`].
///
/// Dropping it does not cancel anything: the terminal action is still
/// emitted.
#[derive(Debug)]
pub enum Dispatched {
    Immediate,
    InFlight(JoinHandle<Outcome>),
}

impl Dispatched {
    /// Wait until the unit has emitted its terminal action.
    ///
    /// If the settling task panicked (a listener or the reducer panicked),
    /// this reports [`Outcome::Failed`] but no FAILURE action is emitted,
    /// since the task that would have emitted it is gone.
    pub async fn settled(self) -> Outcome {
        match self {
            Dispatched::Immediate => Outcome::Passed,
            Dispatched::InFlight(handle) => match handle.await {
                Ok(outcome) => outcome,
                Err(e) => {
                    error!(error = %e, "dispatch task did not complete");
                    Outcome::Failed
                }
            },
        }
    }
}

/// Send a unit through the pipeline into `store`.
///
/// Must be called from within a Tokio runtime when the unit carries a call.
pub fn dispatch(store: &Store, unit: impl Into<Dispatchable>) -> Dispatched {
    match unit.into() {
        Dispatchable::Plain(action) => {
            store.apply(action);
            Dispatched::Immediate
        }
        Dispatchable::Async(unit) => {
            store.apply(Action::Request {
                kind: unit.kind,
                index: unit.index,
            });
            Dispatched::InFlight(tokio::spawn(settle(store.clone(), unit)))
        }
    }
}

async fn settle(store: Store, unit: AsyncAction) -> Outcome {
    let AsyncAction { kind, index, call } = unit;

    let result = match call.await {
        Ok(raw) => parse_articles(&raw),
        Err(e) => Err(e),
    };

    match result {
        Ok(articles) => {
            debug!(%kind, index, count = articles.len(), "settled");
            store.apply(Action::Success {
                kind,
                index,
                articles,
            });
            Outcome::Succeeded
        }
        Err(error) => {
            warn!(%kind, index, %error, "settled with failure");
            store.apply(Action::Failure { kind, index, error });
            Outcome::Failed
        }
    }
}
