//! The state transition function.

use tracing::warn;

use super::action::{Action, ActionType};
use super::state::AppState;

/// Compute the state that follows `action`.
///
/// Only a GRAB_NEWS SUCCESS changes anything: it replaces the page in its
/// slot.  REQUEST, FAILURE and plain actions leave the state as it was.
///
/// `index` must name an existing slot; a SUCCESS for an unknown slot is a
/// caller bug and is logged and ignored.
pub fn reduce(state: &AppState, action: &Action) -> AppState {
    match action {
        Action::Success {
            kind: ActionType::GrabNews,
            index,
            articles,
        } => match state.with_page(*index, articles.clone()) {
            Some(next) => next,
            None => {
                warn!(index, slots = state.len(), "success for unknown slot ignored");
                state.clone()
            }
        },
        _ => state.clone(),
    }
}
