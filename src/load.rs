//! Background loading.
//!
//! Runs the fetch pipeline on a dedicated thread with its own single-threaded
//! Tokio runtime, and reports progress to the UI thread over an [`mpsc`]
//! channel.  The UI asks for a reload by sending a [`Command`].
//!
//! ## For contributors
//!
//! All fetches of one load run concurrently on that one runtime thread; the
//! UI thread never blocks on the network.  Per-slot progress comes from a
//! store listener, so anything dispatched through the store shows up here.

use std::sync::mpsc;
use std::thread;

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::store::{Action, NewsFeed, Slot};

/// Progress of one page as seen by the UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotStatus {
    /// Nothing dispatched yet.
    Pending,
    Loading,
    /// Loaded with this many articles.
    Loaded(usize),
    /// Failed; the page keeps its previous contents.
    Failed(String),
}

impl SlotStatus {
    /// The status an action implies for its slot, if any.
    pub fn from_action(action: &Action) -> Option<Self> {
        match action {
            Action::Request { .. } => Some(SlotStatus::Loading),
            Action::Success { articles, .. } => Some(SlotStatus::Loaded(articles.len())),
            Action::Failure { error, .. } => Some(SlotStatus::Failed(error.to_string())),
            Action::Plain { .. } => None,
        }
    }
}

/// Messages sent from the loader thread to the UI thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadMsg {
    Slot { index: Slot, status: SlotStatus },
    /// Every source of the current load has settled.
    Settled,
}

/// Requests from the UI thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Reload,
}

/// Handle to the loader thread.
pub struct Loader {
    commands: mpsc::Sender<Command>,
    pub events: mpsc::Receiver<LoadMsg>,
}

impl Loader {
    /// Ask for every source to be fetched again.  Ignored if the loader has
    /// already stopped.
    pub fn reload(&self) {
        let _ = self.commands.send(Command::Reload);
    }
}

/// Forward per-slot status changes from `feed`'s store into `tx`.
pub fn report_progress(feed: &NewsFeed, tx: mpsc::Sender<LoadMsg>) {
    feed.store().subscribe(move |action| {
        if let Some(status) = SlotStatus::from_action(action) {
            // The UI may already be gone during shutdown.
            let _ = tx.send(LoadMsg::Slot {
                index: action.index(),
                status,
            });
        }
    });
}

/// Spawn the loader thread and start the first load immediately.
///
/// The thread runs until the [`Loader`] is dropped.
pub fn spawn(feed: NewsFeed) -> Result<Loader> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("building loader runtime")?;

    let (event_tx, event_rx) = mpsc::channel();
    let (command_tx, command_rx) = mpsc::channel();

    report_progress(&feed, event_tx.clone());

    thread::Builder::new()
        .name("newsby-loader".into())
        .spawn(move || {
            info!("loader started");
            loop {
                runtime.block_on(feed.load());
                if event_tx.send(LoadMsg::Settled).is_err() {
                    break;
                }
                // Blocks until the next reload; errors once the UI hangs up.
                match command_rx.recv() {
                    Ok(Command::Reload) => debug!("reload requested"),
                    Err(_) => break,
                }
            }
            info!("loader stopped");
        })
        .context("spawning loader thread")?;

    Ok(Loader {
        commands: command_tx,
        events: event_rx,
    })
}
