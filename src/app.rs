//! View state for the terminal carousel.
//!
//! `App` owns everything the UI needs that is not in the store: the page
//! being shown, the selected card, the per-page load status and whether the
//! article detail is open.  Pages themselves are read from the store on every
//! frame, so a finished fetch shows up without any copying here.

use ratatui::widgets::ListState;

use crate::load::{LoadMsg, SlotStatus};
use crate::source::Article;
use crate::store::{dispatch, Action, ActionType, NewsFeed};

pub struct App {
    feed: NewsFeed,
    /// Current page, 0-based.
    pub page: usize,
    /// Selection within the displayable cards of the current page.
    pub list_state: ListState,
    /// One entry per page.
    pub statuses: Vec<SlotStatus>,
    /// Whether the selected article is shown in the detail overlay.
    pub detail_open: bool,
    /// Whether the user has requested to quit.
    pub quit: bool,
    /// Set by input handling; the main loop forwards it to the loader.
    pub reload_requested: bool,
    /// Last status line message.
    pub status: String,
}

impl App {
    pub fn new(feed: NewsFeed) -> Self {
        let pages = feed.snapshot().len();
        Self {
            feed,
            page: 0,
            list_state: ListState::default(),
            statuses: vec![SlotStatus::Pending; pages],
            detail_open: false,
            quit: false,
            reload_requested: false,
            status: "Loading…".into(),
        }
    }

    pub fn feed(&self) -> &NewsFeed {
        &self.feed
    }

    /// True once the first load has settled; until then the UI shows the
    /// loading screen.
    pub fn is_ready(&self) -> bool {
        self.feed.is_ready()
    }

    pub fn page_count(&self) -> usize {
        self.statuses.len()
    }

    /// Source slug of the current page.
    pub fn source_name(&self, page: usize) -> String {
        self.feed
            .snapshot()
            .sources()
            .get(page)
            .cloned()
            .unwrap_or_default()
    }

    /// Cards on the current page: only articles with both a link and an
    /// image.
    pub fn visible_articles(&self) -> Vec<Article> {
        self.feed
            .page(self.page + 1)
            .unwrap_or_default()
            .into_iter()
            .filter(Article::is_displayable)
            .collect()
    }

    pub fn selected_article(&self) -> Option<Article> {
        let i = self.list_state.selected()?;
        self.visible_articles().into_iter().nth(i)
    }

    pub fn handle_load_msg(&mut self, msg: LoadMsg) {
        match msg {
            LoadMsg::Slot { index, status } => {
                if let Some(slot) = self.statuses.get_mut(index) {
                    *slot = status;
                }
            }
            LoadMsg::Settled => {
                let failed = self
                    .statuses
                    .iter()
                    .filter(|s| matches!(s, SlotStatus::Failed(_)))
                    .count();
                self.status = if failed == 0 {
                    format!("Loaded {} sources", self.page_count())
                } else {
                    format!("Loaded {} sources, {failed} failed", self.page_count())
                };
                self.clamp_selection();
            }
        }
    }

    pub fn request_reload(&mut self) {
        self.reload_requested = true;
        self.status = "Reloading…".into();
    }

    // -- pages ---------------------------------------------------------------

    /// Move to the next page, wrapping around like a looped carousel.
    pub fn next_page(&mut self) {
        if self.page_count() == 0 {
            return;
        }
        self.show_page((self.page + 1) % self.page_count());
    }

    pub fn previous_page(&mut self) {
        if self.page_count() == 0 {
            return;
        }
        let count = self.page_count();
        self.show_page((self.page + count - 1) % count);
    }

    fn show_page(&mut self, page: usize) {
        self.page = page;
        self.detail_open = false;
        self.list_state.select(None);
        dispatch(
            self.feed.store(),
            Action::Plain {
                kind: ActionType::ShowPage,
                index: page,
            },
        );
    }

    // -- cards ---------------------------------------------------------------

    pub fn select_next(&mut self) {
        let len = self.visible_articles().len();
        if len == 0 {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) => (i + 1).min(len - 1),
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    pub fn select_previous(&mut self) {
        if self.visible_articles().is_empty() {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) => i.saturating_sub(1),
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    pub fn select_first(&mut self) {
        if !self.visible_articles().is_empty() {
            self.list_state.select(Some(0));
        }
    }

    pub fn select_last(&mut self) {
        let len = self.visible_articles().len();
        if len > 0 {
            self.list_state.select(Some(len - 1));
        }
    }

    /// Open the detail overlay for the selected card, or close it.
    pub fn toggle_detail(&mut self) {
        if self.detail_open {
            self.detail_open = false;
        } else if self.selected_article().is_some() {
            self.detail_open = true;
        }
    }

    /// A reload can shrink the page under the selection.
    fn clamp_selection(&mut self) {
        let len = self.visible_articles().len();
        match self.list_state.selected() {
            Some(_) if len == 0 => {
                self.list_state.select(None);
                self.detail_open = false;
            }
            Some(i) if i >= len => self.list_state.select(Some(len - 1)),
            _ => {}
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::source::mock::MockTransport;
    use crate::store::{AppState, Store};

    /// An app over three sources, with `cards` displayable articles on page 1
    /// plus one article without an image.
    pub(crate) fn app_with_cards(cards: usize) -> App {
        let store = Store::new(AppState::new(["alpha", "beta", "gamma"]));
        let mut articles: Vec<Article> = (0..cards)
            .map(|i| {
                Article::new(
                    format!("Story {i}"),
                    Some(format!("https://example.com/{i}").as_str()),
                    Some(format!("https://example.com/{i}.jpg").as_str()),
                )
            })
            .collect();
        articles.push(Article::new("No image", Some("https://example.com/x"), None));
        store.apply(Action::Success {
            kind: ActionType::GrabNews,
            index: 0,
            articles,
        });
        App::new(NewsFeed::new(store, Arc::new(MockTransport::new())))
    }

    // -- construction --------------------------------------------------------

    #[test]
    fn new_app_has_one_pending_status_per_page() {
        let app = app_with_cards(0);
        assert_eq!(app.statuses, vec![SlotStatus::Pending; 3]);
        assert_eq!(app.page, 0);
        assert!(!app.is_ready());
        assert!(!app.quit);
    }

    #[test]
    fn visible_articles_skip_cards_without_image() {
        let app = app_with_cards(2);
        let titles: Vec<_> = app.visible_articles().into_iter().map(|a| a.title).collect();
        assert_eq!(titles, ["Story 0", "Story 1"]);
    }

    // -- load messages -------------------------------------------------------

    #[test]
    fn slot_messages_update_statuses() {
        let mut app = app_with_cards(0);
        app.handle_load_msg(LoadMsg::Slot {
            index: 1,
            status: SlotStatus::Failed("boom".into()),
        });
        app.handle_load_msg(LoadMsg::Slot {
            index: 9,
            status: SlotStatus::Loading,
        });
        assert_eq!(app.statuses[1], SlotStatus::Failed("boom".into()));
        assert_eq!(app.statuses.len(), 3);
    }

    #[test]
    fn settled_summarises_failures() {
        let mut app = app_with_cards(0);
        app.statuses = vec![
            SlotStatus::Loaded(3),
            SlotStatus::Failed("x".into()),
            SlotStatus::Loaded(0),
        ];
        app.handle_load_msg(LoadMsg::Settled);
        assert_eq!(app.status, "Loaded 3 sources, 1 failed");
    }

    // -- pages ---------------------------------------------------------------

    #[test]
    fn pages_wrap_in_both_directions() {
        let mut app = app_with_cards(1);
        app.previous_page();
        assert_eq!(app.page, 2);
        app.next_page();
        assert_eq!(app.page, 0);
        app.next_page();
        assert_eq!(app.page, 1);
    }

    #[test]
    fn changing_page_resets_selection_and_detail() {
        let mut app = app_with_cards(2);
        app.select_first();
        app.toggle_detail();
        assert!(app.detail_open);

        app.next_page();
        assert!(app.list_state.selected().is_none());
        assert!(!app.detail_open);
        assert!(app.visible_articles().is_empty());
    }

    #[test]
    fn changing_page_leaves_state_untouched() {
        let mut app = app_with_cards(2);
        let before = app.feed.snapshot();
        app.next_page();
        assert_eq!(*app.feed.snapshot(), *before);
    }

    // -- cards ---------------------------------------------------------------

    #[test]
    fn select_next_on_empty_page_is_noop() {
        let mut app = app_with_cards(0);
        app.select_next();
        assert!(app.list_state.selected().is_none());
    }

    #[test]
    fn select_next_starts_at_zero_then_clamps() {
        let mut app = app_with_cards(2);
        app.select_next();
        assert_eq!(app.list_state.selected(), Some(0));
        app.select_next();
        app.select_next();
        assert_eq!(app.list_state.selected(), Some(1));
    }

    #[test]
    fn select_previous_clamps_at_zero() {
        let mut app = app_with_cards(3);
        app.select_last();
        assert_eq!(app.list_state.selected(), Some(2));
        app.select_previous();
        app.select_previous();
        app.select_previous();
        assert_eq!(app.list_state.selected(), Some(0));
    }

    #[test]
    fn detail_needs_a_selection() {
        let mut app = app_with_cards(2);
        app.toggle_detail();
        assert!(!app.detail_open);

        app.select_last();
        app.toggle_detail();
        assert!(app.detail_open);
        assert_eq!(app.selected_article().unwrap().title, "Story 1");

        app.toggle_detail();
        assert!(!app.detail_open);
    }

    #[test]
    fn settled_clamps_selection_past_the_end() {
        let mut app = app_with_cards(2);
        app.list_state.select(Some(5));
        app.handle_load_msg(LoadMsg::Settled);
        assert_eq!(app.list_state.selected(), Some(1));
    }

    #[test]
    fn reload_request_sets_flag() {
        let mut app = app_with_cards(0);
        app.request_reload();
        assert!(app.reload_requested);
    }
}
