//! Keyboard input handling.
//!
//! Maps terminal key events to [`App`] actions.  Adding a new keybinding is
//! a single match arm in [`handle_key_event`].
//!
//! ## For contributors
//!
//! To add a new keybinding:
//!
//! 1. Add a method on [`App`] for the action (if one doesn't exist).
//! 2. Add a `KeyCode` match arm in [`handle_key_event`] that calls it.
//! 3. Update the help text in [`crate::ui`]'s status bar.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};

use crate::app::App;

/// Process a single key event, updating app state accordingly.
///
/// Only key presses count, so that each physical keypress triggers exactly
/// one action.  While the article detail is open, Esc and Enter close it
/// instead of acting on the carousel.
pub fn handle_key_event(app: &mut App, key: KeyEvent) {
    if key.kind != KeyEventKind::Press {
        return;
    }

    if app.detail_open {
        match key.code {
            KeyCode::Esc | KeyCode::Enter | KeyCode::Backspace => app.toggle_detail(),
            KeyCode::Char('q') => app.quit = true,
            _ => {}
        }
        return;
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.quit = true,
        KeyCode::Right | KeyCode::Char('l') | KeyCode::Tab => app.next_page(),
        KeyCode::Left | KeyCode::Char('h') | KeyCode::BackTab => app.previous_page(),
        KeyCode::Down | KeyCode::Char('j') => app.select_next(),
        KeyCode::Up | KeyCode::Char('k') => app.select_previous(),
        KeyCode::Home | KeyCode::Char('g') => app.select_first(),
        KeyCode::End | KeyCode::Char('G') => app.select_last(),
        KeyCode::Enter => app.toggle_detail(),
        KeyCode::Char('r') => app.request_reload(),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::tests::app_with_cards;
    use crossterm::event::KeyModifiers;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn arrows_move_between_pages() {
        let mut app = app_with_cards(1);
        handle_key_event(&mut app, press(KeyCode::Right));
        assert_eq!(app.page, 1);
        handle_key_event(&mut app, press(KeyCode::Left));
        handle_key_event(&mut app, press(KeyCode::Left));
        assert_eq!(app.page, 2);
    }

    #[test]
    fn enter_opens_and_esc_closes_detail_without_quitting() {
        let mut app = app_with_cards(2);
        handle_key_event(&mut app, press(KeyCode::Char('j')));
        handle_key_event(&mut app, press(KeyCode::Enter));
        assert!(app.detail_open);

        handle_key_event(&mut app, press(KeyCode::Esc));
        assert!(!app.detail_open);
        assert!(!app.quit);

        handle_key_event(&mut app, press(KeyCode::Esc));
        assert!(app.quit);
    }

    #[test]
    fn page_keys_are_ignored_while_detail_is_open() {
        let mut app = app_with_cards(2);
        app.select_first();
        app.toggle_detail();
        handle_key_event(&mut app, press(KeyCode::Right));
        assert_eq!(app.page, 0);
        assert!(app.detail_open);
    }

    #[test]
    fn r_requests_reload() {
        let mut app = app_with_cards(0);
        handle_key_event(&mut app, press(KeyCode::Char('r')));
        assert!(app.reload_requested);
    }

    #[test]
    fn release_events_are_ignored() {
        let mut app = app_with_cards(0);
        let mut key = press(KeyCode::Char('q'));
        key.kind = KeyEventKind::Release;
        handle_key_event(&mut app, key);
        assert!(!app.quit);
    }
}
