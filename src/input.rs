//! Keyboard input handling.
//!
//! Maps terminal key events to [`App`] transitions.  Which pane has focus
//! decides what a key means: list navigation and selection while the list
//! is focused, scrolling and dismissal while the detail pane is.
//!
//! Selecting an article fetches and extracts its text right here, blocking
//! this one action (the original session keeps working as soon as the pane
//! is populated).  The extraction engine is initialised lazily on a
//! background thread; the first selection waits for it.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::app::{App, Focus};
use crate::extract::LazyExtractor;

/// Process a single key event, updating app state accordingly.
///
/// Only reacts to key-press events (ignoring release / repeat) so that each
/// physical keypress triggers exactly one action.
pub fn handle_key_event(app: &mut App, key: KeyEvent, extractor: &mut LazyExtractor) {
    if key.kind != KeyEventKind::Press {
        return;
    }

    // Quit works from either pane.
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.quit = true;
        return;
    }

    match app.focus {
        Focus::List => handle_list_key(app, key, extractor),
        Focus::Detail => handle_detail_key(app, key),
    }
}

fn handle_list_key(app: &mut App, key: KeyEvent, extractor: &mut LazyExtractor) {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.quit = true,
        // Moving past either end is swallowed rather than wrapping.
        KeyCode::Down | KeyCode::Char('j') => app.select_next(),
        KeyCode::Up | KeyCode::Char('k') => app.select_previous(),
        KeyCode::Home | KeyCode::Char('g') => app.select_first(),
        KeyCode::End | KeyCode::Char('G') => app.select_last(),
        KeyCode::Right => app.focus_detail(),
        KeyCode::Enter => select_current(app, extractor),
        _ => {}
    }
}

fn handle_detail_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Left | KeyCode::Esc | KeyCode::Char('q') => app.focus_list(),
        KeyCode::Down | KeyCode::Char('j') => app.scroll_detail_down(),
        KeyCode::Up | KeyCode::Char('k') => app.scroll_detail_up(),
        _ => {}
    }
}

/// Fetch and display the highlighted article.  Rows without a link
/// (separators, title cards) are a no-op.
fn select_current(app: &mut App, extractor: &mut LazyExtractor) {
    let Some(link) = app.selected_link().map(str::to_string) else {
        return;
    };

    app.status = format!("Reading {link}…");
    let body = extractor
        .get()
        .and_then(|e| e.extract(&link))
        .map(|article| article.render())
        // Extraction failures show up in the pane instead of ending the
        // session.
        .unwrap_or_else(|e| e.to_string());
    app.show_article(&link, body);
    app.status = String::new();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::FeedItem;
    use chrono::Utc;
    use crossterm::event::KeyEvent;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn app_with_rows() -> App {
        let mut app = App::new(Utc::now());
        app.insert_items(vec![
            FeedItem::title_card("Feed"),
            FeedItem {
                title: "a".into(),
                links: vec!["https://e.com/a".into()],
                ..FeedItem::default()
            },
        ]);
        app
    }

    #[test]
    fn q_quits_from_the_list() {
        let mut app = app_with_rows();
        let mut lazy = LazyExtractor::start();
        handle_key_event(&mut app, key(KeyCode::Char('q')), &mut lazy);
        assert!(app.quit);
    }

    #[test]
    fn ctrl_c_quits_from_either_pane() {
        let mut app = app_with_rows();
        let mut lazy = LazyExtractor::start();
        app.focus_detail();
        handle_key_event(
            &mut app,
            KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
            &mut lazy,
        );
        assert!(app.quit);
    }

    #[test]
    fn right_moves_focus_to_detail_and_left_back() {
        let mut app = app_with_rows();
        let mut lazy = LazyExtractor::start();

        handle_key_event(&mut app, key(KeyCode::Right), &mut lazy);
        assert_eq!(app.focus, Focus::Detail);

        handle_key_event(&mut app, key(KeyCode::Left), &mut lazy);
        assert_eq!(app.focus, Focus::List);
    }

    #[test]
    fn esc_dismisses_the_detail_pane() {
        let mut app = app_with_rows();
        let mut lazy = LazyExtractor::start();
        app.focus_detail();
        handle_key_event(&mut app, key(KeyCode::Esc), &mut lazy);
        assert_eq!(app.focus, Focus::List);
        assert!(!app.quit, "Esc in the detail pane dismisses, not quits");
    }

    #[test]
    fn enter_on_a_title_card_is_a_noop() {
        let mut app = app_with_rows();
        let mut lazy = LazyExtractor::start();
        app.list_state.select(Some(0));

        handle_key_event(&mut app, key(KeyCode::Enter), &mut lazy);
        assert_eq!(app.focus, Focus::List);
        assert!(app.detail.body.is_empty());
    }

    #[test]
    fn navigation_keys_move_the_cursor() {
        let mut app = app_with_rows();
        let mut lazy = LazyExtractor::start();

        handle_key_event(&mut app, key(KeyCode::Down), &mut lazy);
        assert_eq!(app.list_state.selected(), Some(1));
        handle_key_event(&mut app, key(KeyCode::Up), &mut lazy);
        assert_eq!(app.list_state.selected(), Some(0));
    }

    #[test]
    fn detail_keys_scroll_the_pane() {
        let mut app = app_with_rows();
        let mut lazy = LazyExtractor::start();
        app.show_article("https://e.com/a", "text".into());

        handle_key_event(&mut app, key(KeyCode::Char('j')), &mut lazy);
        assert_eq!(app.detail.scroll, 1);
        handle_key_event(&mut app, key(KeyCode::Char('k')), &mut lazy);
        assert_eq!(app.detail.scroll, 0);
    }

    #[test]
    fn release_events_are_ignored() {
        let mut app = app_with_rows();
        let mut lazy = LazyExtractor::start();
        let mut release = key(KeyCode::Char('q'));
        release.kind = KeyEventKind::Release;
        handle_key_event(&mut app, release, &mut lazy);
        assert!(!app.quit);
    }
}
