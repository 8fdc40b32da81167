//! Interactive browser state.
//!
//! `App` owns everything the two-pane session needs: the visible rows, the
//! list cursor, which pane has focus, and the detail pane's text.  It is
//! mutated only from the UI thread — feed batches arrive over a channel and
//! are inserted here between redraws, so there is no concurrent access to
//! widget state.

use chrono::{DateTime, Utc};
use ratatui::widgets::ListState;

use crate::feed::FeedItem;

/// Which pane currently holds input focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    List,
    Detail,
}

/// One visible list entry: the display item plus its canonical link.
///
/// Separator and title-card rows have an empty `link` and are never
/// selectable as articles.
pub struct Row {
    pub item: FeedItem,
    pub link: String,
}

/// The detail pane: an article's link, its extracted text, and the scroll
/// offset.
#[derive(Default)]
pub struct Detail {
    pub link: String,
    pub body: String,
    pub scroll: u16,
}

pub struct App {
    pub rows: Vec<Row>,
    pub list_state: ListState,
    pub focus: Focus,
    pub detail: Detail,
    pub status: String,
    pub quit: bool,
    /// Items published after this instant get the recency highlight.
    pub highlight_after: DateTime<Utc>,
    /// Where the next arriving batch is inserted.  Only ever advances;
    /// rows already inserted are never reordered or removed.
    insert_cursor: usize,
}

impl App {
    pub fn new(highlight_after: DateTime<Utc>) -> Self {
        Self {
            rows: Vec::new(),
            list_state: ListState::default(),
            focus: Focus::List,
            detail: Detail::default(),
            status: "Fetching feeds…".into(),
            quit: false,
            highlight_after,
            insert_cursor: 0,
        }
    }

    /// Insert one display-ordered batch at the insertion cursor, then put
    /// the highlight back where the user had it.
    pub fn insert_items(&mut self, items: Vec<FeedItem>) {
        let selected = self.list_state.selected();
        for item in items {
            let link = item.primary_link().unwrap_or_default().to_string();
            self.rows.insert(self.insert_cursor, Row { item, link });
            self.insert_cursor += 1;
        }
        // Keep the cursor where it was despite the list growing.
        match selected {
            Some(i) => self.list_state.select(Some(i)),
            None if !self.rows.is_empty() => self.list_state.select(Some(0)),
            None => {}
        }
    }

    // -- list navigation (clamped, no wraparound) ----------------------------

    pub fn select_next(&mut self) {
        if self.rows.is_empty() {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) => (i + 1).min(self.rows.len() - 1),
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    pub fn select_previous(&mut self) {
        if self.rows.is_empty() {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) => i.saturating_sub(1),
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    pub fn select_first(&mut self) {
        if !self.rows.is_empty() {
            self.list_state.select(Some(0));
        }
    }

    pub fn select_last(&mut self) {
        if !self.rows.is_empty() {
            self.list_state.select(Some(self.rows.len() - 1));
        }
    }

    /// The highlighted row's article link, if it has one.  Separator and
    /// title-card rows yield `None`.
    pub fn selected_link(&self) -> Option<&str> {
        self.list_state
            .selected()
            .and_then(|i| self.rows.get(i))
            .map(|row| row.link.as_str())
            .filter(|link| !link.is_empty())
    }

    // -- focus ---------------------------------------------------------------

    pub fn focus_list(&mut self) {
        self.focus = Focus::List;
    }

    pub fn focus_detail(&mut self) {
        self.focus = Focus::Detail;
    }

    // -- detail pane ---------------------------------------------------------

    /// Populate the detail pane and move focus to it.
    pub fn show_article(&mut self, link: &str, body: String) {
        self.detail = Detail {
            link: link.to_string(),
            body,
            scroll: 0,
        };
        self.focus_detail();
    }

    pub fn scroll_detail_down(&mut self) {
        self.detail.scroll = self.detail.scroll.saturating_add(1);
    }

    pub fn scroll_detail_up(&mut self) {
        self.detail.scroll = self.detail.scroll.saturating_sub(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn article(title: &str, link: &str) -> FeedItem {
        FeedItem {
            title: title.into(),
            publish_time: Some(Utc.with_ymd_and_hms(2026, 6, 1, 0, 0, 0).unwrap()),
            links: vec![link.into()],
            feed: "Feed".into(),
            channel: "Feed".into(),
        }
    }

    fn app() -> App {
        App::new(Utc.with_ymd_and_hms(2026, 6, 1, 0, 0, 0).unwrap())
    }

    #[test]
    fn starts_list_focused_and_empty() {
        let app = app();
        assert_eq!(app.focus, Focus::List);
        assert!(app.rows.is_empty());
        assert!(app.list_state.selected().is_none());
        assert!(!app.quit);
    }

    #[test]
    fn insert_appends_batches_in_arrival_order() {
        let mut app = app();
        app.insert_items(vec![article("a", "https://e.com/a")]);
        app.insert_items(vec![article("b", "https://e.com/b"), article("c", "https://e.com/c")]);

        let titles: Vec<&str> = app.rows.iter().map(|r| r.item.title.as_str()).collect();
        assert_eq!(titles, vec!["a", "b", "c"]);
    }

    #[test]
    fn insert_restores_the_selection() {
        let mut app = app();
        app.insert_items(vec![article("a", "https://e.com/a"), article("b", "https://e.com/b")]);
        app.list_state.select(Some(1));

        app.insert_items(vec![article("c", "https://e.com/c")]);
        assert_eq!(app.list_state.selected(), Some(1));
    }

    #[test]
    fn first_insert_selects_the_top_row() {
        let mut app = app();
        app.insert_items(vec![article("a", "https://e.com/a")]);
        assert_eq!(app.list_state.selected(), Some(0));
    }

    #[test]
    fn navigation_clamps_at_both_ends() {
        let mut app = app();
        app.insert_items(vec![article("a", "https://e.com/a"), article("b", "https://e.com/b")]);

        app.select_previous();
        assert_eq!(app.list_state.selected(), Some(0), "no wrap to the end");

        app.select_last();
        app.select_next();
        assert_eq!(app.list_state.selected(), Some(1), "no wrap to the start");
    }

    #[test]
    fn navigation_on_empty_list_is_a_noop() {
        let mut app = app();
        app.select_next();
        app.select_previous();
        app.select_first();
        app.select_last();
        assert!(app.list_state.selected().is_none());
    }

    #[test]
    fn selected_link_skips_title_cards() {
        let mut app = app();
        app.insert_items(vec![
            FeedItem::separator(),
            FeedItem::title_card("Feed"),
            article("a", "https://e.com/a"),
        ]);

        app.list_state.select(Some(0));
        assert!(app.selected_link().is_none(), "separator is not selectable");
        app.list_state.select(Some(1));
        assert!(app.selected_link().is_none(), "title card is not selectable");
        app.list_state.select(Some(2));
        assert_eq!(app.selected_link(), Some("https://e.com/a"));
    }

    #[test]
    fn show_article_populates_detail_and_moves_focus() {
        let mut app = app();
        app.show_article("https://e.com/a", "body text".into());
        assert_eq!(app.focus, Focus::Detail);
        assert_eq!(app.detail.link, "https://e.com/a");
        assert_eq!(app.detail.body, "body text");
        assert_eq!(app.detail.scroll, 0);
    }

    #[test]
    fn detail_scroll_saturates_at_zero() {
        let mut app = app();
        app.scroll_detail_up();
        assert_eq!(app.detail.scroll, 0);
        app.scroll_detail_down();
        app.scroll_detail_down();
        app.scroll_detail_up();
        assert_eq!(app.detail.scroll, 1);
    }
}
