//! Display modes: pure reordering/grouping transforms over a batch of
//! items, applied just before rendering.
//!
//! Modes are safe to re-apply to growing prefixes — the interactive
//! controller re-derives display order for each arriving feed batch.

use std::collections::HashMap;

use super::FeedItem;

/// How a batch of items is ordered for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayMode {
    /// Most recent first; undated items last.
    ReverseChronological,
    /// Items partitioned by feed, each group introduced by a separator row
    /// and a title card, group items newest-first.
    Grouped,
}

impl DisplayMode {
    pub fn apply(self, items: Vec<FeedItem>) -> Vec<FeedItem> {
        match self {
            DisplayMode::ReverseChronological => reverse_chronological(items),
            DisplayMode::Grouped => grouped(items),
        }
    }
}

/// Stable sort, newest first.  `None` publish times order after every
/// `Some`, and ties keep their original relative order.
fn reverse_chronological(mut items: Vec<FeedItem>) -> Vec<FeedItem> {
    items.sort_by(|a, b| b.publish_time.cmp(&a.publish_time));
    items
}

/// Partition by feed title, preserving first-seen feed order, and emit
/// `[separator, title card, items...]` per group.
fn grouped(items: Vec<FeedItem>) -> Vec<FeedItem> {
    let mut order: Vec<String> = Vec::new();
    let mut groups: HashMap<String, Vec<FeedItem>> = HashMap::new();
    for item in items {
        if !groups.contains_key(&item.feed) {
            order.push(item.feed.clone());
        }
        groups.entry(item.feed.clone()).or_default().push(item);
    }

    let mut result = Vec::new();
    for feed in order {
        let group = groups.remove(&feed).unwrap_or_default();
        result.push(FeedItem::separator());
        result.push(FeedItem::title_card(feed));
        result.extend(reverse_chronological(group));
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn item(title: &str, feed: &str, hours_ago: Option<i64>) -> FeedItem {
        let base = Utc.with_ymd_and_hms(2026, 6, 1, 12, 0, 0).unwrap();
        FeedItem {
            title: title.into(),
            publish_time: hours_ago.map(|h| base - Duration::hours(h)),
            links: vec![format!("https://example.com/{title}")],
            feed: feed.into(),
            channel: feed.into(),
        }
    }

    fn titles(items: &[FeedItem]) -> Vec<&str> {
        items.iter().map(|i| i.title.as_str()).collect()
    }

    #[test]
    fn reverse_chronological_orders_newest_first() {
        let out = DisplayMode::ReverseChronological.apply(vec![
            item("old", "f", Some(48)),
            item("new", "f", Some(1)),
            item("mid", "f", Some(24)),
        ]);
        assert_eq!(titles(&out), vec!["new", "mid", "old"]);
    }

    #[test]
    fn reverse_chronological_is_stable_on_ties() {
        let out = DisplayMode::ReverseChronological.apply(vec![
            item("first", "f", Some(5)),
            item("second", "f", Some(5)),
            item("third", "f", Some(5)),
        ]);
        assert_eq!(titles(&out), vec!["first", "second", "third"]);
    }

    #[test]
    fn reverse_chronological_puts_undated_items_last() {
        let out = DisplayMode::ReverseChronological.apply(vec![
            item("undated", "f", None),
            item("dated", "f", Some(1)),
        ]);
        assert_eq!(titles(&out), vec!["dated", "undated"]);
    }

    #[test]
    fn grouped_emits_separator_card_items_per_group() {
        let out = DisplayMode::Grouped.apply(vec![
            item("a1", "Alpha", Some(10)),
            item("b1", "Beta", Some(2)),
            item("a2", "Alpha", Some(1)),
        ]);

        // Alpha first (first seen), then Beta.
        assert_eq!(
            titles(&out),
            vec!["", "Alpha", "a2", "a1", "", "Beta", "b1"]
        );
        assert!(out[0].links.is_empty() && out[0].title.is_empty(), "separator");
        assert!(out[1].is_title_card());
        assert!(out[4].links.is_empty() && out[4].title.is_empty(), "separator");
        assert!(out[5].is_title_card());
    }

    #[test]
    fn grouped_group_items_are_reverse_chronological() {
        let out = DisplayMode::Grouped.apply(vec![
            item("old", "Alpha", Some(30)),
            item("new", "Alpha", Some(3)),
        ]);
        assert_eq!(titles(&out), vec!["", "Alpha", "new", "old"]);
    }

    #[test]
    fn grouped_preserves_first_seen_feed_order() {
        let out = DisplayMode::Grouped.apply(vec![
            item("z1", "Zeta", Some(1)),
            item("a1", "Alpha", Some(1)),
            item("z2", "Zeta", Some(2)),
        ]);
        let cards: Vec<&str> = out
            .iter()
            .filter(|i| i.is_title_card())
            .map(|i| i.title.as_str())
            .collect();
        assert_eq!(cards, vec!["Zeta", "Alpha"]);
    }

    #[test]
    fn grouped_empty_input_is_empty() {
        assert!(DisplayMode::Grouped.apply(Vec::new()).is_empty());
    }
}
