//! Normalizing raw feed documents into [`FeedItem`]s.
//!
//! Each raw item gets a canonical link list (formatted primary link, then
//! the comments link if the feed carries one), a parsed publish date, and
//! the channel's title for grouping.  Items whose date cannot be parsed are
//! dropped with a warning; items a filter rejects are dropped silently.

use chrono::Utc;
use tracing::warn;

use super::{DateParser, FeedItem, Filters, LinkFormatter, RawFeed};

/// Unpack one feed's items, passing each through the filter pipeline.
pub fn unpack_feed(feed: &RawFeed, filters: &mut Filters) -> Vec<FeedItem> {
    // One parser per feed so every dateless item shares the same "now".
    let dates = DateParser::new(Utc::now());
    let links = LinkFormatter::for_feed(&feed.url);
    let channel_title = feed.channel.title().to_string();

    let mut items = Vec::new();
    for raw in feed.channel.items() {
        let publish_time = match dates.parse(raw.pub_date().unwrap_or_default()) {
            Ok(t) => t,
            Err(e) => {
                warn!(feed = %channel_title, "dropping item: {e}");
                continue;
            }
        };

        let mut item_links = vec![links.format(raw.link(), raw.guid().map(|g| g.value()))];
        if let Some(comments) = raw.comments() {
            item_links.push(comments.to_string());
        }

        let item = FeedItem {
            title: raw.title().unwrap_or_default().to_string(),
            publish_time: Some(publish_time),
            links: item_links,
            feed: channel_title.clone(),
            channel: channel_title.clone(),
        };
        if filters.apply(&item) {
            items.push(item);
        }
    }
    items
}

/// Unpack a completed batch of fetched feeds, skipping failed slots.
pub fn get_feed_items(feeds: &[Option<RawFeed>], filters: &mut Filters) -> Vec<FeedItem> {
    feeds
        .iter()
        .flatten()
        .flat_map(|feed| unpack_feed(feed, filters))
        .collect()
}
