//! Concurrent feed fetching.
//!
//! One per-URL primitive ([`fetch_feed`]) is shared by two fan-out modes:
//!
//! * **batch** ([`refresh_feeds`]) — one thread per URL, joined in spawn
//!   order, so slot `i` of the result always corresponds to input URL `i`
//!   regardless of completion order; failed fetches leave a `None`.
//! * **streaming** ([`refresh_feeds_async`]) — the same fan-out, but each
//!   result is pushed onto a shared channel as it completes.  The channel
//!   closes once every fetch has finished or failed.
//!
//! Fetches run to completion; there is no mid-flight cancellation.

use std::sync::mpsc;
use std::thread;

use tracing::warn;

use super::FeedError;

/// A fetched feed document: the URL it came from plus the decoded channel.
/// Never mutated after decode.
#[derive(Debug, Clone)]
pub struct RawFeed {
    pub url: String,
    pub channel: rss::Channel,
}

impl RawFeed {
    /// The channel's human-readable title.
    pub fn title(&self) -> &str {
        self.channel.title()
    }
}

/// `GET` one URL and decode the body as a feed document.
///
/// Network and decode failures are both attributed to this URL only and
/// never affect sibling fetches.
pub fn fetch_feed(url: &str) -> Result<RawFeed, FeedError> {
    let body = reqwest::blocking::get(url)
        .and_then(|resp| resp.bytes())
        .map_err(|source| FeedError::Fetch {
            url: url.to_string(),
            source,
        })?;

    let channel = rss::Channel::read_from(&body[..]).map_err(|source| FeedError::Decode {
        url: url.to_string(),
        source,
    })?;

    Ok(RawFeed {
        url: url.to_string(),
        channel,
    })
}

/// Fetch every URL concurrently and return results aligned with input
/// order.  A failed fetch yields `None` in its slot and a warning on the
/// diagnostic stream.
pub fn refresh_feeds(urls: &[String]) -> Vec<Option<RawFeed>> {
    let handles: Vec<_> = urls
        .iter()
        .cloned()
        .map(|url| thread::spawn(move || fetch_feed(&url)))
        .collect();

    handles
        .into_iter()
        .map(|handle| match handle.join() {
            Ok(Ok(feed)) => Some(feed),
            Ok(Err(e)) => {
                warn!("{e}");
                None
            }
            Err(_) => {
                warn!("fetch thread panicked");
                None
            }
        })
        .collect()
}

/// Fetch every URL concurrently, streaming results in completion order.
///
/// The receiver yields one `Result` per URL and then closes.  Consumers
/// should treat an `Err` as "that source failed" and skip it.
pub fn refresh_feeds_async(urls: Vec<String>) -> mpsc::Receiver<Result<RawFeed, FeedError>> {
    let (tx, rx) = mpsc::channel();
    for url in urls {
        let tx = tx.clone();
        thread::spawn(move || {
            // A send failure means the consumer is gone; nothing to do.
            let _ = tx.send(fetch_feed(&url));
        });
    }
    // Dropping the original sender closes the channel once every fetch
    // thread has sent its result and dropped its clone.
    rx
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::{get_feed_items, Filters};

    const FEED_XML: &str = r#"<?xml version="1.0"?>
<rss version="2.0">
  <channel>
    <title>Test Feed</title>
    <link>https://example.com</link>
    <description>test</description>
    <item>
      <title>Story one</title>
      <link>https://example.com/one</link>
      <pubDate>Mon, 01 Jun 2026 10:00:00 GMT</pubDate>
    </item>
    <item>
      <title>Story two</title>
      <link>https://example.com/two</link>
      <pubDate>Mon, 01 Jun 2026 09:00:00 GMT</pubDate>
    </item>
  </channel>
</rss>"#;

    #[test]
    fn fetch_feed_decodes_a_document() {
        let mut server = mockito::Server::new();
        let _m = server
            .mock("GET", "/feed.xml")
            .with_header("content-type", "application/rss+xml")
            .with_body(FEED_XML)
            .create();

        let feed = fetch_feed(&format!("{}/feed.xml", server.url())).unwrap();
        assert_eq!(feed.title(), "Test Feed");
        assert_eq!(feed.channel.items().len(), 2);
    }

    #[test]
    fn fetch_feed_reports_decode_errors() {
        let mut server = mockito::Server::new();
        let _m = server
            .mock("GET", "/broken.xml")
            .with_body("this is not a feed")
            .create();

        let err = fetch_feed(&format!("{}/broken.xml", server.url())).unwrap_err();
        assert!(matches!(err, FeedError::Decode { .. }));
    }

    #[test]
    fn batch_results_are_index_aligned_with_failures_as_none() {
        let mut server = mockito::Server::new();
        let _ok = server.mock("GET", "/ok.xml").with_body(FEED_XML).create();
        let _bad = server.mock("GET", "/bad.xml").with_body("nope").create();

        // Middle URL points at a closed port: a transport-level failure.
        let urls = vec![
            format!("{}/ok.xml", server.url()),
            "http://127.0.0.1:1/unreachable.xml".to_string(),
            format!("{}/bad.xml", server.url()),
        ];
        let feeds = refresh_feeds(&urls);

        assert_eq!(feeds.len(), 3);
        assert!(feeds[0].is_some());
        assert!(feeds[1].is_none());
        assert!(feeds[2].is_none());

        // The aggregation entry point silently skips the failed slots.
        let mut filters = Filters::new();
        let items = get_feed_items(&feeds, &mut filters);
        assert_eq!(items.len(), 2);
        assert!(items.iter().all(|i| i.feed == "Test Feed"));
    }

    #[test]
    fn streaming_yields_every_result_then_closes() {
        let mut server = mockito::Server::new();
        let _ok = server
            .mock("GET", "/ok.xml")
            .with_body(FEED_XML)
            .expect_at_least(1)
            .create();

        let urls = vec![
            format!("{}/ok.xml", server.url()),
            "http://127.0.0.1:1/unreachable.xml".to_string(),
        ];
        let rx = refresh_feeds_async(urls);

        let results: Vec<_> = rx.iter().collect();
        assert_eq!(results.len(), 2, "one result per URL, then the channel closes");
        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
        assert_eq!(results.iter().filter(|r| r.is_err()).count(), 1);
    }
}
