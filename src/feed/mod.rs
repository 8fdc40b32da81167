//! The feed aggregation pipeline.
//!
//! Raw feed documents come in from [`fetch`] (concurrently, as a batch or a
//! stream), get normalized into [`FeedItem`]s by [`unpack`] — which runs
//! every item through the [`filter`] pipeline — and are then reordered by a
//! [`display`] mode before rendering.
//!
//! ## For contributors
//!
//! Each stage lives in its own sub-module and only talks to its neighbours
//! through the types re-exported here.  Adding a new filter means a new
//! struct in [`filter`]; adding a new ordering means a new arm in
//! [`display::DisplayMode`].  Nothing outside this module touches the raw
//! `rss` document types except through [`RawFeed`].

mod dates;
mod display;
mod fetch;
mod filter;
mod item;
mod links;
mod storage;
mod unpack;

pub use dates::DateParser;
pub use display::DisplayMode;
pub use fetch::{fetch_feed, refresh_feeds, refresh_feeds_async, RawFeed};
pub use filter::{Deduplicate, Filter, Filters, MaxItems, MaxItemsPerChannel, OldestItem};
pub use item::{FeedItem, FormatSettings};
pub use links::LinkFormatter;
pub use storage::{load, load_all, store};
pub use unpack::{get_feed_items, unpack_feed};

use std::io::BufRead;

use thiserror::Error;

/// Everything that can go wrong in the pipeline.
///
/// None of these are fatal to a run: a failed fetch or decode costs one
/// source, a failed date parse costs one item, and a failed extraction is
/// reported inline in the detail pane.
#[derive(Debug, Error)]
pub enum FeedError {
    /// Network/transport failure fetching one URL.
    #[error("error getting {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The body came back but is not a well-formed feed document.
    #[error("error decoding feed from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: rss::Error,
    },

    /// No known timestamp format matched the raw date string.
    #[error("could not parse date {0:?}")]
    DateParse(String),

    /// Article text extraction failed for a selected link.
    #[error("extraction failed: {0}")]
    Extraction(String),
}

/// Read the newline-delimited feed URL list.
///
/// Lines beginning with `#` are comments; blank lines are skipped.
pub fn read_urls<R: BufRead>(reader: R) -> std::io::Result<Vec<String>> {
    let mut urls = Vec::new();
    for line in reader.lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        urls.push(line.to_string());
    }
    Ok(urls)
}
