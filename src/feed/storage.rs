//! On-disk feed archive.
//!
//! Each fetched channel is written to `<folder>/<channel title>` as its XML
//! document.  Storing a feed that already has a file merges the two item
//! sets, keyed by `title + pubDate`, so re-storing the same document is
//! idempotent.  Loaded feeds carry an empty source URL — the URL is not
//! part of the serialized document — and are only used for re-merging.

use std::collections::HashSet;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::{Context, Result};

use super::RawFeed;

/// Write the feed's channel to the archive folder, merging with any
/// existing document for the same channel.
pub fn store(feed: &RawFeed, folder: &Path) -> Result<()> {
    // Channel titles can contain path separators; flatten them.
    let name = feed.channel.title().replace('/', "_");
    let path = folder.join(name);

    let mut channel = feed.channel.clone();
    if path.exists() {
        let existing = load(&path)?;
        channel = merge(existing.channel, &channel);
    }

    let file = File::create(&path).with_context(|| format!("creating {}", path.display()))?;
    channel
        .write_to(file)
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

/// Read one archived feed document.
pub fn load(path: &Path) -> Result<RawFeed> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let channel = rss::Channel::read_from(BufReader::new(file))
        .with_context(|| format!("decoding {}", path.display()))?;
    Ok(RawFeed {
        url: String::new(),
        channel,
    })
}

/// Read every archived feed in the folder.
pub fn load_all(folder: &Path) -> Result<Vec<RawFeed>> {
    let mut feeds = Vec::new();
    for entry in std::fs::read_dir(folder).with_context(|| format!("reading {}", folder.display()))? {
        let entry = entry?;
        feeds.push(load(&entry.path())?);
    }
    Ok(feeds)
}

/// Append items from `incoming` that `existing` does not already contain,
/// keyed by `title + pubDate`.
fn merge(mut existing: rss::Channel, incoming: &rss::Channel) -> rss::Channel {
    let seen: HashSet<String> = existing.items().iter().map(item_key).collect();

    let mut items = existing.items().to_vec();
    for item in incoming.items() {
        if !seen.contains(&item_key(item)) {
            items.push(item.clone());
        }
    }
    existing.set_items(items);
    existing
}

fn item_key(item: &rss::Item) -> String {
    format!("{}{}", item.title().unwrap_or(""), item.pub_date().unwrap_or(""))
}
