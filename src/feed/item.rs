//! The normalized item type shared by every stage of the pipeline.
//!
//! Every raw feed entry is converted into a `FeedItem` by the unpacker so
//! that filtering, ordering, and rendering never need to know about the
//! source document format.

use chrono::{DateTime, Utc};
use crossterm::style::Stylize;

/// Date layout used in static output lines.
const OUTPUT_DATE_FORMAT: &str = "%Y/%m/%d";

/// A single feed entry, normalized for display.
///
/// `publish_time` of `None` means the source did not provide a usable date:
/// such items never print a date column, sort after all dated items, and
/// count as expired under the age filter.
///
/// An item with empty `links` and a non-empty `title` is a **title card** —
/// a synthetic separator produced by the grouped display mode.  Title cards
/// are never selectable articles.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeedItem {
    /// Headline.
    pub title: String,
    /// Publication timestamp, `None` when unknown.
    pub publish_time: Option<DateTime<Utc>>,
    /// Canonical article link first, then secondary references such as a
    /// comments-page link.
    pub links: Vec<String>,
    /// Human-readable title of the originating feed, used for grouping.
    pub feed: String,
    /// Same as `feed` today; kept distinct so per-channel limits can
    /// diverge from grouping later.
    pub channel: String,
}

impl FeedItem {
    /// An empty spacer row emitted between groups.
    pub fn separator() -> Self {
        Self::default()
    }

    /// A synthetic row carrying just a feed's name.
    pub fn title_card(feed: impl Into<String>) -> Self {
        Self {
            title: feed.into(),
            ..Self::default()
        }
    }

    /// Whether this item is a title card rather than an article.
    pub fn is_title_card(&self) -> bool {
        self.links.is_empty() && !self.title.is_empty()
    }

    /// The canonical article link, if this item has one.
    pub fn primary_link(&self) -> Option<&str> {
        self.links.first().map(String::as_str)
    }

    /// Render the item as one static output line (without the trailing
    /// newline): `date:\ttitle\tlink...`, with the date column omitted for
    /// undated items.
    pub fn format_line(&self, settings: &FormatSettings) -> String {
        let mut line = String::new();
        if let Some(t) = self.publish_time {
            let date = t.format(OUTPUT_DATE_FORMAT).to_string();
            if settings.colour {
                line.push_str(&format!("{}:", date.yellow()));
            } else {
                line.push_str(&date);
                line.push(':');
            }
        }

        line.push('\t');
        if self.is_title_card() && settings.colour {
            line.push_str(&format!("{}", self.title.as_str().green()));
        } else {
            line.push_str(&self.title);
        }

        if settings.include_links {
            for link in &self.links {
                line.push('\t');
                if settings.colour {
                    line.push_str(&format!("{}", link.as_str().blue()));
                } else {
                    line.push_str(link);
                }
            }
        }
        line
    }
}

/// Options for [`FeedItem::format_line`].
#[derive(Debug, Clone, Copy)]
pub struct FormatSettings {
    /// Emit ANSI colour codes (yellow dates, blue links, green title cards).
    pub colour: bool,
    /// Append the item's links as extra tab-separated columns.
    pub include_links: bool,
}

impl Default for FormatSettings {
    fn default() -> Self {
        Self {
            colour: false,
            include_links: true,
        }
    }
}
