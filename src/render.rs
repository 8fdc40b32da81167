//! Static report rendering.
//!
//! Writes a filtered, display-ordered batch of items to any output sink,
//! one tab-separated line per item: `date:\ttitle\tlink...`.  Items with no
//! publish time omit the date column.  Colour is optional so piped output
//! stays clean.

use std::io::Write;

use crate::feed::{DisplayMode, FeedItem, FormatSettings};

/// Write one line per item in the given display order.
pub fn render<W: Write>(
    w: &mut W,
    items: Vec<FeedItem>,
    mode: DisplayMode,
    settings: &FormatSettings,
) -> std::io::Result<()> {
    for item in mode.apply(items) {
        writeln!(w, "{}", item.format_line(settings))?;
    }
    Ok(())
}
