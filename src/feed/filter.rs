//! The composable filter pipeline.
//!
//! A [`Filter`] is a predicate over [`FeedItem`]s that may carry private
//! accumulating state (a seen-link set, per-channel counters).  Filters are
//! constructed fresh per pipeline run, invoked at most once per item in a
//! fixed left-to-right order, and short-circuit on the first rejection —
//! later filters never see an item an earlier filter rejected, which is how
//! the counting caps only count survivors.
//!
//! Because of that state, a [`Filters`] pipeline must be owned by exactly
//! one unpacking task and never reused across independent runs.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Duration, Utc};

use super::FeedItem;

/// A possibly-stateful accept/reject decision over one item.
pub trait Filter: Send {
    /// Return `true` to keep the item.  Called at most once per item.
    fn accept(&mut self, item: &FeedItem) -> bool;
}

/// An ordered pipeline of filters, ANDed with short-circuiting.
#[derive(Default)]
pub struct Filters(Vec<Box<dyn Filter>>);

impl Filters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a filter; order of composition is the order of evaluation.
    pub fn with(mut self, filter: impl Filter + 'static) -> Self {
        self.0.push(Box::new(filter));
        self
    }

    /// Accept iff every filter accepts, stopping at the first rejection.
    pub fn apply(&mut self, item: &FeedItem) -> bool {
        self.0.iter_mut().all(|f| f.accept(item))
    }
}

/// Accepts only the first occurrence of every distinct link.
///
/// An item is rejected if *any* of its links has been seen before; on
/// acceptance all of its links are recorded.  This holds across feeds, so a
/// story syndicated to two sources appears once.
#[derive(Default)]
pub struct Deduplicate {
    seen: HashSet<String>,
}

impl Deduplicate {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Filter for Deduplicate {
    fn accept(&mut self, item: &FeedItem) -> bool {
        if item.links.iter().any(|l| self.seen.contains(l)) {
            return false;
        }
        self.seen.extend(item.links.iter().cloned());
        true
    }
}

/// Accepts items no older than `max_age` at pipeline construction time.
///
/// The boundary is inclusive: an item published exactly `max_age` ago is
/// kept.  Items with no publish time count as infinitely old and are always
/// rejected, consistent with reverse-chronological ordering putting them
/// last.
pub struct OldestItem {
    now: DateTime<Utc>,
    max_age: Duration,
}

impl OldestItem {
    pub fn new(max_age: Duration) -> Self {
        Self::at(Utc::now(), max_age)
    }

    /// Construct against a fixed reference instant.
    pub fn at(now: DateTime<Utc>, max_age: Duration) -> Self {
        Self { now, max_age }
    }
}

impl Filter for OldestItem {
    fn accept(&mut self, item: &FeedItem) -> bool {
        match item.publish_time {
            Some(t) => self.now - t <= self.max_age,
            None => false,
        }
    }
}

/// Accepts the first `n` items per distinct channel, in presentation order.
/// `n == 0` means unlimited.
pub struct MaxItemsPerChannel {
    limit: usize,
    counts: HashMap<String, usize>,
}

impl MaxItemsPerChannel {
    pub fn new(limit: usize) -> Self {
        Self {
            limit,
            counts: HashMap::new(),
        }
    }
}

impl Filter for MaxItemsPerChannel {
    fn accept(&mut self, item: &FeedItem) -> bool {
        if self.limit == 0 {
            return true;
        }
        let count = self.counts.entry(item.channel.clone()).or_insert(0);
        *count += 1;
        *count <= self.limit
    }
}

/// Accepts the first `n` items overall.  `n == 0` means unlimited.
pub struct MaxItems {
    limit: usize,
    count: usize,
}

impl MaxItems {
    pub fn new(limit: usize) -> Self {
        Self { limit, count: 0 }
    }
}

impl Filter for MaxItems {
    fn accept(&mut self, _item: &FeedItem) -> bool {
        if self.limit == 0 {
            return true;
        }
        self.count += 1;
        self.count <= self.limit
    }
}
