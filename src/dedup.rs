//! Seen-set for accepted words
//!
//! The build is single-threaded, so a plain hashbrown set with the ahash
//! hasher is all the word filter needs. Duplicate counts live in
//! `FilterStats`.

use ahash::RandomState;
use hashbrown::HashSet;

/// In-memory HashSet-based deduplicator
pub struct Deduplicator {
    seen: HashSet<String, RandomState>,
}

impl Deduplicator {
    pub fn new() -> Self {
        Self {
            seen: HashSet::with_hasher(RandomState::new()),
        }
    }

    /// Record `item` as seen.
    /// Returns true if the item is unique (not seen before)
    pub fn insert(&mut self, item: &str) -> bool {
        if self.seen.contains(item) {
            return false;
        }
        self.seen.insert(item.to_string());
        true
    }
}

impl Default for Deduplicator {
    fn default() -> Self {
        Self::new()
    }
}
