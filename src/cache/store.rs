//! Named Store Module
//!
//! A single named key→response mapping, keyed by full request URL.

use std::collections::HashMap;

use crate::cache::CachedResponse;

// == Named Store ==
/// One persistent named store (static or dynamic).
///
/// Keys are full request URLs; values are the most recently stored response
/// for that URL. Writes overwrite, never merge. Concurrent writers racing on
/// the same URL resolve last-write-wins, which is accepted: responses for a
/// fixed URL are treated as interchangeable.
#[derive(Debug)]
pub struct NamedStore {
    /// Store name, version-suffixed (e.g. "velocache-static-v2")
    name: String,
    /// URL → stored response
    entries: HashMap<String, CachedResponse>,
}

impl NamedStore {
    // == Constructor ==
    /// Creates an empty store with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: HashMap::new(),
        }
    }

    /// The store's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    // == Put ==
    /// Stores a response under a URL, replacing any existing entry.
    pub fn put(&mut self, url: impl Into<String>, response: CachedResponse) {
        self.entries.insert(url.into(), response);
    }

    // == Lookup ==
    /// Returns a clone of the entry stored under `url`, if any.
    pub fn lookup(&self, url: &str) -> Option<CachedResponse> {
        self.entries.get(url).cloned()
    }

    /// True when an entry exists for `url`.
    pub fn contains(&self, url: &str) -> bool {
        self.entries.contains_key(url)
    }

    /// URLs of every entry currently held.
    pub fn urls(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(|k| k.as_str())
    }

    // == Length ==
    /// Number of entries currently held.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the store holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
