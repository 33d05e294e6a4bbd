//! HashMap-backed index table

use std::collections::HashMap;

/// Generic key → entry table
///
/// Not synchronized; the engine guards it together with the data files.
#[derive(Debug)]
pub struct Index<E> {
    entries: HashMap<Vec<u8>, E>,
}

impl<E> Index<E> {
    /// Create an empty index
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Insert or overwrite the entry for `key`, returning the old entry
    pub fn put(&mut self, key: Vec<u8>, entry: E) -> Option<E> {
        self.entries.insert(key, entry)
    }

    /// Get the entry for `key`, `None` if absent
    pub fn get(&self, key: &[u8]) -> Option<&E> {
        self.entries.get(key)
    }

    /// Remove the entry for `key`
    pub fn remove(&mut self, key: &[u8]) -> Option<E> {
        self.entries.remove(key)
    }

    pub fn contains(&self, key: &[u8]) -> bool {
        self.entries.contains_key(key)
    }

    /// Number of live keys
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over live keys, in no particular order
    pub fn keys(&self) -> impl Iterator<Item = &[u8]> {
        self.entries.keys().map(|k| k.as_slice())
    }
}

impl<E> Default for Index<E> {
    fn default() -> Self {
        Self::new()
    }
}
