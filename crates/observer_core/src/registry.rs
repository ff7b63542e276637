use std::collections::HashSet;
use std::hash::Hash;

/// Insertion-ordered, append-only set mirrored from a remote list.
///
/// Entries are never removed; a later snapshot that omits an entry leaves the
/// local copy untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registry<T: Eq + Hash> {
    order: Vec<T>,
    seen: HashSet<T>,
}

impl<T: Eq + Hash> Default for Registry<T> {
    fn default() -> Self {
        Self {
            order: Vec::new(),
            seen: HashSet::new(),
        }
    }
}

impl<T: Clone + Eq + Hash> Registry<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, entry: &T) -> bool {
        self.seen.contains(entry)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.order.iter()
    }

    /// Appends every entry not already present, preserving incoming order.
    /// Returns the entries that were actually added.
    pub fn merge(&mut self, incoming: impl IntoIterator<Item = T>) -> Vec<T> {
        let mut added = Vec::new();
        for entry in incoming {
            if self.seen.insert(entry.clone()) {
                self.order.push(entry.clone());
                added.push(entry);
            }
        }
        added
    }
}
