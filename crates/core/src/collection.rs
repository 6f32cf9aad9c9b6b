//! Local mirror of a remote collection.
//!
//! A [`Collection`] is seeded by a full load and then patched with the
//! server's response to every successful write. Records keep insertion
//! order; the only invariant is that no two records share an id.

use std::collections::HashSet;

use crate::filter::Filter;
use crate::record::{Record, Searchable};

/// Insertion-ordered records with unique ids.
#[derive(Debug, Clone, PartialEq)]
pub struct Collection<R> {
    records: Vec<R>,
}

impl<R> Default for Collection<R> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
        }
    }
}

impl<R: Record> Collection<R> {
    /// Create an empty collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace every record with a fresh server listing.
    ///
    /// Later duplicates of an id already seen are dropped. Returns how many
    /// were dropped so the caller can log it.
    pub fn load(&mut self, records: Vec<R>) -> usize {
        let total = records.len();
        let mut seen = HashSet::with_capacity(total);
        self.records = records
            .into_iter()
            .filter(|record| seen.insert(record.id()))
            .collect();
        total - self.records.len()
    }

    /// Empty the collection.
    pub fn clear(&mut self) {
        self.records.clear();
    }

    /// Add a record returned by a create call.
    ///
    /// Returns `true` if it was appended. If a record with the same id is
    /// already present it is replaced in place and `false` is returned.
    pub fn apply_create(&mut self, record: R) -> bool {
        if let Some(existing) = self.find_mut(record.id()) {
            *existing = record;
            false
        } else {
            self.records.push(record);
            true
        }
    }

    /// Replace the record with the same id as `record`.
    ///
    /// Returns `false` (and changes nothing) if no record has that id.
    pub fn apply_update(&mut self, record: R) -> bool {
        self.find_mut(record.id()).is_some_and(|existing| {
            *existing = record;
            true
        })
    }

    /// Remove the record with `id`, returning it. Missing ids are a no-op.
    pub fn apply_delete(&mut self, id: R::Id) -> Option<R> {
        let index = self.records.iter().position(|r| r.id() == id)?;
        Some(self.records.remove(index))
    }

    /// Remove every record matching `predicate`. Returns how many were removed.
    pub fn remove_where(&mut self, mut predicate: impl FnMut(&R) -> bool) -> usize {
        let before = self.records.len();
        self.records.retain(|r| !predicate(r));
        before - self.records.len()
    }

    /// Look up a record by id.
    #[must_use]
    pub fn get(&self, id: R::Id) -> Option<&R> {
        self.records.iter().find(|r| r.id() == id)
    }

    /// Returns `true` if a record with `id` is present.
    #[must_use]
    pub fn contains(&self, id: R::Id) -> bool {
        self.get(id).is_some()
    }

    fn find_mut(&mut self, id: R::Id) -> Option<&mut R> {
        self.records.iter_mut().find(|r| r.id() == id)
    }
}

impl<R> Collection<R> {
    /// Number of records.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` if there are no records.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterate records in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, R> {
        self.records.iter()
    }

    /// All records as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[R] {
        &self.records
    }
}

impl<R: Searchable> Collection<R> {
    /// Records matching `filter`, in insertion order.
    #[must_use]
    pub fn filtered(&self, filter: &Filter) -> Vec<&R> {
        self.records.iter().filter(|r| filter.matches(*r)).collect()
    }
}

impl<R: Record> From<Vec<R>> for Collection<R> {
    fn from(records: Vec<R>) -> Self {
        let mut collection = Self::new();
        collection.load(records);
        collection
    }
}

impl<'a, R> IntoIterator for &'a Collection<R> {
    type Item = &'a R;
    type IntoIter = std::slice::Iter<'a, R>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
