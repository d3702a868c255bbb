//! Immutable identifier sets.

use std::collections::BTreeSet;
use std::sync::Arc;

/// An immutable, cheaply clonable set of identifiers (tag ids or card ids).
///
/// Ordered so that equal sets hash and compare equal regardless of how they
/// were built.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TagSet(Arc<BTreeSet<String>>);

impl TagSet {
    pub fn new(items: BTreeSet<String>) -> Self {
        Self(Arc::new(items))
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, item: &str) -> bool {
        self.0.contains(item)
    }

    pub fn iter(&self) -> impl Iterator<Item = &String> {
        self.0.iter()
    }

    pub fn as_set(&self) -> &BTreeSet<String> {
        &self.0
    }

    /// Sorted copy of the members.
    pub fn to_vec(&self) -> Vec<String> {
        self.0.iter().cloned().collect()
    }
}

impl<S: Into<String>> FromIterator<S> for TagSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter.into_iter().map(Into::into).collect())
    }
}

impl From<BTreeSet<String>> for TagSet {
    fn from(items: BTreeSet<String>) -> Self {
        Self::new(items)
    }
}
