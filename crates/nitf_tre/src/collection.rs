//! Ordered collections of parsed TREs
//!

use derive_more::derive::{Deref, IntoIterator};
use indexmap::IndexSet;
use tracing::debug;

#[cfg(feature = "serde")]
use serde::Serialize;

use crate::types::Tre;

/// The TREs attached to one header, in the order they were read
///
/// A tag may appear more than once. Adding and merging only ever append.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deref, IntoIterator)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct TreCollection {
    #[into_iterator(owned, ref)]
    tres: Vec<Tre>,
}

impl TreCollection {
    /// An empty collection
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one TRE
    pub fn add(&mut self, tre: Tre) {
        self.tres.push(tre);
    }

    /// Append every TRE of `other`, keeping its order
    pub fn add_all(&mut self, other: TreCollection) {
        self.tres.extend(other.tres);
    }

    /// Attach TREs continued from an overflow segment
    ///
    /// Entries already present are never replaced, even when `other` holds the same tags.
    pub fn merge(&mut self, other: TreCollection) {
        debug!(
            existing = self.tres.len(),
            merged = other.tres.len(),
            "merging tre collection"
        );
        self.add_all(other);
    }

    /// Distinct tag names in first-seen order
    pub fn unique_names(&self) -> Vec<&str> {
        self.tres
            .iter()
            .map(|t| t.name.as_str())
            .collect::<IndexSet<_>>()
            .into_iter()
            .collect()
    }

    /// Every TRE with tag `name`, in order
    pub fn by_name(&self, name: &str) -> Vec<&Tre> {
        self.tres.iter().filter(|t| t.name == name).collect()
    }

    /// The first TRE with tag `name`
    pub fn first(&self, name: &str) -> Option<&Tre> {
        self.tres.iter().find(|t| t.name == name)
    }
}

impl FromIterator<Tre> for TreCollection {
    fn from_iter<T: IntoIterator<Item = Tre>>(iter: T) -> Self {
        TreCollection {
            tres: iter.into_iter().collect(),
        }
    }
}
