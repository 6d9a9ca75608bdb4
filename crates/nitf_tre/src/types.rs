//! Parsed TRE trees.

use derive_more::derive::{Deref, IntoIterator};
use nitf_field::{DatePattern, DateTime};

#[cfg(feature = "serde")]
use serde::Serialize;

/// One named value, or one named list of repeated groups
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum TreEntry {
    /// A single field, holding its untrimmed text
    Leaf { name: String, value: String },
    /// Every iteration of one loop, in encounter order
    Repeated { name: String, groups: Vec<TreGroup> },
}

impl TreEntry {
    /// Build a [`TreEntry::Leaf`]
    pub fn leaf(name: impl Into<String>, value: impl Into<String>) -> Self {
        TreEntry::Leaf {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Build a [`TreEntry::Repeated`]
    pub fn repeated(name: impl Into<String>, groups: Vec<TreGroup>) -> Self {
        TreEntry::Repeated {
            name: name.into(),
            groups,
        }
    }

    /// Name of the field or loop
    pub fn name(&self) -> &str {
        match self {
            TreEntry::Leaf { name, .. } | TreEntry::Repeated { name, .. } => name,
        }
    }

    /// The field text, `None` for loops
    pub fn value(&self) -> Option<&str> {
        match self {
            TreEntry::Leaf { value, .. } => Some(value),
            TreEntry::Repeated { .. } => None,
        }
    }

    /// The loop iterations, `None` for fields
    pub fn groups(&self) -> Option<&[TreGroup]> {
        match self {
            TreEntry::Leaf { .. } => None,
            TreEntry::Repeated { groups, .. } => Some(groups),
        }
    }
}

/// Ordered list of entries
///
/// Entry order follows the schema layout, lookups return the first match.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deref, IntoIterator)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct TreGroup {
    #[into_iterator(owned, ref)]
    entries: Vec<TreEntry>,
}

impl TreGroup {
    /// An empty group
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry
    pub fn push(&mut self, entry: TreEntry) {
        self.entries.push(entry);
    }

    /// First entry named `name`
    pub fn get(&self, name: &str) -> Option<&TreEntry> {
        self.entries.iter().find(|e| e.name() == name)
    }

    /// Untrimmed text of the first field named `name`
    pub fn value(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(TreEntry::value)
    }

    /// Text of the first field named `name`, with space padding removed
    pub fn trimmed_value(&self, name: &str) -> Option<&str> {
        self.value(name).map(str::trim)
    }

    /// The first field named `name`, read as a decimal integer
    pub fn int_value(&self, name: &str) -> Option<u64> {
        let text = self.trimmed_value(name)?;
        if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        text.parse().ok()
    }

    /// The first field named `name`, read as a date
    ///
    /// Blank or malformed dates are common in extensions and yield `None`.
    pub fn date_value(&self, name: &str, pattern: DatePattern) -> Option<DateTime> {
        DateTime::parse(self.value(name)?.trim_end(), pattern)
    }

    /// Iterations of the first loop named `name`
    pub fn groups(&self, name: &str) -> Option<&[TreGroup]> {
        self.get(name).and_then(TreEntry::groups)
    }
}

impl FromIterator<TreEntry> for TreGroup {
    fn from_iter<T: IntoIterator<Item = TreEntry>>(iter: T) -> Self {
        TreGroup {
            entries: iter.into_iter().collect(),
        }
    }
}

/// A parsed Tagged Record Extension
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Tre {
    pub name: String,
    /// Namespace prefix supplied by the schema
    pub prefix: String,
    pub group: TreGroup,
}

impl Tre {
    pub fn new(name: impl Into<String>, prefix: impl Into<String>, group: TreGroup) -> Self {
        Tre {
            name: name.into(),
            prefix: prefix.into(),
            group,
        }
    }
}
