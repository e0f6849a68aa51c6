//! The rhythm catalog.
//!
//! An ordered, fixed set of backing rhythms. Selection is index-based and
//! wraps circularly, so the catalog also owns the index arithmetic used by
//! the playback controller.

use serde::{Deserialize, Serialize};

/// One catalog position: a rhythm name plus the sample resource backing it.
///
/// An entry without a resource is a deliberate placeholder: it occupies a
/// selectable position but nothing can ever play there.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RhythmEntry {
    /// Display name for the rhythm (e.g. "foxtrot").
    pub name: String,

    /// Resource identifier for the looping sample, if this entry has one.
    pub resource: Option<String>,
}

impl RhythmEntry {
    /// Creates an entry backed by a sample at the conventional
    /// `rhythm-<name>` resource path.
    pub fn sampled(name: impl Into<String>) -> Self {
        let name = name.into();
        let resource = Some(format!("rhythm-{}", name));
        Self { name, resource }
    }

    /// Creates a placeholder entry with no sample resource.
    pub fn silent(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            resource: None,
        }
    }
}

/// The ordered rhythm catalog. Immutable once built; index positions are
/// meaningful for the lifetime of the process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RhythmCatalog {
    entries: Vec<RhythmEntry>,
}

impl RhythmCatalog {
    /// Builds a catalog from an ordered list of entries.
    pub fn new(entries: Vec<RhythmEntry>) -> Self {
        Self { entries }
    }

    /// Builds a catalog where every name is sample-backed.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            entries: names.into_iter().map(RhythmEntry::sampled).collect(),
        }
    }

    /// Number of catalog positions.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if the catalog has no positions.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The entry at `index`. Panics if out of range; the controller only
    /// ever holds indices it obtained from this catalog.
    pub fn entry(&self, index: usize) -> &RhythmEntry {
        &self.entries[index]
    }

    /// The rhythm name at `index`.
    pub fn name(&self, index: usize) -> &str {
        &self.entries[index].name
    }

    /// Iterates over entries in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = &RhythmEntry> {
        self.entries.iter()
    }

    /// Finds the position of a rhythm by name.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.name == name)
    }

    /// The index one position forward, wrapping past the end to 0.
    pub fn next_index(&self, index: usize) -> usize {
        if index + 1 >= self.entries.len() {
            0
        } else {
            index + 1
        }
    }

    /// The index one position backward, wrapping below 0 to the last
    /// position.
    pub fn prev_index(&self, index: usize) -> usize {
        if index == 0 {
            self.entries.len() - 1
        } else {
            index - 1
        }
    }
}

impl Default for RhythmCatalog {
    /// The production catalog: six sample-backed ballroom/pop rhythms.
    fn default() -> Self {
        Self::from_names(["foxtrot", "latin", "rock", "slowrock", "swing", "waltz"])
    }
}
