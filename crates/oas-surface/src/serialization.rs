//! Serialization groups: labels controlling what to load and serialize.

use serde::{Deserialize, Serialize};

const FNV_OFFSET_BASIS: u32 = 0x811c_9dc5;
const FNV_PRIME: u32 = 0x0100_0193;

/// An ordered set of serialization-group labels.
///
/// Membership is what matters; insertion order is preserved so a `Groups`
/// value round-trips byte-for-byte. No operation assumes the labels are
/// sorted; [`Groups::hash`] normalizes internally.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Groups(Vec<String>);

impl Groups {
    /// Create an empty group set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add labels, skipping any already present.
    pub fn add<I, S>(&mut self, labels: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for label in labels {
            let label = label.into();
            if !self.has_group(&label) {
                self.0.push(label);
            }
        }
    }

    /// Check if the given label is present.
    pub fn has_group(&self, label: &str) -> bool {
        self.0.iter().any(|l| l == label)
    }

    /// Check if at least one label of `other` is present in `self`.
    ///
    /// This is the single comparison primitive for all visibility decisions:
    /// true iff the intersection of the two sets is non-empty.
    pub fn matches(&self, other: &Groups) -> bool {
        other.0.iter().any(|l| self.has_group(l))
    }

    /// Check set equality: same cardinality and every label of `other`
    /// present in `self`.
    pub fn equal(&self, other: &Groups) -> bool {
        self.0.len() == other.0.len() && other.0.iter().all(|l| self.has_group(l))
    }

    /// Order-independent 32-bit FNV-1a hash over the sorted labels followed
    /// by the decimal-encoded cardinality. Set-equal group sets hash
    /// identically regardless of construction order.
    pub fn hash(&self) -> u32 {
        let mut labels: Vec<&str> = self.0.iter().map(String::as_str).collect();
        labels.sort_unstable();
        let mut h = FNV_OFFSET_BASIS;
        for label in labels {
            for b in label.bytes() {
                h ^= u32::from(b);
                h = h.wrapping_mul(FNV_PRIME);
            }
        }
        for b in self.0.len().to_string().bytes() {
            h ^= u32::from(b);
            h = h.wrapping_mul(FNV_PRIME);
        }
        h
    }

    /// Number of labels.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the set holds no labels.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over the labels in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for Groups {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut groups = Groups::new();
        groups.add(iter);
        groups
    }
}
