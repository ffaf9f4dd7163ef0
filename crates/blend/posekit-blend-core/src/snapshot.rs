//! Rig attribute snapshots.
//!
//! The engine keeps two of these alive for a whole session (pre-blend and
//! target) and reuses them across sessions; `clear` retains capacity so the
//! interactive blend path never reallocates.

use crate::attr::AttrRef;
use hashbrown::HashMap;

/// Captured attribute values for one rig at one moment.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Snapshot {
    values: HashMap<AttrRef, f32>,
}

impl Snapshot {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn insert(&mut self, attr: AttrRef, value: f32) {
        self.values.insert(attr, value);
    }

    #[inline]
    pub fn get(&self, attr: &AttrRef) -> Option<f32> {
        self.values.get(attr).copied()
    }

    #[inline]
    pub fn contains(&self, attr: &AttrRef) -> bool {
        self.values.contains_key(attr)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Drop all captured values, keeping the allocation.
    #[inline]
    pub fn clear(&mut self) {
        self.values.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (&AttrRef, f32)> {
        self.values.iter().map(|(k, v)| (k, *v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &AttrRef> {
        self.values.keys()
    }
}

impl FromIterator<(AttrRef, f32)> for Snapshot {
    fn from_iter<I: IntoIterator<Item = (AttrRef, f32)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}
