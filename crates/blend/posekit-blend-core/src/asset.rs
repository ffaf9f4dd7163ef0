//! Pose asset data model.
//!
//! A pose is an opaque mapping of attribute references to stored values plus
//! a unique display name. The engine never mutates a pose and never asks
//! where it came from; loading, saving, and thumbnailing are owned by the
//! asset pipeline around the engine.

use crate::attr::AttrRef;
use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

/// Stored attribute values for one pose.
///
/// Keys are usually authored rig-agnostic (no namespace prefix);
/// [`PoseData::value_for`] matches a namespaced scene attribute against its
/// local form so one pose applies to every copy of the rig.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PoseData {
    values: HashMap<AttrRef, f32>,
}

impl PoseData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, attr: AttrRef, value: f32) {
        self.values.insert(attr, value);
    }

    /// Exact-key lookup.
    pub fn get(&self, attr: &AttrRef) -> Option<f32> {
        self.values.get(attr).copied()
    }

    /// Stored value for a scene attribute: exact match first, then the
    /// namespace-stripped form.
    pub fn value_for(&self, attr: &AttrRef) -> Option<f32> {
        if let Some(v) = self.values.get(attr) {
            return Some(*v);
        }
        if attr.is_namespaced() {
            return self.values.get(&attr.local()).copied();
        }
        None
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&AttrRef, f32)> {
        self.values.iter().map(|(k, v)| (k, *v))
    }
}

impl FromIterator<(AttrRef, f32)> for PoseData {
    fn from_iter<I: IntoIterator<Item = (AttrRef, f32)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

/// A named pose over an opaque attribute/value mapping.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PoseAsset {
    /// Unique display name; the engine uses it to recognize re-selection of
    /// the pose that already has an active session.
    pub name: String,
    #[serde(default)]
    pub data: PoseData,
    /// Optional user flag carried through untouched.
    #[serde(default)]
    pub favorite: bool,
}

impl PoseAsset {
    pub fn new(name: impl Into<String>, data: PoseData) -> Self {
        Self {
            name: name.into(),
            data,
            favorite: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}
