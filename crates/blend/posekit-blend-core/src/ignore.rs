//! Attribute ignore rules.
//!
//! Rigs carry keyable attributes that must never be blended: discrete space
//! switches, follow toggles, IK/FK selectors. Interpolating those produces
//! invalid in-between modes, so adapters exclude them at enumeration time and
//! everything downstream (snapshots, blending, commits) never sees them.

use hashbrown::HashSet;
use serde::{Deserialize, Serialize};

/// Attribute short names excluded by default. Matching is exact and applies
/// to the attribute selector only, not the control name.
pub const DEFAULT_IGNORED_NAMES: &[&str] = &["space", "follow", "parentSpace", "ikFkSwitch"];

/// Configurable set of attribute short names an adapter skips while
/// enumerating controllable attributes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IgnoreRules {
    names: HashSet<String>,
}

impl IgnoreRules {
    /// An empty rule set (nothing ignored).
    pub fn none() -> Self {
        Self {
            names: HashSet::new(),
        }
    }

    /// Build a rule set from attribute short names.
    pub fn with_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    /// Add one attribute short name to the set.
    pub fn add(&mut self, name: impl Into<String>) {
        self.names.insert(name.into());
    }

    /// True when `attr_name` must be excluded from enumeration.
    #[inline]
    pub fn is_ignored(&self, attr_name: &str) -> bool {
        self.names.contains(attr_name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Iterate the ignored names (unordered).
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(|s| s.as_str())
    }
}

impl Default for IgnoreRules {
    fn default() -> Self {
        Self::with_names(DEFAULT_IGNORED_NAMES.iter().copied())
    }
}
