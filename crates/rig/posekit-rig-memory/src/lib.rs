//! In-memory rig host.
//!
//! `MemoryScene` implements [`RigAdapter`] and [`PoseApplier`] over plain
//! maps: rigs with keyable, lockable scalar attributes and nothing else. It
//! stands in wherever no real scene backend is attached (tests, benches,
//! headless tools) and keeps read/write counters so tests can observe exactly
//! what the blend engine did to the rig.
//!
//! Scenes can be built programmatically or deserialized from a
//! [`SceneSpec`] JSON document:
//!
//! ```json
//! {
//!   "rigs": {
//!     "hero": {
//!       "hero:hand_ctrl.spread": 0.25,
//!       "hero:foot_ctrl.roll": { "value": -4.0, "locked": true },
//!       "hero:tail_ctrl.curl": { "value": 0.0, "keyable": false }
//!     }
//!   }
//! }
//! ```

use std::collections::BTreeMap;

use log::debug;
use serde::Deserialize;

use posekit_blend_core::{AttrRef, IgnoreRules, PoseApplier, RigAdapter, RigError, RigHandle};

/// One attribute slot: current value plus the host flags that matter to
/// enumeration (`keyable`) and writes (`locked`).
#[derive(Clone, Copy, Debug)]
struct AttrState {
    value: f32,
    keyable: bool,
    locked: bool,
}

/// Declarative form of one attribute in a [`SceneSpec`]: either a bare value
/// or a value with flags.
#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
pub enum AttrSpec {
    Value(f32),
    Detailed {
        value: f32,
        #[serde(default = "default_keyable")]
        keyable: bool,
        #[serde(default)]
        locked: bool,
    },
}

fn default_keyable() -> bool {
    true
}

impl AttrSpec {
    fn state(&self) -> AttrState {
        match *self {
            AttrSpec::Value(value) => AttrState {
                value,
                keyable: true,
                locked: false,
            },
            AttrSpec::Detailed {
                value,
                keyable,
                locked,
            } => AttrState {
                value,
                keyable,
                locked,
            },
        }
    }
}

/// Serde form of a whole scene: rig name to attribute map.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct SceneSpec {
    pub rigs: BTreeMap<String, RigSpec>,
}

/// Attribute reference strings to their specs, for one rig.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(transparent)]
pub struct RigSpec {
    pub attrs: BTreeMap<String, AttrSpec>,
}

/// Deterministic in-memory scene of rigs and scalar attributes.
///
/// Iteration everywhere follows `BTreeMap` order, so enumeration and the
/// default pose application are stable across runs.
#[derive(Debug, Default)]
pub struct MemoryScene {
    rigs: BTreeMap<RigHandle, BTreeMap<AttrRef, AttrState>>,
    ignore: IgnoreRules,
    reads: usize,
    writes: usize,
}

impl MemoryScene {
    /// Empty scene with the default ignore rules.
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty scene with caller-provided ignore rules.
    pub fn with_ignore_rules(ignore: IgnoreRules) -> Self {
        Self {
            ignore,
            ..Self::default()
        }
    }

    /// Build a scene from its declarative spec. Fails on the first attribute
    /// reference that does not parse.
    pub fn from_spec(spec: SceneSpec) -> Result<Self, String> {
        let mut scene = Self::new();
        for (rig_name, rig_spec) in spec.rigs {
            let rig = RigHandle::from(rig_name);
            scene.add_rig(rig.clone());
            for (attr_str, attr_spec) in rig_spec.attrs {
                let attr = AttrRef::parse(&attr_str)
                    .map_err(|e| format!("rig '{rig}': {e}"))?;
                scene.insert_state(&rig, attr, attr_spec.state());
            }
        }
        debug!(
            "memory scene loaded: {} rigs, {} attributes",
            scene.rigs.len(),
            scene.rigs.values().map(BTreeMap::len).sum::<usize>()
        );
        Ok(scene)
    }

    /// Register an empty rig (no-op when it already exists).
    pub fn add_rig(&mut self, rig: impl Into<RigHandle>) {
        self.rigs.entry(rig.into()).or_default();
    }

    /// Add a keyable, unlocked attribute to `rig`, creating the rig if
    /// needed. Re-adding an attribute resets its value and flags.
    pub fn add_attr(&mut self, rig: &RigHandle, attr: AttrRef, value: f32) {
        self.insert_state(
            rig,
            attr,
            AttrState {
                value,
                keyable: true,
                locked: false,
            },
        );
    }

    fn insert_state(&mut self, rig: &RigHandle, attr: AttrRef, state: AttrState) {
        self.rigs.entry(rig.clone()).or_default().insert(attr, state);
    }

    /// Lock or unlock an attribute. Locked attributes stay enumerable and
    /// readable but reject writes. Returns false when the attribute is
    /// unknown.
    pub fn set_locked(&mut self, attr: &AttrRef, locked: bool) -> bool {
        match self.state_mut(attr) {
            Some(state) => {
                state.locked = locked;
                true
            }
            None => false,
        }
    }

    /// Flag an attribute as (non-)keyable. Non-keyable attributes are
    /// excluded from enumeration entirely. Returns false when the attribute
    /// is unknown.
    pub fn set_keyable(&mut self, attr: &AttrRef, keyable: bool) -> bool {
        match self.state_mut(attr) {
            Some(state) => {
                state.keyable = keyable;
                true
            }
            None => false,
        }
    }

    /// Delete one attribute from whichever rig carries it.
    pub fn remove_attr(&mut self, attr: &AttrRef) -> bool {
        for attrs in self.rigs.values_mut() {
            if attrs.remove(attr).is_some() {
                debug!("memory scene: removed attribute '{attr}'");
                return true;
            }
        }
        false
    }

    /// Delete a whole rig and its attributes.
    pub fn remove_rig(&mut self, rig: &RigHandle) -> bool {
        let removed = self.rigs.remove(rig).is_some();
        if removed {
            debug!("memory scene: removed rig '{rig}'");
        }
        removed
    }

    /// Current value of an attribute, bypassing the adapter surface (and its
    /// read counter). Test inspection only.
    pub fn value_of(&self, attr: &AttrRef) -> Option<f32> {
        self.rigs
            .values()
            .find_map(|attrs| attrs.get(attr))
            .map(|state| state.value)
    }

    /// Successful `read_value` calls so far.
    pub fn read_count(&self) -> usize {
        self.reads
    }

    /// Successful `write_value` calls so far.
    pub fn write_count(&self) -> usize {
        self.writes
    }

    /// Zero both counters.
    pub fn reset_counters(&mut self) {
        self.reads = 0;
        self.writes = 0;
    }

    fn state_mut(&mut self, attr: &AttrRef) -> Option<&mut AttrState> {
        self.rigs.values_mut().find_map(|attrs| attrs.get_mut(attr))
    }
}

impl RigAdapter for MemoryScene {
    fn rigs_in_scene(&mut self) -> Result<Vec<RigHandle>, RigError> {
        Ok(self.rigs.keys().cloned().collect())
    }

    fn list_controllable_attributes(&mut self, rig: &RigHandle) -> Result<Vec<AttrRef>, RigError> {
        let attrs = self
            .rigs
            .get(rig)
            .ok_or_else(|| RigError::RigUnavailable {
                rig: rig.to_string(),
            })?;
        Ok(attrs
            .iter()
            .filter(|(attr, state)| state.keyable && !self.ignore.is_ignored(attr.short_name()))
            .map(|(attr, _)| attr.clone())
            .collect())
    }

    fn read_value(&mut self, attr: &AttrRef) -> Result<f32, RigError> {
        let value = self
            .rigs
            .values()
            .find_map(|attrs| attrs.get(attr))
            .map(|state| state.value)
            .ok_or_else(|| RigError::AttributeUnreadable {
                attr: attr.clone(),
                reason: "not in scene".to_string(),
            })?;
        self.reads += 1;
        Ok(value)
    }

    fn write_value(&mut self, attr: &AttrRef, value: f32) -> Result<(), RigError> {
        let state = self.rigs.values_mut().find_map(|attrs| attrs.get_mut(attr));
        match state {
            Some(state) if state.locked => Err(RigError::AttributeUnwritable {
                attr: attr.clone(),
                reason: "locked".to_string(),
            }),
            Some(state) => {
                state.value = value;
                self.writes += 1;
                Ok(())
            }
            None => Err(RigError::AttributeUnwritable {
                attr: attr.clone(),
                reason: "not in scene".to_string(),
            }),
        }
    }
}

impl PoseApplier for MemoryScene {}
