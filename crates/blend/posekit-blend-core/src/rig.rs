//! Rig host traits.
//!
//! The engine never talks to a scene directly; it goes through `RigAdapter`
//! (enumerate/read/write) and `PoseApplier` (pose application). Hosts
//! implement these and hand themselves to `BlendEngine::new()`. A default
//! `apply_pose` routed through the adapter surface is provided for hosts
//! without native pose tooling.

use crate::asset::PoseAsset;
use crate::attr::{AttrRef, RigHandle};
use crate::error::RigError;
use crate::report::BlendWarning;
use log::warn;
use serde::{Deserialize, Serialize};

/// Scene access for one host backend.
///
/// Enumeration must be deterministic, must list only attributes a user could
/// key (no locked-by-type or output-only plugs), and must already exclude the
/// host's configured [`IgnoreRules`](crate::IgnoreRules) so snapshots and
/// blends never see a space switch.
pub trait RigAdapter {
    /// Rigs currently present in the scene.
    fn rigs_in_scene(&mut self) -> Result<Vec<RigHandle>, RigError>;

    /// Controllable attributes of one rig, filtered and in stable order.
    fn list_controllable_attributes(&mut self, rig: &RigHandle) -> Result<Vec<AttrRef>, RigError>;

    /// Current value of one attribute.
    fn read_value(&mut self, attr: &AttrRef) -> Result<f32, RigError>;

    /// Set one attribute. `AttributeUnwritable` is per-attribute and callers
    /// skip-and-record; anything fatal aborts the surrounding operation.
    fn write_value(&mut self, attr: &AttrRef, value: f32) -> Result<(), RigError>;
}

/// Result of applying a pose to a rig.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ApplyOutcome {
    /// Attributes that received a pose value.
    pub applied: Vec<AttrRef>,
    /// Non-fatal skips encountered while writing.
    #[serde(default)]
    pub warnings: Vec<BlendWarning>,
}

/// Pose application service.
///
/// Kept separate from plain scene access so hosts with native pose tooling
/// (mirror tables, member sets) can substitute their own application while
/// the blend engine stays unchanged.
pub trait PoseApplier: RigAdapter {
    /// Write the pose's stored values onto the rig's matching controllable
    /// attributes and report which attributes were actually set.
    fn apply_pose(&mut self, pose: &PoseAsset, rig: &RigHandle) -> Result<ApplyOutcome, RigError> {
        apply_through_adapter(self, pose, rig)
    }
}

/// Default pose application: enumerate the rig, match pose keys (exact, then
/// namespace-stripped), write each matched value, skip-and-record rejects.
pub fn apply_through_adapter<R: RigAdapter + ?Sized>(
    host: &mut R,
    pose: &PoseAsset,
    rig: &RigHandle,
) -> Result<ApplyOutcome, RigError> {
    let mut outcome = ApplyOutcome::default();
    for attr in host.list_controllable_attributes(rig)? {
        let Some(value) = pose.data.value_for(&attr) else {
            continue;
        };
        match host.write_value(&attr, value) {
            Ok(()) => outcome.applied.push(attr),
            Err(err) if err.is_fatal() => return Err(err),
            Err(err) => {
                let reason = match err {
                    RigError::AttributeUnwritable { reason, .. } => reason,
                    other => other.to_string(),
                };
                warn!(
                    "pose '{}': attribute '{}' rejected its value ({}); skipping",
                    pose.name, attr, reason
                );
                outcome
                    .warnings
                    .push(BlendWarning::UnwritableSkipped { attr, reason });
            }
        }
    }
    Ok(outcome)
}
