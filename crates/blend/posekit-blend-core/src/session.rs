//! Blend session state machine.
//!
//! Lifecycle: Idle → (begin_blend) → CapturingPre → Blending → (commit or
//! cancel) → Idle. The engine owns its host and two reusable snapshots;
//! `blend()` interpolates between them under caller-controlled weight and
//! writes the result straight back to the rig.

use crate::asset::PoseAsset;
use crate::attr::RigHandle;
use crate::error::{BlendError, RigError};
use crate::interp::lerp_f32;
use crate::report::{BlendReport, BlendWarning};
use crate::rig::{PoseApplier, RigAdapter};
use crate::snapshot::Snapshot;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

/// Where a session currently is. Derived from session state, never stored.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionPhase {
    /// No pose pending, no snapshots captured.
    Idle,
    /// A pose is pending but the blend target has not been captured yet.
    CapturingPre,
    /// Both snapshots are populated; `blend()` is live.
    Blending,
}

/// Interactive pose blending over one rig host.
///
/// The host is injected at construction and owned by value; there is no
/// scene-global state anywhere. All operations are synchronous and return a
/// reference to the engine's reusable [`BlendReport`].
#[derive(Debug)]
pub struct BlendEngine<R: PoseApplier> {
    // Owned host
    host: R,

    // Session state
    pending: Option<PoseAsset>,
    pre_blend: Snapshot,
    target: Snapshot,

    // Per-operation report
    report: BlendReport,
}

impl<R: PoseApplier> BlendEngine<R> {
    pub fn new(host: R) -> Self {
        Self {
            host,
            pending: None,
            pre_blend: Snapshot::new(),
            target: Snapshot::new(),
            report: BlendReport::default(),
        }
    }

    /// Borrow the rig host.
    pub fn host(&self) -> &R {
        &self.host
    }

    /// Mutably borrow the rig host.
    pub fn host_mut(&mut self) -> &mut R {
        &mut self.host
    }

    /// Start an interactive blend session for `pose` on `rig`.
    ///
    /// Captures the restore point, applies the pose through the
    /// [`PoseApplier`], captures the blend target, and rests the rig back at
    /// the pre-blend state (weight 0) until the caller moves the weight.
    ///
    /// Re-entry with the pose that already has the session is an idempotent
    /// no-op; asking for a different pose mid-session is
    /// [`BlendError::SessionActive`], because capturing a half-blended rig as
    /// the next restore point would lose the original one.
    ///
    /// On a fatal [`RigError`] the partially built session is left in place;
    /// `cancel()` is the safe exit.
    pub fn begin_blend(
        &mut self,
        pose: &PoseAsset,
        rig: &RigHandle,
    ) -> Result<&BlendReport, BlendError> {
        if let Some(pending) = &self.pending {
            if pending.name == pose.name {
                debug!("pose '{}' already has the active session; keeping caches", pose.name);
                self.report.clear();
                return Ok(&self.report);
            }
            return Err(BlendError::SessionActive {
                pending: pending.name.clone(),
                requested: pose.name.clone(),
            });
        }

        debug!("starting blend session for pose '{}' on rig '{}'", pose.name, rig);
        self.report.clear();
        self.pending = Some(pose.clone());

        // 1) Capture the restore point.
        capture_snapshot(&mut self.host, rig, &mut self.pre_blend, &mut self.report)?;

        // 2) Reach the target state through the applier.
        let outcome = self.host.apply_pose(pose, rig)?;
        if outcome.applied.is_empty() && !pose.data.is_empty() {
            warn!(
                "pose '{}' matched no controllable attributes on rig '{}'",
                pose.name, rig
            );
            self.report
                .push_warning(BlendWarning::PoseUnmatched { pose: pose.name.clone() });
        }
        self.report.written += outcome.applied.len();
        self.report.warnings.extend(outcome.warnings);

        // 3) Capture the blend target and surface any key-set drift.
        capture_snapshot(&mut self.host, rig, &mut self.target, &mut self.report)?;
        self.record_mismatches();

        // 4) Rest the rig at the pre-blend state until the weight moves.
        self.report.written += self.write_blend(0.0);

        debug!(
            "blend session ready for pose '{}': {} attributes, {} warnings",
            pose.name,
            self.pre_blend.len(),
            self.report.warnings.len()
        );
        Ok(&self.report)
    }

    /// Capture the rig's current values as the session's restore point.
    pub fn cache_pre_blend(&mut self, rig: &RigHandle) -> Result<&BlendReport, BlendError> {
        self.report.clear();
        capture_snapshot(&mut self.host, rig, &mut self.pre_blend, &mut self.report)?;
        Ok(&self.report)
    }

    /// Capture the rig's current values as the blend target and record any
    /// key-set drift against the pre-blend snapshot.
    pub fn cache_blend_target(&mut self, rig: &RigHandle) -> Result<&BlendReport, BlendError> {
        self.report.clear();
        capture_snapshot(&mut self.host, rig, &mut self.target, &mut self.report)?;
        self.record_mismatches();
        Ok(&self.report)
    }

    /// Write `pre + (target - pre) * weight` for every attribute present in
    /// both snapshots.
    ///
    /// Weight is intentionally unclamped so sliders can overshoot past the
    /// target or undershoot behind the restore point. Attributes on only one
    /// side of the session are skipped; attributes that reject the write are
    /// recorded and skipped. Deterministic and idempotent for a given weight,
    /// and allocation-free on the success path.
    pub fn blend(&mut self, weight: f32) -> &BlendReport {
        self.report.clear();
        self.report.written = self.write_blend(weight);
        &self.report
    }

    /// Apply `pose`'s raw stored values through the applier and end the
    /// session.
    ///
    /// Re-applying (rather than trusting a final `blend(1.0)`) lands the rig
    /// exactly on the stored values no matter where the weight last was.
    /// From `Idle` this is a plain pose apply. The pose does not have to be
    /// the pending one; committing anything ends the session.
    pub fn commit(
        &mut self,
        pose: &PoseAsset,
        rig: &RigHandle,
    ) -> Result<&BlendReport, BlendError> {
        self.report.clear();
        let outcome = self.host.apply_pose(pose, rig)?;
        if outcome.applied.is_empty() && !pose.data.is_empty() {
            warn!(
                "pose '{}' matched no controllable attributes on rig '{}'",
                pose.name, rig
            );
            self.report
                .push_warning(BlendWarning::PoseUnmatched { pose: pose.name.clone() });
        }
        self.report.written = outcome.applied.len();
        self.report.warnings.extend(outcome.warnings);
        self.clear_session();
        debug!("committed pose '{}' on rig '{}'", pose.name, rig);
        Ok(&self.report)
    }

    /// Drop the session without touching the rig.
    pub fn cancel(&mut self) {
        if let Some(pose) = &self.pending {
            debug!("cancelled blend session for pose '{}'", pose.name);
        }
        self.clear_session();
        self.report.clear();
    }

    /// Current phase, derived from what the session holds.
    pub fn phase(&self) -> SessionPhase {
        if !self.pre_blend.is_empty() && !self.target.is_empty() {
            SessionPhase::Blending
        } else if self.pending.is_some() || !self.pre_blend.is_empty() || !self.target.is_empty() {
            SessionPhase::CapturingPre
        } else {
            SessionPhase::Idle
        }
    }

    pub fn is_blending(&self) -> bool {
        self.phase() == SessionPhase::Blending
    }

    /// The pose whose session is active, if any.
    pub fn pending_pose(&self) -> Option<&PoseAsset> {
        self.pending.as_ref()
    }

    /// Result of the most recent operation.
    pub fn last_report(&self) -> &BlendReport {
        &self.report
    }

    fn clear_session(&mut self) {
        self.pending = None;
        self.pre_blend.clear();
        self.target.clear();
    }

    /// Warn about attributes present on only one side of the session.
    fn record_mismatches(&mut self) {
        for attr in self.pre_blend.keys() {
            if !self.target.contains(attr) {
                warn!(
                    "attribute '{}' vanished before target capture; excluded from blend",
                    attr
                );
                self.report
                    .warnings
                    .push(BlendWarning::SnapshotMismatch { attr: attr.clone() });
            }
        }
        for attr in self.target.keys() {
            if !self.pre_blend.contains(attr) {
                warn!(
                    "attribute '{}' appeared after pre-blend capture; excluded from blend",
                    attr
                );
                self.report
                    .warnings
                    .push(BlendWarning::SnapshotMismatch { attr: attr.clone() });
            }
        }
    }

    /// Interpolate over the snapshot intersection; returns writes performed.
    fn write_blend(&mut self, weight: f32) -> usize {
        let mut written = 0;
        for (attr, pre) in self.pre_blend.iter() {
            let Some(target) = self.target.get(attr) else {
                continue;
            };
            match self.host.write_value(attr, lerp_f32(pre, target, weight)) {
                Ok(()) => written += 1,
                Err(err) => {
                    let reason = match err {
                        RigError::AttributeUnwritable { reason, .. } => reason,
                        other => other.to_string(),
                    };
                    warn!(
                        "blend: attribute '{}' rejected its value ({}); skipping",
                        attr, reason
                    );
                    self.report.warnings.push(BlendWarning::UnwritableSkipped {
                        attr: attr.clone(),
                        reason,
                    });
                }
            }
        }
        written
    }
}

/// Enumerate `rig` and read every controllable attribute into `snap`.
/// Unreadable attributes are skipped and recorded; a vanished rig is fatal.
fn capture_snapshot<R: RigAdapter>(
    host: &mut R,
    rig: &RigHandle,
    snap: &mut Snapshot,
    report: &mut BlendReport,
) -> Result<(), RigError> {
    snap.clear();
    for attr in host.list_controllable_attributes(rig)? {
        match host.read_value(&attr) {
            Ok(value) => snap.insert(attr, value),
            Err(err) if err.is_fatal() => return Err(err),
            Err(err) => {
                let reason = match err {
                    RigError::AttributeUnreadable { reason, .. } => reason,
                    other => other.to_string(),
                };
                warn!(
                    "capture: attribute '{}' could not be read ({}); skipping",
                    attr, reason
                );
                report.push_warning(BlendWarning::UnreadableSkipped { attr, reason });
            }
        }
    }
    Ok(())
}
