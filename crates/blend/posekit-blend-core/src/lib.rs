//! Posekit Blend Core (host-agnostic)
//!
//! Interactive pose blending for animation rigs: capture the rig's current
//! values as a restore point, apply a stored pose, capture the result as the
//! blend target, then interpolate between the two snapshots under a
//! caller-driven weight until the gesture commits or cancels. The crate
//! defines the pose/attribute data model, the host traits adapters implement,
//! structured per-operation reports, and the `BlendEngine` session state
//! machine. No scene API appears anywhere in here.

pub mod asset;
pub mod attr;
pub mod error;
pub mod ignore;
pub mod interp;
pub mod report;
pub mod rig;
pub mod session;
pub mod snapshot;

// Re-exports for consumers (hosts and UI layers)
pub use asset::{PoseAsset, PoseData};
pub use attr::{AttrRef, RigHandle};
pub use error::{BlendError, RigError};
pub use ignore::{IgnoreRules, DEFAULT_IGNORED_NAMES};
pub use interp::lerp_f32;
pub use report::{BlendReport, BlendWarning};
pub use rig::{apply_through_adapter, ApplyOutcome, PoseApplier, RigAdapter};
pub use session::{BlendEngine, SessionPhase};
pub use snapshot::Snapshot;
