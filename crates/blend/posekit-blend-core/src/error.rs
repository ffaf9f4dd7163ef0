//! Error types for the pose blend engine

use crate::attr::AttrRef;
use serde::{Deserialize, Serialize};

/// Errors raised by a rig host while enumerating, reading, or writing
/// controllable attributes.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum RigError {
    /// The rig handle no longer resolves to anything in the scene
    #[error("rig not available: {rig}")]
    RigUnavailable { rig: String },

    /// An attribute existed at enumeration time but can no longer be read
    #[error("attribute unreadable: {attr} ({reason})")]
    AttributeUnreadable { attr: AttrRef, reason: String },

    /// The attribute is locked, connected, or otherwise rejects writes
    #[error("attribute unwritable: {attr} ({reason})")]
    AttributeUnwritable { attr: AttrRef, reason: String },
}

impl RigError {
    /// Check whether this error invalidates the whole blend session.
    ///
    /// Per-attribute failures are skip-and-record; only a vanished rig is
    /// fatal.
    #[inline]
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::RigUnavailable { .. })
    }

    /// Get error category for logging/metrics
    #[inline]
    pub fn category(&self) -> &'static str {
        match self {
            Self::RigUnavailable { .. } => "rig",
            Self::AttributeUnreadable { .. } => "read",
            Self::AttributeUnwritable { .. } => "write",
        }
    }
}

/// Errors raised by the blend engine itself.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum BlendError {
    /// A fatal host error ended the operation
    #[error(transparent)]
    Rig(#[from] RigError),

    /// A different pose already has an active session; the half-blended rig
    /// state must not become the next pre-blend snapshot
    #[error("blend session for pose '{pending}' is active; cancel or commit before starting '{requested}'")]
    SessionActive { pending: String, requested: String },
}
