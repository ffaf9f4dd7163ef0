//! Structured operation results.
//!
//! Every engine operation reports how many attribute writes it performed and
//! which attributes it had to skip, instead of aborting on the first
//! per-attribute failure. The report is owned by the engine, cleared at the
//! top of each public operation, and handed back by reference so the
//! interactive path allocates nothing on success.

use crate::attr::AttrRef;
use serde::{Deserialize, Serialize};

/// One non-fatal condition recorded while capturing, applying, or blending.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum BlendWarning {
    /// Attribute could not be read during a snapshot capture; it is absent
    /// from the snapshot and will not be blended.
    UnreadableSkipped { attr: AttrRef, reason: String },
    /// Attribute rejected a write; other attributes were still written.
    UnwritableSkipped { attr: AttrRef, reason: String },
    /// Attribute exists in only one of the two session snapshots and is
    /// excluded from interpolation.
    SnapshotMismatch { attr: AttrRef },
    /// A non-empty pose matched zero controllable attributes on the rig.
    PoseUnmatched { pose: String },
}

/// Result of one engine operation.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct BlendReport {
    /// Attribute writes performed by the operation.
    pub written: usize,
    #[serde(default)]
    pub warnings: Vec<BlendWarning>,
}

impl BlendReport {
    #[inline]
    pub fn clear(&mut self) {
        self.written = 0;
        self.warnings.clear();
    }

    #[inline]
    pub fn push_warning(&mut self, warning: BlendWarning) {
        self.warnings.push(warning);
    }

    /// True when the operation completed without skipping anything.
    #[inline]
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clear_resets_counts_and_warnings() {
        let mut report = BlendReport::default();
        report.written = 12;
        report.push_warning(BlendWarning::PoseUnmatched {
            pose: "relaxed".to_string(),
        });
        assert!(!report.is_clean());
        report.clear();
        assert!(report.is_clean());
        assert_eq!(report.written, 0);
    }
}
