//! # Validator Signing Info
//!
//! Per-validator liveness bookkeeping. One record per validator ever seen,
//! never deleted.

use crate::domain::Timestamp;
use serde::{Deserialize, Serialize};

/// Liveness bookkeeping for one validator.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatorSigningInfo {
    /// Height at which tracking began. Set once.
    pub start_height: u64,
    /// Blocks processed for this validator; `index_offset % window` is the
    /// next slot to write.
    pub index_offset: u64,
    /// Number of `true` bits currently in the window.
    pub signed_blocks_counter: u64,
    /// Validator may not be reactivated before this time. Zero = not jailed.
    pub jailed_until: Timestamp,
}

impl ValidatorSigningInfo {
    /// Fresh record with zeroed counters.
    pub fn new(start_height: u64) -> Self {
        Self {
            start_height,
            ..Default::default()
        }
    }

    /// Observations currently held in the window.
    pub fn observed_in_window(&self, window: u64) -> u64 {
        self.index_offset.min(window)
    }

    /// Observations in the window that were not signed.
    pub fn missed_in_window(&self, window: u64) -> u64 {
        self.observed_in_window(window)
            .saturating_sub(self.signed_blocks_counter)
    }

    pub fn is_jailed_at(&self, time: Timestamp) -> bool {
        time < self.jailed_until
    }
}
