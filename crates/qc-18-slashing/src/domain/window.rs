//! # Signing Window Arithmetic
//!
//! Pure logic behind the circular liveness window. The window is never
//! rescanned: each observation overwrites exactly one slot and the signed
//! counter moves by at most one.
//!
//! ```text
//!   index_offset:  0   1   2   3   4   5   6 ...
//!   slot (W = 4):  0   1   2   3   0   1   2 ...
//!                                  ^ overwrites observation 0
//! ```

use crate::domain::ValidatorSigningInfo;

/// Change to apply to a slot after a new observation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SlotUpdate {
    /// Slot already agrees with the observation.
    Unchanged,
    /// Slot flips to signed; counter increments.
    MarkSigned,
    /// Slot flips to unsigned; counter decrements.
    MarkMissed,
}

impl SlotUpdate {
    pub fn between(previous: bool, signed: bool) -> Self {
        match (previous, signed) {
            (false, true) => Self::MarkSigned,
            (true, false) => Self::MarkMissed,
            _ => Self::Unchanged,
        }
    }

    /// New bit value to write, if any.
    pub fn new_bit(&self) -> Option<bool> {
        match self {
            Self::Unchanged => None,
            Self::MarkSigned => Some(true),
            Self::MarkMissed => Some(false),
        }
    }

    /// Apply to the signed counter.
    pub fn apply(&self, counter: u64) -> u64 {
        match self {
            Self::Unchanged => counter,
            Self::MarkSigned => counter + 1,
            // A `true` bit being cleared implies counter >= 1
            Self::MarkMissed => counter.saturating_sub(1),
        }
    }
}

/// Circular window of `size` slots.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SigningWindow {
    size: u64,
}

impl SigningWindow {
    /// `size` must be non-zero; callers validate parameters first.
    pub fn new(size: u64) -> Self {
        debug_assert!(size > 0, "signing window must be non-empty");
        Self { size }
    }

    /// Slot to write next and advance the offset.
    pub fn advance(&self, info: &mut ValidatorSigningInfo) -> u64 {
        let slot = info.index_offset % self.size;
        info.index_offset += 1;
        slot
    }

    /// Last height still inside the grace period.
    pub fn grace_period_end(&self, start_height: u64) -> u64 {
        start_height.saturating_add(self.size)
    }

    /// Whether a validator at `height` has a full window of history.
    pub fn is_past_grace_period(&self, info: &ValidatorSigningInfo, height: u64) -> bool {
        height > self.grace_period_end(info.start_height)
    }

    /// Downtime condition. Strict: exactly `min_signed` is not downtime.
    pub fn is_below_threshold(&self, info: &ValidatorSigningInfo, min_signed: u64) -> bool {
        info.signed_blocks_counter < min_signed
    }
}
