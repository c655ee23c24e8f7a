//! # Double-Sign Evidence
//!
//! Evidence reaches this subsystem already verified. The only check left is
//! staleness: evidence older than the maximum age is discarded so that old
//! conflicts cannot punish delegators who joined after the stake turned over.

use crate::domain::{PublicKey, Timestamp, ValidatorAddress};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Verified proof that a validator signed two blocks at one height.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoubleSignEvidence {
    pub public_key: PublicKey,
    pub infraction_height: u64,
    pub infraction_time: Timestamp,
    /// Voting power at the infraction height
    pub power: u64,
}

impl DoubleSignEvidence {
    pub fn address(&self) -> ValidatorAddress {
        self.public_key.address()
    }

    /// Age relative to the current block time.
    pub fn age_at(&self, block_time: Timestamp) -> Duration {
        block_time.saturating_duration_since(self.infraction_time)
    }

    /// Strictly older than `max_age`. Evidence at exactly `max_age` is fresh.
    pub fn is_stale(&self, block_time: Timestamp, max_age: Duration) -> bool {
        self.age_at(block_time) > max_age
    }
}

/// Misbehaviour reported by consensus, keyed by validator address.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Misbehaviour {
    /// Two conflicting votes at one height
    DuplicateVote {
        address: ValidatorAddress,
        height: u64,
        time: Timestamp,
        power: u64,
    },
    /// Evidence type this subsystem does not punish
    Unknown {
        kind: String,
        address: ValidatorAddress,
    },
}
