//! Outgoing events for the Slashing subsystem
//!
//! Observability only: events are drained by the node for logging and
//! metrics and never read back by this subsystem.

use crate::domain::{SlashFraction, Timestamp, ValidatorAddress};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Why a downtime punishment was not applied.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkipReason {
    /// Gateway has no validator for the key
    NotFound,
    /// Validator was already revoked
    AlreadyRevoked,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SlashingEvent {
    /// Validator did not sign the block
    Absent {
        validator: ValidatorAddress,
        height: u64,
        signed_blocks: u64,
        threshold: u64,
    },
    /// Downtime confirmed: slashed, revoked and jailed
    DowntimeSlashed {
        validator: ValidatorAddress,
        height: u64,
        power: u64,
        fraction: SlashFraction,
        jailed_until: Timestamp,
    },
    /// Downtime threshold crossed but punishment skipped
    DowntimeSkipped {
        validator: ValidatorAddress,
        height: u64,
        reason: SkipReason,
    },
    /// Double sign confirmed: slashed, revoked and jailed
    DoubleSignConfirmed {
        validator: ValidatorAddress,
        infraction_height: u64,
        age: Duration,
        fraction: SlashFraction,
        jailed_until: Timestamp,
    },
    /// Double sign evidence older than the maximum age
    DoubleSignIgnored {
        validator: ValidatorAddress,
        infraction_height: u64,
        age: Duration,
        max_age: Duration,
    },
    /// Evidence of a kind this subsystem does not handle
    EvidenceIgnored {
        validator: ValidatorAddress,
        kind: String,
    },
    /// Vote for a validator neither the index nor the gateway knows
    VoteSkipped {
        validator: ValidatorAddress,
        height: u64,
    },
    /// Jailed validator returned to the active set
    Unjailed {
        validator: ValidatorAddress,
        time: Timestamp,
    },
}

impl SlashingEvent {
    pub fn validator(&self) -> ValidatorAddress {
        match self {
            Self::Absent { validator, .. }
            | Self::DowntimeSlashed { validator, .. }
            | Self::DowntimeSkipped { validator, .. }
            | Self::DoubleSignConfirmed { validator, .. }
            | Self::DoubleSignIgnored { validator, .. }
            | Self::EvidenceIgnored { validator, .. }
            | Self::VoteSkipped { validator, .. }
            | Self::Unjailed { validator, .. } => *validator,
        }
    }

    /// Metric label.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Absent { .. } => "absent",
            Self::DowntimeSlashed { .. } => "downtime_slashed",
            Self::DowntimeSkipped { .. } => "downtime_skipped",
            Self::DoubleSignConfirmed { .. } => "double_sign_confirmed",
            Self::DoubleSignIgnored { .. } => "double_sign_ignored",
            Self::EvidenceIgnored { .. } => "evidence_ignored",
            Self::VoteSkipped { .. } => "vote_skipped",
            Self::Unjailed { .. } => "unjailed",
        }
    }
}
