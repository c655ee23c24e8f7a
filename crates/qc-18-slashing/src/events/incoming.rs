//! Incoming events for the Slashing subsystem

use crate::domain::{Misbehaviour, Timestamp, ValidatorAddress};
use serde::{Deserialize, Serialize};

/// Whether one validator signed the previous block.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatorVote {
    pub address: ValidatorAddress,
    pub power: u64,
    pub signed: bool,
}

impl ValidatorVote {
    pub fn new(address: ValidatorAddress, power: u64, signed: bool) -> Self {
        Self {
            address,
            power,
            signed,
        }
    }
}

/// Everything the slashing subsystem consumes for one block.
///
/// `votes` holds exactly one entry per active validator; order does not
/// matter. `evidence` may be empty.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockSigningReport {
    pub height: u64,
    pub time: Timestamp,
    pub votes: Vec<ValidatorVote>,
    pub evidence: Vec<Misbehaviour>,
}

impl BlockSigningReport {
    pub fn new(height: u64, time: Timestamp) -> Self {
        Self {
            height,
            time,
            ..Default::default()
        }
    }

    pub fn with_votes(mut self, votes: Vec<ValidatorVote>) -> Self {
        self.votes = votes;
        self
    }

    pub fn with_evidence(mut self, evidence: Vec<Misbehaviour>) -> Self {
        self.evidence = evidence;
        self
    }
}
