//! Driving Ports (API - Inbound)

use crate::domain::{
    AddressIndex, DoubleSignEvidence, PublicKey, Timestamp, ValidatorAddress,
    ValidatorSigningInfo,
};
use crate::error::SlashingResult;
use crate::events::{BlockSigningReport, SlashingEvent};

/// Summary of one processed block.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BlockOutcome {
    pub height: u64,
    /// Votes run through the liveness tracker
    pub votes_processed: usize,
    /// Votes skipped because the validator could not be resolved
    pub votes_skipped: usize,
    pub absences: usize,
    pub downtime_slashes: usize,
    pub double_sign_slashes: usize,
    /// Stale or unsupported evidence
    pub evidence_ignored: usize,
}

impl BlockOutcome {
    pub fn empty(height: u64) -> Self {
        Self {
            height,
            ..Default::default()
        }
    }

    pub fn punished(&self) -> usize {
        self.downtime_slashes + self.double_sign_slashes
    }
}

/// Primary Slashing API
///
/// `process_block` is the per-block entry point. The single-report methods
/// exist for hosts that drive the handlers themselves; each commits its own
/// writes.
pub trait SlashingApi {
    /// Consume one block's votes and evidence atomically.
    ///
    /// On error nothing this block staged reaches the store. A fatal error
    /// (see `SlashingError::is_fatal`) means block processing must abort.
    fn process_block(
        &mut self,
        index: &mut AddressIndex,
        report: BlockSigningReport,
    ) -> SlashingResult<BlockOutcome>;

    /// Record whether one validator signed the block at `height`.
    ///
    /// Must be called exactly once per active validator per block.
    fn report_signing(
        &mut self,
        address: ValidatorAddress,
        public_key: PublicKey,
        power: u64,
        signed: bool,
        height: u64,
        time: Timestamp,
    ) -> SlashingResult<()>;

    /// Punish a verified double sign, unless the evidence is stale.
    fn report_double_sign(
        &mut self,
        evidence: DoubleSignEvidence,
        block_time: Timestamp,
    ) -> SlashingResult<()>;

    /// Start tracking a newly bonded validator.
    fn on_validator_bonded(
        &mut self,
        index: &mut AddressIndex,
        public_key: PublicKey,
        height: u64,
    ) -> SlashingResult<()>;

    /// Return a jailed validator to the active set once its jail time passed.
    fn unjail(&mut self, address: ValidatorAddress, block_time: Timestamp) -> SlashingResult<()>;

    fn signing_info(&self, address: &ValidatorAddress)
        -> SlashingResult<Option<ValidatorSigningInfo>>;

    /// Unsigned observations in the current window.
    fn missed_blocks(&self, address: &ValidatorAddress) -> SlashingResult<u64>;

    /// Take accumulated observability events.
    fn drain_events(&mut self) -> Vec<SlashingEvent>;
}
