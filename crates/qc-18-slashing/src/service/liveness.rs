//! # Liveness Tracker
//!
//! Consumes one signing observation per validator per block.
//!
//! ## Algorithm
//!
//! 1. Load signing info (or start tracking at this height)
//! 2. Advance the window offset and read the slot being overwritten
//! 3. Move the signed counter by at most one so it always equals the
//!    window popcount, without rescanning
//! 4. Once a full window of history exists, punish validators below the
//!    minimum: slash, revoke, jail
//!
//! Cost per observation is O(1) regardless of window size.

use super::SlashingService;
use crate::domain::{
    PublicKey, SigningWindow, SlashingParams, SlotUpdate, Timestamp, ValidatorAddress,
    ValidatorSigningInfo,
};
use crate::error::SlashingResult;
use crate::events::{SkipReason, SlashingEvent};
use crate::ports::outbound::{KeyValueStore, ParamsProvider, ValidatorSetGateway};
use tracing::{debug, info, warn};

/// One validator's signing status for one block.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SigningObservation {
    pub address: ValidatorAddress,
    pub public_key: PublicKey,
    pub power: u64,
    pub signed: bool,
    pub height: u64,
    pub time: Timestamp,
}

#[derive(Clone, Copy, Debug, Default)]
pub(super) struct LivenessOutcome {
    pub absent: bool,
    pub punished: bool,
}

impl<S, G, P> SlashingService<S, G, P>
where
    S: KeyValueStore,
    G: ValidatorSetGateway,
    P: ParamsProvider,
{
    pub(super) fn handle_signature(
        &mut self,
        params: &SlashingParams,
        observation: &SigningObservation,
    ) -> SlashingResult<LivenessOutcome> {
        let window = SigningWindow::new(params.signed_blocks_window);
        let address = observation.address;

        let mut info = self
            .store
            .get_signing_info(&address)?
            .unwrap_or_else(|| ValidatorSigningInfo::new(observation.height));

        let slot = window.advance(&mut info);
        let previous = self.store.get_bit(&address, slot)?;
        let update = SlotUpdate::between(previous, observation.signed);
        if let Some(bit) = update.new_bit() {
            self.store.set_bit(&address, slot, bit)?;
        }
        info.signed_blocks_counter = update.apply(info.signed_blocks_counter);

        let mut outcome = LivenessOutcome::default();

        if !observation.signed {
            debug!(
                validator = %address,
                height = observation.height,
                signed = info.signed_blocks_counter,
                threshold = params.min_signed_per_window,
                "[qc-18] Absent validator"
            );
            self.emit(SlashingEvent::Absent {
                validator: address,
                height: observation.height,
                signed_blocks: info.signed_blocks_counter,
                threshold: params.min_signed_per_window,
            });
            outcome.absent = true;
        }

        if window.is_past_grace_period(&info, observation.height)
            && window.is_below_threshold(&info, params.min_signed_per_window)
        {
            outcome.punished = self.punish_downtime(params, observation, &mut info)?;
        }

        self.store.set_signing_info(&address, &info)?;
        Ok(outcome)
    }

    /// Slash, revoke and jail unless the validator is unknown or already
    /// revoked. Returns whether punishment was applied.
    fn punish_downtime(
        &mut self,
        params: &SlashingParams,
        observation: &SigningObservation,
        info: &mut ValidatorSigningInfo,
    ) -> SlashingResult<bool> {
        let address = observation.address;

        let skip = match self.gateway.validator_by_pubkey(&observation.public_key) {
            Some(validator) if !validator.is_revoked() => None,
            Some(_) => Some(SkipReason::AlreadyRevoked),
            None => Some(SkipReason::NotFound),
        };

        if let Some(reason) = skip {
            info!(
                validator = %address,
                height = observation.height,
                ?reason,
                "[qc-18] Validator would have been slashed for downtime, but was either not found or already revoked"
            );
            self.emit(SlashingEvent::DowntimeSkipped {
                validator: address,
                height: observation.height,
                reason,
            });
            return Ok(false);
        }

        warn!(
            validator = %address,
            min_height = SigningWindow::new(params.signed_blocks_window)
                .grace_period_end(info.start_height),
            signed = info.signed_blocks_counter,
            threshold = params.min_signed_per_window,
            "[qc-18] Validator past grace period and below signed blocks threshold"
        );

        let fraction = params.slash_fraction_downtime;
        self.gateway
            .slash(&address, observation.height, observation.power, fraction)?;
        self.gateway.revoke(&address)?;
        info.jailed_until = observation
            .time
            .saturating_add(params.downtime_unbond_duration);
        self.emit(SlashingEvent::DowntimeSlashed {
            validator: address,
            height: observation.height,
            power: observation.power,
            fraction,
            jailed_until: info.jailed_until,
        });
        Ok(true)
    }
}
