//! # Double-Sign Handler
//!
//! Slashes, revokes and jails a validator for verified equivocation. The
//! downtime bookkeeping (`index_offset`, `signed_blocks_counter`) is left
//! untouched: the two tracks are independent.

use super::SlashingService;
use crate::domain::{DoubleSignEvidence, SlashingParams, Timestamp};
use crate::error::{SlashingError, SlashingResult};
use crate::events::SlashingEvent;
use crate::ports::outbound::{KeyValueStore, ParamsProvider, ValidatorSetGateway};
use tracing::{error, info, warn};

impl<S, G, P> SlashingService<S, G, P>
where
    S: KeyValueStore,
    G: ValidatorSetGateway,
    P: ParamsProvider,
{
    /// Returns whether the evidence was acted on (`false` = stale).
    pub(super) fn handle_double_sign(
        &mut self,
        params: &SlashingParams,
        evidence: &DoubleSignEvidence,
        block_time: Timestamp,
    ) -> SlashingResult<bool> {
        let address = evidence.address();
        let age = evidence.age_at(block_time);
        let max_age = params.max_evidence_age;

        if evidence.is_stale(block_time, max_age) {
            info!(
                validator = %address,
                height = evidence.infraction_height,
                ?age,
                ?max_age,
                "[qc-18] Ignored double sign past max evidence age"
            );
            self.emit(SlashingEvent::DoubleSignIgnored {
                validator: address,
                infraction_height: evidence.infraction_height,
                age,
                max_age,
            });
            return Ok(false);
        }

        warn!(
            validator = %address,
            height = evidence.infraction_height,
            ?age,
            ?max_age,
            "[qc-18] Confirmed double sign"
        );

        let mut info = self.store.get_signing_info(&address)?.ok_or_else(|| {
            error!(
                validator = %address,
                "[qc-18] Expected signing info for double signer but not found"
            );
            SlashingError::MissingSigningInfo { address }
        })?;

        let fraction = params.slash_fraction_double_sign;
        self.gateway
            .slash(&address, evidence.infraction_height, evidence.power, fraction)?;
        self.gateway.revoke(&address)?;

        info.jailed_until = block_time.saturating_add(params.double_sign_unbond_duration);
        self.store.set_signing_info(&address, &info)?;
        self.emit(SlashingEvent::DoubleSignConfirmed {
            validator: address,
            infraction_height: evidence.infraction_height,
            age,
            fraction,
            jailed_until: info.jailed_until,
        });
        Ok(true)
    }
}
