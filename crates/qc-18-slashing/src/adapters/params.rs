//! Static Parameter Provider
//!
//! Serves a fixed, validated [`SlashingParams`] set, typically loaded from
//! node configuration at startup.

use crate::domain::{SlashFraction, SlashingParams};
use crate::error::SlashingResult;
use crate::ports::outbound::ParamsProvider;
use std::time::Duration;
use tracing::info;

#[derive(Clone, Debug, Default)]
pub struct StaticParamsProvider {
    params: SlashingParams,
}

impl StaticParamsProvider {
    /// Validates before accepting.
    pub fn new(params: SlashingParams) -> SlashingResult<Self> {
        params.validate()?;
        Ok(Self { params })
    }

    pub fn from_json(json: &str) -> SlashingResult<Self> {
        let params = SlashingParams::from_json(json)?;
        info!(
            window = params.signed_blocks_window,
            min_signed = params.min_signed_per_window,
            "[qc-18] Loaded slashing parameters"
        );
        Ok(Self { params })
    }

    pub fn params(&self) -> &SlashingParams {
        &self.params
    }
}

impl ParamsProvider for StaticParamsProvider {
    fn signed_blocks_window(&self) -> u64 {
        self.params.signed_blocks_window
    }

    fn min_signed_per_window(&self) -> u64 {
        self.params.min_signed_per_window
    }

    fn max_evidence_age(&self) -> Duration {
        self.params.max_evidence_age
    }

    fn slash_fraction_double_sign(&self) -> SlashFraction {
        self.params.slash_fraction_double_sign
    }

    fn slash_fraction_downtime(&self) -> SlashFraction {
        self.params.slash_fraction_downtime
    }

    fn double_sign_unbond_duration(&self) -> Duration {
        self.params.double_sign_unbond_duration
    }

    fn downtime_unbond_duration(&self) -> Duration {
        self.params.downtime_unbond_duration
    }

    fn snapshot(&self) -> SlashingParams {
        self.params.clone()
    }
}
