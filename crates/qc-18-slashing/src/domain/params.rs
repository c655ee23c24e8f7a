//! Slashing parameters and validation
//!
//! # Example
//!
//! ```ignore
//! use qc_18_slashing::domain::SlashingParamsBuilder;
//! use std::time::Duration;
//!
//! let params = SlashingParamsBuilder::new()
//!     .signed_blocks_window(10_000)
//!     .min_signed_per_window(5_000)
//!     .max_evidence_age(Duration::from_secs(48 * 3600))
//!     .build()
//!     .expect("Valid params");
//! ```

use crate::domain::SlashFraction;
use crate::error::{SlashingError, SlashingResult};
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DurationSeconds};
use std::time::Duration;

/// Default window size in blocks.
pub const DEFAULT_SIGNED_BLOCKS_WINDOW: u64 = 100;
/// Default minimum signed blocks per window.
pub const DEFAULT_MIN_SIGNED_PER_WINDOW: u64 = 50;

/// Tunables for liveness tracking and slashing.
///
/// Durations are (de)serialized as whole seconds.
#[serde_as]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SlashingParams {
    /// Window size in blocks (> 0)
    pub signed_blocks_window: u64,
    /// Downtime threshold (<= window)
    pub min_signed_per_window: u64,
    /// Evidence older than this is discarded
    #[serde_as(as = "DurationSeconds<u64>")]
    pub max_evidence_age: Duration,
    pub slash_fraction_double_sign: SlashFraction,
    pub slash_fraction_downtime: SlashFraction,
    /// Jail time after a double sign
    #[serde_as(as = "DurationSeconds<u64>")]
    pub double_sign_unbond_duration: Duration,
    /// Jail time after downtime
    #[serde_as(as = "DurationSeconds<u64>")]
    pub downtime_unbond_duration: Duration,
}

impl Default for SlashingParams {
    fn default() -> Self {
        Self {
            signed_blocks_window: DEFAULT_SIGNED_BLOCKS_WINDOW,
            min_signed_per_window: DEFAULT_MIN_SIGNED_PER_WINDOW,
            max_evidence_age: Duration::from_secs(2 * 60),
            slash_fraction_double_sign: SlashFraction::from_bps(500).unwrap_or_default(), // 5%
            slash_fraction_downtime: SlashFraction::from_bps(100).unwrap_or_default(), // 1%
            double_sign_unbond_duration: Duration::from_secs(60 * 60),
            downtime_unbond_duration: Duration::from_secs(10 * 60),
        }
    }
}

impl SlashingParams {
    /// Parse from JSON and validate. Missing fields take their defaults.
    pub fn from_json(json: &str) -> SlashingResult<Self> {
        let params: Self =
            serde_json::from_str(json).map_err(|e| SlashingError::InvalidParams {
                reason: e.to_string(),
            })?;
        params.validate()?;
        Ok(params)
    }

    pub fn to_json(&self) -> SlashingResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| SlashingError::InvalidParams {
            reason: e.to_string(),
        })
    }

    pub fn validate(&self) -> SlashingResult<()> {
        if self.signed_blocks_window == 0 {
            return Err(SlashingError::InvalidParams {
                reason: "signed_blocks_window must be > 0".into(),
            });
        }

        if self.min_signed_per_window > self.signed_blocks_window {
            return Err(SlashingError::InvalidParams {
                reason: format!(
                    "min_signed_per_window {} exceeds window {}",
                    self.min_signed_per_window, self.signed_blocks_window
                ),
            });
        }

        for (name, fraction) in [
            ("slash_fraction_double_sign", self.slash_fraction_double_sign),
            ("slash_fraction_downtime", self.slash_fraction_downtime),
        ] {
            if !fraction.is_valid() {
                return Err(SlashingError::InvalidParams {
                    reason: format!("{} must be within [0, 1], got {} bps", name, fraction.bps()),
                });
            }
        }

        Ok(())
    }
}

/// Fluent builder for [`SlashingParams`].
#[derive(Clone, Debug, Default)]
pub struct SlashingParamsBuilder {
    params: SlashingParams,
}

impl SlashingParamsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn signed_blocks_window(mut self, window: u64) -> Self {
        self.params.signed_blocks_window = window;
        self
    }

    pub fn min_signed_per_window(mut self, min_signed: u64) -> Self {
        self.params.min_signed_per_window = min_signed;
        self
    }

    pub fn max_evidence_age(mut self, age: Duration) -> Self {
        self.params.max_evidence_age = age;
        self
    }

    pub fn slash_fraction_double_sign(mut self, fraction: SlashFraction) -> Self {
        self.params.slash_fraction_double_sign = fraction;
        self
    }

    pub fn slash_fraction_downtime(mut self, fraction: SlashFraction) -> Self {
        self.params.slash_fraction_downtime = fraction;
        self
    }

    pub fn double_sign_unbond_duration(mut self, duration: Duration) -> Self {
        self.params.double_sign_unbond_duration = duration;
        self
    }

    pub fn downtime_unbond_duration(mut self, duration: Duration) -> Self {
        self.params.downtime_unbond_duration = duration;
        self
    }

    pub fn build(self) -> SlashingResult<SlashingParams> {
        self.params.validate()?;
        Ok(self.params)
    }
}
