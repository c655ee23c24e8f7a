//! Validator identity, time and fraction primitives.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::time::Duration;

/// Width of a validator address digest in bytes.
pub const ADDRESS_LEN: usize = 20;

/// Width of an ed25519 consensus public key in bytes.
pub const PUBLIC_KEY_LEN: usize = 32;

/// Basis points representing 100%.
pub const BPS_DENOMINATOR: u32 = 10_000;

/// Validator consensus public key (ed25519).
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PublicKey(pub [u8; PUBLIC_KEY_LEN]);

impl PublicKey {
    pub fn new(bytes: [u8; PUBLIC_KEY_LEN]) -> Self {
        Self(bytes)
    }

    /// Address digest: first 20 bytes of SHA-256 over the key.
    pub fn address(&self) -> ValidatorAddress {
        let digest = Sha256::digest(self.0);
        let mut address = [0u8; ADDRESS_LEN];
        address.copy_from_slice(&digest[..ADDRESS_LEN]);
        ValidatorAddress(address)
    }

    pub fn as_bytes(&self) -> &[u8; PUBLIC_KEY_LEN] {
        &self.0
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({})", hex::encode(self.0))
    }
}

/// Fixed-size digest identifying a validator.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ValidatorAddress(pub [u8; ADDRESS_LEN]);

impl ValidatorAddress {
    pub fn new(bytes: [u8; ADDRESS_LEN]) -> Self {
        Self(bytes)
    }

    /// Parse from raw bytes, `None` unless exactly [`ADDRESS_LEN`] long.
    pub fn from_slice(bytes: &[u8]) -> Option<Self> {
        <[u8; ADDRESS_LEN]>::try_from(bytes).ok().map(Self)
    }

    pub fn as_bytes(&self) -> &[u8; ADDRESS_LEN] {
        &self.0
    }
}

impl fmt::Display for ValidatorAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl fmt::Debug for ValidatorAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ValidatorAddress({})", self)
    }
}

/// Block timestamp in nanoseconds since the Unix epoch.
///
/// Only the block's declared time is ever used; the subsystem never reads
/// the wall clock. Zero means "unset".
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Timestamp(pub u64);

impl Timestamp {
    pub fn from_nanos(nanos: u64) -> Self {
        Self(nanos)
    }

    pub fn from_secs(secs: u64) -> Self {
        Self(secs.saturating_mul(1_000_000_000))
    }

    pub fn as_nanos(&self) -> u64 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub fn saturating_add(self, duration: Duration) -> Self {
        let nanos = u64::try_from(duration.as_nanos()).unwrap_or(u64::MAX);
        Self(self.0.saturating_add(nanos))
    }

    /// Elapsed time since `earlier`, zero if `earlier` is later than `self`.
    pub fn saturating_duration_since(self, earlier: Timestamp) -> Duration {
        Duration::from_nanos(self.0.saturating_sub(earlier.0))
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{:09}",
            self.0 / 1_000_000_000,
            self.0 % 1_000_000_000
        )
    }
}

/// Fraction of stake to slash, in basis points (`10_000` = 100%).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SlashFraction(u32);

impl SlashFraction {
    pub const FULL: SlashFraction = SlashFraction(BPS_DENOMINATOR);

    /// `None` if `bps` exceeds 100%.
    pub fn from_bps(bps: u32) -> Option<Self> {
        (bps <= BPS_DENOMINATOR).then_some(Self(bps))
    }

    pub fn bps(&self) -> u32 {
        self.0
    }

    pub fn is_valid(&self) -> bool {
        self.0 <= BPS_DENOMINATOR
    }

    /// Portion of `amount` this fraction represents, rounded down.
    pub fn apply(&self, amount: u128) -> u128 {
        amount.saturating_mul(self.0 as u128) / BPS_DENOMINATOR as u128
    }
}
